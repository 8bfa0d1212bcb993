// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actor identity and roles
//!
//! The engine never queries profiles itself: the daemon resolves the session
//! token to an [`Actor`] once per request and passes it by value into every
//! authorization decision.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Access role of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including the restricted structuring handoff and hard delete
    Admin,
    /// Default role for every profile that is not an admin
    Assistant,
}

impl Role {
    /// Map a stored profile role string onto a role.
    ///
    /// Anything that is not exactly "admin" resolves to Assistant.
    pub fn from_profile(raw: &str) -> Role {
        if raw.trim().eq_ignore_ascii_case("admin") {
            Role::Admin
        } else {
            Role::Assistant
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => f.write_str("admin"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// The resolved identity behind a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl Actor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}
