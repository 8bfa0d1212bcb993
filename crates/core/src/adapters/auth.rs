// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity adapter
//!
//! The engine never sees credentials: the daemon signs requests in through
//! this adapter and hands the engine a resolved [`Actor`](crate::actor::Actor).

use crate::actor::Actor;
use async_trait::async_trait;
use thiserror::Error;

/// Opaque session token handed to the client on sign-in
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(pub String);

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque password-reset token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResetToken(pub String);

/// Errors from identity operations
#[derive(Debug, Error)]
pub enum AuthError {
    /// Wrong password and unknown email are deliberately indistinguishable
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("unknown or expired reset token")]
    UnknownResetToken,
    #[error("auth store error: {0}")]
    Store(String),
}

/// Adapter for authentication and actor resolution
#[async_trait]
pub trait AuthAdapter: Clone + Send + Sync + 'static {
    /// Verify credentials and open a session
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<(SessionToken, Actor), AuthError>;

    /// Resolve a token to its actor; None for unknown/expired tokens
    async fn session(&self, token: &SessionToken) -> Result<Option<Actor>, AuthError>;

    /// Close a session; unknown tokens are a no-op
    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError>;

    /// Begin a password reset. Returns None for unknown emails so callers
    /// cannot probe which addresses exist.
    async fn request_password_reset(&self, email: &str)
        -> Result<Option<ResetToken>, AuthError>;

    /// Complete a password reset: rotate the password and invalidate the
    /// user's live sessions.
    async fn confirm_password_reset(
        &self,
        token: &ResetToken,
        new_password: &str,
    ) -> Result<(), AuthError>;
}
