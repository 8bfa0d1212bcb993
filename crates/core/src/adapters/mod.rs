// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter traits for external integrations
//!
//! The engine talks to the outside world (mail delivery, identity) through
//! these traits. Real implementations live in the `desk-adapters` crate;
//! fakes with call recording live here for tests across the workspace.

mod auth;
mod fake;
mod mail;

pub use auth::{AuthAdapter, AuthError, ResetToken, SessionToken};
pub use fake::{FakeAuth, FakeMailer};
pub use mail::{MailAdapter, MailError, NoOpMailer};
