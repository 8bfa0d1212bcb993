// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mail delivery adapter
//!
//! Delivery is fire-and-forget: the engine logs failures as warnings and
//! never fails or rolls back the triggering operation.

use crate::email::EmailMessage;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from mail delivery
#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery not configured")]
    NotConfigured,
    #[error("mail delivery failed: {0}")]
    Delivery(String),
}

/// Adapter for outbound email
#[async_trait]
pub trait MailAdapter: Clone + Send + Sync + 'static {
    /// Send a message
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

/// Mailer that logs and drops every message.
/// Used when mail is not configured.
#[derive(Clone, Debug, Default)]
pub struct NoOpMailer;

#[async_trait]
impl MailAdapter for NoOpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::debug!(to = %message.to, subject = %message.subject, "mail disabled; dropping message");
        Ok(())
    }
}
