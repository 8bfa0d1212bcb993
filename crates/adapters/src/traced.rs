// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use async_trait::async_trait;
use desk_core::email::EmailMessage;
use desk_core::{MailAdapter, MailError};

/// Wrapper that adds tracing to any MailAdapter
#[derive(Clone)]
pub struct TracedMailAdapter<M> {
    inner: M,
}

impl<M> TracedMailAdapter<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<M: MailAdapter> MailAdapter for TracedMailAdapter<M> {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(message).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(()) => {
                tracing::info!(to = %message.to, subject = %message.subject, elapsed_ms, "mail sent");
            }
            Err(MailError::NotConfigured) => {
                tracing::warn!(to = %message.to, "mail not configured; message dropped");
            }
            Err(e) => {
                tracing::error!(to = %message.to, elapsed_ms, error = %e, "mail send failed");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desk_core::FakeMailer;

    #[tokio::test]
    async fn traced_wrapper_passes_through() {
        let inner = FakeMailer::new();
        let traced = TracedMailAdapter::new(inner.clone());

        let message = EmailMessage {
            to: "broker@example.com".to_string(),
            subject: "New task".to_string(),
            html: "<p>hi</p>".to_string(),
        };

        traced.send(&message).await.unwrap();
        assert_eq!(inner.sent().len(), 1);

        inner.set_failing(true);
        assert!(traced.send(&message).await.is_err());
    }
}
