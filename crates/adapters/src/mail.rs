// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP mail delivery
//!
//! Posts messages to a Resend-style JSON API. An incomplete configuration
//! (no key or no from address) surfaces as `NotConfigured`, which callers
//! treat as skip-with-warning, never as a failure of the triggering
//! operation.

use async_trait::async_trait;
use desk_core::config::MailConfig;
use desk_core::email::EmailMessage;
use desk_core::{MailAdapter, MailError};

/// Mailer that delivers through an HTTP JSON API
#[derive(Clone)]
pub struct HttpMailer {
    config: MailConfig,
}

impl HttpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

fn send_blocking(config: &MailConfig, message: &EmailMessage) -> Result<(), MailError> {
    if !config.is_configured() {
        return Err(MailError::NotConfigured);
    }
    let api_key = config.api_key.as_deref().unwrap_or_default();
    let from = config.from.as_deref().unwrap_or_default();

    let agent: ureq::Agent = ureq::Agent::config_builder()
        .timeout_global(Some(config.timeout))
        .build()
        .into();

    let payload = serde_json::json!({
        "from": from,
        "to": message.to,
        "subject": message.subject,
        "html": message.html,
    });

    agent
        .post(&config.endpoint)
        .header("Authorization", &format!("Bearer {api_key}"))
        .send_json(&payload)
        .map_err(|e| MailError::Delivery(e.to_string()))?;

    Ok(())
}

#[async_trait]
impl MailAdapter for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let config = self.config.clone();
        let message = message.clone();

        // ureq is blocking; keep it off the async executor threads
        tokio::task::spawn_blocking(move || send_blocking(&config, &message))
            .await
            .map_err(|e| MailError::Delivery(format!("mail task panicked: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_mailer_reports_not_configured() {
        let mailer = HttpMailer::new(MailConfig::default());
        let message = EmailMessage {
            to: "broker@example.com".to_string(),
            subject: "New task".to_string(),
            html: "<p>hi</p>".to_string(),
        };

        assert!(matches!(
            mailer.send(&message).await,
            Err(MailError::NotConfigured)
        ));
    }
}
