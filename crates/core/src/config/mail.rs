// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mail delivery configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the outbound mail API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// API key for the mail provider; unset disables delivery
    #[serde(default)]
    pub api_key: Option<String>,
    /// From address; unset disables delivery
    #[serde(default)]
    pub from: Option<String>,
    /// Provider endpoint for sending
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout, e.g. "10s"
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
}

fn default_endpoint() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            from: None,
            endpoint: default_endpoint(),
            timeout: default_timeout(),
        }
    }
}

impl MailConfig {
    /// Delivery requires both a key and a from address; anything less means
    /// sends are skipped with a warning rather than attempted.
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().map(|k| !k.is_empty()).unwrap_or(false)
            && self.from.as_deref().map(|f| !f.is_empty()).unwrap_or(false)
    }
}
