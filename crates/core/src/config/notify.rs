// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification configuration
//!
//! Maps events to outbound email based on pattern matching rules.

use crate::effect::Event;
use crate::events::EventPattern;

/// Configuration for which events trigger an email notification
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    rules: Vec<NotifyRule>,
}

/// A rule mapping an event pattern to a notification decision
#[derive(Debug, Clone)]
pub struct NotifyRule {
    pub pattern: EventPattern,
    /// If true, notify. If false, suppress.
    pub enabled: bool,
}

impl NotifyConfig {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Default configuration: only task creation notifies
    pub fn default_config() -> Self {
        let mut config = Self::new();
        config.add_rule("task:created", true);
        config
    }

    /// Add a notification rule
    pub fn add_rule(&mut self, pattern: &str, enabled: bool) {
        self.rules.push(NotifyRule {
            pattern: EventPattern::new(pattern),
            enabled,
        });
    }

    /// Check if an event should trigger a notification.
    /// First matching rule wins.
    pub fn should_notify(&self, event: &Event) -> bool {
        let event_name = event.name();

        for rule in &self.rules {
            if rule.pattern.matches(&event_name) {
                return rule.enabled;
            }
        }

        false
    }
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
