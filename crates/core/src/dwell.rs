// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Days-in-stage tracking
//!
//! Derived entirely from the history log and an injected `now`. The tier
//! thresholds are a UI contract: 0-2 days neutral, 3-6 warning, 7+ urgent.

use crate::client::Client;
use crate::history::{entered_current_stage_at, StageHistoryEntry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Attention tier for a client's time in its current stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DwellTier {
    Neutral,
    Warning,
    Urgent,
}

impl DwellTier {
    pub fn for_days(days: i64) -> DwellTier {
        if days >= 7 {
            DwellTier::Urgent
        } else if days >= 3 {
            DwellTier::Warning
        } else {
            DwellTier::Neutral
        }
    }
}

/// How long a client has sat in its current stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DwellInfo {
    pub entered_at: DateTime<Utc>,
    pub days: i64,
    pub tier: DwellTier,
}

/// Whole days since `entered_at`, floored and clamped at zero
pub fn days_in_stage(entered_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - entered_at).num_days().max(0)
}

/// Dwell summary for one client, pure given (history, client, now)
pub fn stage_dwell(
    history: &[StageHistoryEntry],
    client: &Client,
    now: DateTime<Utc>,
) -> DwellInfo {
    let entered_at = entered_current_stage_at(history, client);
    let days = days_in_stage(entered_at, now);
    DwellInfo {
        entered_at,
        days,
        tier: DwellTier::for_days(days),
    }
}

#[cfg(test)]
#[path = "dwell_tests.rs"]
mod tests;
