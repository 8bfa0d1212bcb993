// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage history
//!
//! Append-only log of stage transitions. For a given client, entries are
//! totally ordered by `changed_at` and contiguous: the `to_stage` of one
//! entry equals the `from_stage` of the next, even when the UI allows
//! skipping stages.

use crate::client::{Client, ClientId};
use crate::stage::Stage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable record of one transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageHistoryEntry {
    pub client_id: ClientId,
    /// None only for a client's first-ever entry
    pub from_stage: Option<Stage>,
    pub to_stage: Stage,
    pub changed_at: DateTime<Utc>,
}

impl StageHistoryEntry {
    /// Whether this entry is a valid successor of `prev` in a client's
    /// sequence (contiguous stages, non-decreasing timestamps).
    pub fn follows(&self, prev: Option<&StageHistoryEntry>) -> bool {
        match prev {
            None => true,
            Some(prev) => {
                prev.client_id == self.client_id
                    && self.from_stage == Some(prev.to_stage)
                    && self.changed_at >= prev.changed_at
            }
        }
    }
}

/// When the client entered its current stage: the most recent history entry,
/// falling back to the record's own timestamps when no history exists.
pub fn entered_current_stage_at(
    history: &[StageHistoryEntry],
    client: &Client,
) -> DateTime<Utc> {
    history
        .iter()
        .filter(|e| e.client_id == client.id)
        .map(|e| e.changed_at)
        .max()
        .unwrap_or(client.updated_at)
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
