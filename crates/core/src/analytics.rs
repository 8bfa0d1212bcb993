// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage timing analytics
//!
//! Consumes the full history log and reports average dwell time per stage.
//! A client's most recent entry is open-ended and contributes no sample.
//! Output is deterministic: rows in catalog order, zero-sample stages report
//! 0 average and 0 count.

use crate::client::{Client, ClientId};
use crate::history::StageHistoryEntry;
use crate::stage::Stage;
use crate::task::Task;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Average dwell time for one stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDwell {
    pub stage: Stage,
    pub samples: usize,
    pub avg_days: f64,
}

/// Average days spent in each stage, across all clients.
///
/// Input ordering is not assumed: entries are grouped by client and sorted
/// by `changed_at` before pairing.
pub fn stage_dwell_averages(history: &[StageHistoryEntry]) -> Vec<StageDwell> {
    let mut by_client: HashMap<&ClientId, Vec<&StageHistoryEntry>> = HashMap::new();
    for entry in history {
        by_client.entry(&entry.client_id).or_default().push(entry);
    }

    let mut samples: HashMap<Stage, Vec<f64>> = HashMap::new();
    for sequence in by_client.values_mut() {
        sequence.sort_by_key(|e| e.changed_at);

        for pair in sequence.windows(2) {
            let stage = pair[0].to_stage;
            let days = (pair[1].changed_at - pair[0].changed_at).num_seconds() as f64 / 86_400.0;
            samples.entry(stage).or_default().push(days.max(0.0));
        }
    }

    Stage::catalog()
        .iter()
        .map(|&stage| {
            let dwell = samples.get(&stage).map(Vec::as_slice).unwrap_or(&[]);
            let avg_days = if dwell.is_empty() {
                0.0
            } else {
                dwell.iter().sum::<f64>() / dwell.len() as f64
            };
            StageDwell {
                stage,
                samples: dwell.len(),
                avg_days,
            }
        })
        .collect()
}

/// Dashboard headline numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    /// Not archived, not Completed/Declined
    pub active_clients: usize,
    /// Currently sitting with a banker
    pub sent_to_banker: usize,
    /// Open tasks past their due date
    pub tasks_overdue: usize,
    /// Completed stage with a closing date in the current month
    pub completed_this_month: usize,
}

/// Compute the dashboard headline numbers, pure given `today`
pub fn kpi_snapshot(clients: &[Client], tasks: &[Task], today: NaiveDate) -> KpiSnapshot {
    let active_clients = clients.iter().filter(|c| c.is_active()).count();

    let sent_to_banker = clients
        .iter()
        .filter(|c| c.stage == Stage::SentToBanker && !c.is_archived)
        .count();

    let tasks_overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();

    let completed_this_month = clients
        .iter()
        .filter(|c| c.stage == Stage::Completed)
        .filter(|c| {
            c.closing_date
                .map(|d| d.year() == today.year() && d.month() == today.month())
                .unwrap_or(false)
        })
        .count();

    KpiSnapshot {
        active_clients,
        sent_to_banker,
        tasks_overdue,
        completed_this_month,
    }
}

#[cfg(test)]
#[path = "analytics_tests.rs"]
mod tests;
