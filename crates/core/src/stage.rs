// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline stage catalog
//!
//! The catalog is a fixed ordered list. Order is board-column presentation
//! order, not a strict progression: clients may jump stages. Stored stage
//! strings from older data may carry retired labels; [`Stage::normalize`]
//! maps every stored string onto a current catalog value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named step in the client pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Lead")]
    Lead,
    #[serde(rename = "Checklist Sent")]
    ChecklistSent,
    #[serde(rename = "Docs Received")]
    DocsReceived,
    #[serde(rename = "Structuring Phase")]
    StructuringPhase,
    #[serde(rename = "Ready to Send to Banker")]
    ReadyToSendToBanker,
    #[serde(rename = "Sent to Banker")]
    SentToBanker,
    #[serde(rename = "More Info")]
    MoreInfo,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Declined")]
    Declined,
    #[serde(rename = "Completed")]
    Completed,
}

/// Retired combined label from before Approved/Declined/More Info were split
const LEGACY_DECISION_LABEL: &str = "Decision (Approved/Declined/More Info)";

impl Stage {
    /// All stages in board-column order
    pub fn catalog() -> &'static [Stage] {
        &[
            Stage::Lead,
            Stage::ChecklistSent,
            Stage::DocsReceived,
            Stage::StructuringPhase,
            Stage::ReadyToSendToBanker,
            Stage::SentToBanker,
            Stage::MoreInfo,
            Stage::Approved,
            Stage::Declined,
            Stage::Completed,
        ]
    }

    /// Human-readable label (also the stored representation)
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Lead => "Lead",
            Stage::ChecklistSent => "Checklist Sent",
            Stage::DocsReceived => "Docs Received",
            Stage::StructuringPhase => "Structuring Phase",
            Stage::ReadyToSendToBanker => "Ready to Send to Banker",
            Stage::SentToBanker => "Sent to Banker",
            Stage::MoreInfo => "More Info",
            Stage::Approved => "Approved",
            Stage::Declined => "Declined",
            Stage::Completed => "Completed",
        }
    }

    /// Strict parse: exact label match only
    pub fn from_label(label: &str) -> Option<Stage> {
        Stage::catalog().iter().find(|s| s.label() == label).copied()
    }

    /// Map any stored stage string onto a current catalog value.
    ///
    /// Exact labels map to themselves, case/whitespace variants of current
    /// labels are accepted, the retired combined decision label maps to
    /// More Info (Approved and Declined are its outcomes; the combined label
    /// described the decision still being awaited). Anything unrecognized,
    /// including the empty string, maps to the catalog's first stage.
    pub fn normalize(raw: &str) -> Stage {
        let trimmed = raw.trim();

        if trimmed.eq_ignore_ascii_case(LEGACY_DECISION_LABEL) {
            return Stage::MoreInfo;
        }

        Stage::catalog()
            .iter()
            .find(|s| s.label().eq_ignore_ascii_case(trimmed))
            .copied()
            .unwrap_or(Stage::Lead)
    }

    /// Closed files: no longer counted as active pipeline work
    pub fn is_closed(&self) -> bool {
        matches!(self, Stage::Completed | Stage::Declined)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Stage::Lead
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
