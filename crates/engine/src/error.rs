// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error taxonomy
//!
//! The five kinds are surfaced distinctly so callers can choose between
//! "retry" (Conflict, Upstream) and "correct your input" (Forbidden,
//! Validation), and drop stale views (NotFound).

use desk_storage::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Referenced entity does not exist at operation time
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Role lacks permission for the requested operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Optimistic-concurrency precondition failed after one retry
    #[error("conflict: client {id} was moved concurrently")]
    Conflict { id: String },

    /// Required field missing or malformed; nothing was written
    #[error("validation: {0}")]
    Validation(String),

    /// The backing store or a collaborator failed to respond
    #[error("upstream unavailable: {0}")]
    Upstream(String),
}

impl EngineError {
    /// Stable machine-readable kind, carried across the wire so the CLI
    /// can render the right affordance
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::NotFound { .. } => "not_found",
            EngineError::Forbidden(_) => "forbidden",
            EngineError::Conflict { .. } => "conflict",
            EngineError::Validation(_) => "validation",
            EngineError::Upstream(_) => "upstream",
        }
    }
}

impl From<StoreError> for EngineError {
    fn from(e: StoreError) -> Self {
        EngineError::Upstream(e.to_string())
    }
}
