// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log
//!
//! Every state change is one typed operation. A stage transition is a single
//! operation carrying both the stage change and the history timestamp, so
//! the client record and its history entry can never diverge.

use chrono::{DateTime, Utc};
use desk_core::client::{Client, ClientId};
use desk_core::stage::Stage;
use desk_core::task::{Task, TaskId};
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
    /// Create a client (also opens its history with a from-nothing entry)
    ClientCreate { client: Client },

    /// Replace a client's descriptive fields (last-write-wins).
    /// The stage field is ignored on apply; stages move only via
    /// `StageTransition`.
    ClientUpdate { client: Client },

    /// Move a client to a new stage and log the transition, as one unit
    StageTransition {
        client_id: ClientId,
        from_stage: Stage,
        to_stage: Stage,
        changed_at: DateTime<Utc>,
    },

    /// Hard delete: removes the client and its history, bypassing the
    /// state machine. Admin-only at the engine boundary.
    ClientDelete { id: ClientId },

    /// Create a task
    TaskCreate { task: Task },

    /// Replace a task record (edits, completion, reopen)
    TaskUpdate { task: Task },

    /// Delete a task
    TaskDelete { id: TaskId },
}
