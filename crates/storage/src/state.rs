// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay
//!
//! Clients, tasks and stage history are all derived views over the
//! operation log. `StageTransition` updates the client's stage field and
//! appends the history entry in one apply, so no reader can ever observe
//! one without the other.

use crate::operation::Operation;
use desk_core::client::{Client, ClientId};
use desk_core::history::StageHistoryEntry;
use desk_core::task::{Task, TaskId};
use std::collections::HashMap;

/// Materialized state built from WAL operations
#[derive(Debug, Default, Clone)]
pub struct MaterializedState {
    clients: HashMap<ClientId, Client>,
    tasks: HashMap<TaskId, Task>,
    history: HashMap<ClientId, Vec<StageHistoryEntry>>,
}

impl MaterializedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::ClientCreate { client } => {
                // A client's history starts at creation: the from-nothing
                // entry anchors days-in-stage and dwell analytics
                self.history.entry(client.id.clone()).or_default().push(
                    StageHistoryEntry {
                        client_id: client.id.clone(),
                        from_stage: None,
                        to_stage: client.stage,
                        changed_at: client.created_at,
                    },
                );
                self.clients.insert(client.id.clone(), client.clone());
            }

            Operation::ClientUpdate { client } => {
                let stored_stage = self.clients.get(&client.id).map(|c| c.stage);
                match stored_stage {
                    Some(stage) => {
                        // Field edits never move the stage; that is
                        // StageTransition's job
                        let mut updated = client.clone();
                        updated.stage = stage;
                        self.clients.insert(client.id.clone(), updated);
                    }
                    None => {
                        tracing::warn!(id = %client.id, "update for unknown client ignored");
                    }
                }
            }

            Operation::StageTransition {
                client_id,
                from_stage,
                to_stage,
                changed_at,
            } => {
                let Some(client) = self.clients.get_mut(client_id) else {
                    tracing::warn!(id = %client_id, "transition for unknown client ignored");
                    return;
                };

                let entry = StageHistoryEntry {
                    client_id: client_id.clone(),
                    from_stage: Some(*from_stage),
                    to_stage: *to_stage,
                    changed_at: *changed_at,
                };

                let sequence = self.history.entry(client_id.clone()).or_default();
                if !entry.follows(sequence.last()) {
                    tracing::warn!(
                        id = %client_id,
                        from = %from_stage,
                        to = %to_stage,
                        "non-contiguous stage transition in log"
                    );
                }

                client.stage = *to_stage;
                client.updated_at = *changed_at;
                sequence.push(entry);
            }

            Operation::ClientDelete { id } => {
                self.clients.remove(id);
                self.history.remove(id);
            }

            Operation::TaskCreate { task } | Operation::TaskUpdate { task } => {
                self.tasks.insert(task.id.clone(), task.clone());
            }

            Operation::TaskDelete { id } => {
                self.tasks.remove(id);
            }
        }
    }

    /// Get a client by ID
    pub fn client(&self, id: &ClientId) -> Option<&Client> {
        self.clients.get(id)
    }

    /// All clients, unordered
    pub fn all_clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Get a task by ID
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// All tasks, unordered
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// History entries for one client, in applied order
    pub fn history_for(&self, id: &ClientId) -> &[StageHistoryEntry] {
        self.history.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The full history log across all clients
    pub fn all_history(&self) -> Vec<StageHistoryEntry> {
        let mut entries: Vec<StageHistoryEntry> =
            self.history.values().flatten().cloned().collect();
        entries.sort_by(|a, b| {
            (&a.client_id.0, a.changed_at).cmp(&(&b.client_id.0, b.changed_at))
        });
        entries
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
