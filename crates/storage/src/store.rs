// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL-backed store with crash recovery
//!
//! The WAL is the source of truth; materialized state is a derived view,
//! rebuilt by replay on open. `commit` appends durably first and applies to
//! the in-memory view only after the append succeeds, so a failed write
//! leaves readers on the pre-commit state.

use crate::operation::Operation;
use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("WAL error: {0}")]
    Wal(#[from] WalError),
}

/// Durable store: write-ahead log plus a materialized view
pub struct Store {
    wal: Wal,
    state: MaterializedState,
    path: PathBuf,
}

impl Store {
    /// Open or create a store backed by the WAL at `path`, replaying any
    /// existing log into the materialized view.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let ops = Wal::replay(path)?;
        let mut state = MaterializedState::new();
        for op in &ops {
            state.apply(op);
        }

        let wal = Wal::open(path)?;
        tracing::debug!(
            path = %path.display(),
            operations = ops.len(),
            clients = state.client_count(),
            tasks = state.task_count(),
            "store opened"
        );

        Ok(Self {
            wal,
            state,
            path: path.to_path_buf(),
        })
    }

    /// Durably record an operation, then apply it to the materialized view.
    ///
    /// If the append fails nothing is applied: readers keep seeing the
    /// pre-commit state, and a reopen replays only what was durably written.
    pub fn commit(&mut self, op: Operation) -> Result<u64, StoreError> {
        let seq = self.wal.append(&op)?;
        self.state.apply(&op);
        Ok(seq)
    }

    /// Read access to the materialized view
    pub fn state(&self) -> &MaterializedState {
        &self.state
    }

    /// Path of the backing WAL
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sequence number of the last committed operation
    pub fn sequence(&self) -> u64 {
        self.wal.sequence()
    }

    /// Arm the WAL failpoint: the next commit fails without writing
    #[cfg(test)]
    pub(crate) fn fail_next_commit(&mut self) {
        self.wal.fail_next_append();
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
