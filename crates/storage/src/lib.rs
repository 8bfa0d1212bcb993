//! desk-storage: event-sourced persistence for Mortgage Desk
//!
//! A checksummed write-ahead log of typed operations plus a materialized
//! state replayed from it. Stage transitions are single log records, so the
//! client's stage and its history entry are updated atomically by
//! construction.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod operation;
mod state;
mod store;
mod wal;

pub use operation::Operation;
pub use state::MaterializedState;
pub use store::{Store, StoreError};
pub use wal::{Wal, WalEntry, WalError};
