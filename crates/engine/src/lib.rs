//! desk-engine: the transition executor and CRUD surface for Mortgage Desk
//!
//! Owns the store, runs pure transitions from desk-core against it, and
//! executes the resulting effects. All five error kinds are surfaced
//! distinctly so the daemon can put them on the wire.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod engine;
mod error;

pub use engine::{ClientView, Engine, TransitionResult};
pub use error::EngineError;
