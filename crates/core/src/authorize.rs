// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transition authorization
//!
//! Pure decision function over (role, from, to). The only restriction in the
//! domain: moving between Structuring Phase and Ready to Send to Banker, in
//! either direction, is reserved for admins. The structuring handoff is the
//! point where numbers are committed to a banker, so assistants hand it to
//! an admin instead of moving the card themselves.

use crate::actor::Role;
use crate::stage::Stage;

/// The admin-only stage pair, in catalog order
pub const RESTRICTED_PAIR: (Stage, Stage) = (Stage::StructuringPhase, Stage::ReadyToSendToBanker);

/// Whether `role` may move a client from `from` to `to`.
///
/// Total over the whole (role, stage, stage) space; no-op moves are
/// short-circuited before authorization and never reach this function.
pub fn is_transition_allowed(role: Role, from: Stage, to: Stage) -> bool {
    if role.is_admin() {
        return true;
    }

    let (a, b) = RESTRICTED_PAIR;
    !((from == a && to == b) || (from == b && to == a))
}

#[cfg(test)]
#[path = "authorize_tests.rs"]
mod tests;
