// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI-side rendering of daemon errors
//!
//! The wire carries the error taxonomy kind; each kind gets the affordance
//! the dashboard UI would give it: retry hints for transient failures,
//! corrective messages for user input, a login hint for dead sessions.

use anyhow::anyhow;

/// Turn a wire error (kind + message) into a user-facing error
pub fn render_error(kind: &str, message: &str) -> anyhow::Error {
    match kind {
        "conflict" => anyhow!("{message}\nThe record changed under you; refresh and try again."),
        "upstream" => anyhow!("{message}\nThe backend did not respond; try again shortly."),
        "not_found" => anyhow!("{message}\nThe record no longer exists; refresh your view."),
        "unauthenticated" => anyhow!("{message}"),
        // forbidden, validation: the message already says what to correct
        _ => anyhow!("{message}"),
    }
}
