// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events for state machine orchestration
//!
//! Pure transitions return effects; the engine executes them. Events are the
//! observable output: the bus fans them out to subscribers, and the notify
//! config decides which ones become outbound email.

use crate::email::EmailMessage;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Effects are side effects that state machines request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Emit an event for other components to observe
    Emit(Event),
    /// Send an outbound email (fire-and-forget; failure never rolls back)
    SendEmail { message: EmailMessage },
    /// Log a message
    Log { level: LogLevel, message: String },
}

/// Log levels for Effect::Log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Events emitted by state machines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // Client events
    ClientCreated {
        id: String,
        name: String,
    },
    ClientUpdated {
        id: String,
    },
    StageChanged {
        id: String,
        from: Stage,
        to: Stage,
    },
    ClientArchived {
        id: String,
    },
    ClientUnarchived {
        id: String,
    },
    ClientDeleted {
        id: String,
    },

    // Task events
    TaskCreated {
        id: String,
        title: String,
    },
    TaskCompleted {
        id: String,
    },
    TaskReopened {
        id: String,
    },
    TaskDeleted {
        id: String,
    },
}

impl Event {
    /// Colon-segmented event name used for subscription pattern matching
    pub fn name(&self) -> String {
        match self {
            Event::ClientCreated { .. } => "client:created".to_string(),
            Event::ClientUpdated { .. } => "client:updated".to_string(),
            Event::StageChanged { .. } => "client:stage".to_string(),
            Event::ClientArchived { .. } => "client:archived".to_string(),
            Event::ClientUnarchived { .. } => "client:unarchived".to_string(),
            Event::ClientDeleted { .. } => "client:deleted".to_string(),
            Event::TaskCreated { .. } => "task:created".to_string(),
            Event::TaskCompleted { .. } => "task:completed".to_string(),
            Event::TaskReopened { .. } => "task:reopened".to_string(),
            Event::TaskDeleted { .. } => "task:deleted".to_string(),
        }
    }
}
