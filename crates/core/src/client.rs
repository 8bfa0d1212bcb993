// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client state machine
//!
//! A client is one mortgage file in progress. The only domain logic beyond
//! field mapping lives here: which stage moves are allowed, and the history
//! entry that must accompany every successful move. Transitions are pure;
//! the engine owns persistence and retry.

use crate::actor::Role;
use crate::authorize::is_transition_allowed;
use crate::clock::Clock;
use crate::effect::{Effect, Event};
use crate::history::StageHistoryEntry;
use crate::stage::Stage;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a client
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        ClientId(s)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        ClientId(s.to_string())
    }
}

/// A mortgage file moving through the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub banker_name: Option<String>,
    #[serde(default)]
    pub banker_email: Option<String>,
    #[serde(default)]
    pub lender: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub retainer_amount: Option<f64>,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes_file_link: Option<String>,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub archived_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub archived_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable descriptive fields, as they arrive at the boundary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientDraft {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub banker_name: Option<String>,
    #[serde(default)]
    pub banker_email: Option<String>,
    #[serde(default)]
    pub lender: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub retainer_amount: Option<f64>,
    #[serde(default)]
    pub closing_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes_file_link: Option<String>,
}

/// Rejections raised before any write is attempted
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidClient {
    #[error("client name is required")]
    MissingName,
}

/// A denied stage move
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{role} may not move a client from {from} to {to}")]
pub struct MoveDenied {
    pub role: Role,
    pub from: Stage,
    pub to: Stage,
}

/// Outcome of a stage move attempt
#[derive(Debug, Clone, PartialEq)]
pub enum StageMove {
    /// The client moved; persist the record and the history entry together
    Moved {
        client: Client,
        entry: StageHistoryEntry,
        effects: Vec<Effect>,
    },
    /// Target equals current stage: success, no side effects
    NoOp,
}

impl Client {
    /// Create a new client in the catalog's first stage
    pub fn create(
        id: impl Into<ClientId>,
        draft: ClientDraft,
        clock: &impl Clock,
    ) -> Result<(Client, Vec<Effect>), InvalidClient> {
        if draft.name.trim().is_empty() {
            return Err(InvalidClient::MissingName);
        }

        let now = clock.now();
        let client = Client {
            id: id.into(),
            name: draft.name.trim().to_string(),
            phone: draft.phone,
            email: draft.email,
            assigned_to: draft.assigned_to,
            banker_name: draft.banker_name,
            banker_email: draft.banker_email,
            lender: draft.lender,
            notes: draft.notes,
            retainer_amount: draft.retainer_amount,
            closing_date: draft.closing_date,
            notes_file_link: draft.notes_file_link,
            stage: Stage::Lead,
            is_archived: false,
            archived_at: None,
            archived_by: None,
            created_at: now,
            updated_at: now,
        };

        let effects = vec![Effect::Emit(Event::ClientCreated {
            id: client.id.0.clone(),
            name: client.name.clone(),
        })];
        Ok((client, effects))
    }

    /// Apply a field edit (last-write-wins; never touches the stage)
    pub fn apply_draft(
        &self,
        draft: ClientDraft,
        clock: &impl Clock,
    ) -> Result<(Client, Vec<Effect>), InvalidClient> {
        if draft.name.trim().is_empty() {
            return Err(InvalidClient::MissingName);
        }

        let client = Client {
            name: draft.name.trim().to_string(),
            phone: draft.phone,
            email: draft.email,
            assigned_to: draft.assigned_to,
            banker_name: draft.banker_name,
            banker_email: draft.banker_email,
            lender: draft.lender,
            notes: draft.notes,
            retainer_amount: draft.retainer_amount,
            closing_date: draft.closing_date,
            notes_file_link: draft.notes_file_link,
            updated_at: clock.now(),
            ..self.clone()
        };

        let effects = vec![Effect::Emit(Event::ClientUpdated {
            id: client.id.0.clone(),
        })];
        Ok((client, effects))
    }

    /// Attempt to move this client to `target`.
    ///
    /// No-op moves succeed without side effects and without consulting the
    /// authorizer. A successful move yields the updated record and the
    /// history entry; both must be persisted as one unit.
    pub fn move_to_stage(
        &self,
        target: Stage,
        role: Role,
        clock: &impl Clock,
    ) -> Result<StageMove, MoveDenied> {
        if self.stage == target {
            return Ok(StageMove::NoOp);
        }

        if !is_transition_allowed(role, self.stage, target) {
            return Err(MoveDenied {
                role,
                from: self.stage,
                to: target,
            });
        }

        let now = clock.now();
        let entry = StageHistoryEntry {
            client_id: self.id.clone(),
            from_stage: Some(self.stage),
            to_stage: target,
            changed_at: now,
        };

        let client = Client {
            stage: target,
            updated_at: now,
            ..self.clone()
        };

        let effects = vec![Effect::Emit(Event::StageChanged {
            id: self.id.0.clone(),
            from: self.stage,
            to: target,
        })];

        Ok(StageMove::Moved {
            client,
            entry,
            effects,
        })
    }

    /// Archive: hidden from active views, history retained
    pub fn archive(&self, actor_id: &str, clock: &impl Clock) -> (Client, Vec<Effect>) {
        if self.is_archived {
            return (self.clone(), vec![]);
        }

        let now = clock.now();
        let client = Client {
            is_archived: true,
            archived_at: Some(now),
            archived_by: Some(actor_id.to_string()),
            updated_at: now,
            ..self.clone()
        };
        let effects = vec![Effect::Emit(Event::ClientArchived {
            id: self.id.0.clone(),
        })];
        (client, effects)
    }

    /// Undo an archive
    pub fn unarchive(&self, clock: &impl Clock) -> (Client, Vec<Effect>) {
        if !self.is_archived {
            return (self.clone(), vec![]);
        }

        let client = Client {
            is_archived: false,
            archived_at: None,
            archived_by: None,
            updated_at: clock.now(),
            ..self.clone()
        };
        let effects = vec![Effect::Emit(Event::ClientUnarchived {
            id: self.id.0.clone(),
        })];
        (client, effects)
    }

    /// Active pipeline work: not archived, not in a closed stage
    pub fn is_active(&self) -> bool {
        !self.is_archived && !self.stage.is_closed()
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
