// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task state machine
//!
//! Tasks are independent of the pipeline state machine: plain CRUD records
//! with an open/completed status and an optional client reference. Creating
//! one fires a notification email effect; the engine owns delivery.

use crate::client::ClientId;
use crate::clock::Clock;
use crate::effect::{Effect, Event};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Unique identifier for a task
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Open,
    Completed,
}

/// A unit of work, optionally attached to a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub assignee_email: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Fields accepted at the boundary when creating or editing a task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub assignee_email: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Rejections raised before any write is attempted
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidTask {
    #[error("task title is required")]
    MissingTitle,
}

/// Events that change task state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskEvent {
    Complete,
    Reopen,
}

impl Task {
    /// Create a new open task
    pub fn create(
        id: impl Into<TaskId>,
        draft: TaskDraft,
        clock: &impl Clock,
    ) -> Result<(Task, Vec<Effect>), InvalidTask> {
        if draft.title.trim().is_empty() {
            return Err(InvalidTask::MissingTitle);
        }

        let task = Task {
            id: id.into(),
            title: draft.title.trim().to_string(),
            assigned_to: draft.assigned_to,
            assignee_email: draft.assignee_email,
            due_date: draft.due_date,
            status: TaskStatus::Open,
            client_id: draft.client_id,
            notes: draft.notes,
            created_at: clock.now(),
            completed_at: None,
        };

        let effects = vec![Effect::Emit(Event::TaskCreated {
            id: task.id.0.clone(),
            title: task.title.clone(),
        })];
        Ok((task, effects))
    }

    /// Apply a field edit, keeping status
    pub fn apply_draft(&self, draft: TaskDraft) -> Result<Task, InvalidTask> {
        if draft.title.trim().is_empty() {
            return Err(InvalidTask::MissingTitle);
        }

        Ok(Task {
            title: draft.title.trim().to_string(),
            assigned_to: draft.assigned_to,
            assignee_email: draft.assignee_email,
            due_date: draft.due_date,
            client_id: draft.client_id,
            notes: draft.notes,
            ..self.clone()
        })
    }

    /// Pure transition function - returns new state and effects
    pub fn transition(&self, event: TaskEvent, clock: &impl Clock) -> (Task, Vec<Effect>) {
        match (self.status, event) {
            (TaskStatus::Open, TaskEvent::Complete) => {
                let task = Task {
                    status: TaskStatus::Completed,
                    completed_at: Some(clock.now()),
                    ..self.clone()
                };
                let effects = vec![Effect::Emit(Event::TaskCompleted {
                    id: self.id.0.clone(),
                })];
                (task, effects)
            }

            (TaskStatus::Completed, TaskEvent::Reopen) => {
                let task = Task {
                    status: TaskStatus::Open,
                    completed_at: None,
                    ..self.clone()
                };
                let effects = vec![Effect::Emit(Event::TaskReopened {
                    id: self.id.0.clone(),
                })];
                (task, effects)
            }

            // Already in the requested state - no change
            _ => (self.clone(), vec![]),
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Open
    }

    /// Open with a due date strictly before today
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.is_open() && self.due_date.map(|d| d < today).unwrap_or(false)
    }
}

/// Task list filters, matching the dashboard tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskFilter {
    #[default]
    Open,
    Overdue,
    Today,
    Upcoming,
    Completed,
    All,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            TaskFilter::Open => task.is_open(),
            TaskFilter::Overdue => task.is_overdue(today),
            TaskFilter::Today => task.is_open() && task.due_date == Some(today),
            TaskFilter::Upcoming => {
                task.is_open() && task.due_date.map(|d| d > today).unwrap_or(false)
            }
            TaskFilter::Completed => task.status == TaskStatus::Completed,
            TaskFilter::All => true,
        }
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(TaskFilter::Open),
            "overdue" => Ok(TaskFilter::Overdue),
            "today" => Ok(TaskFilter::Today),
            "upcoming" => Ok(TaskFilter::Upcoming),
            "completed" => Ok(TaskFilter::Completed),
            "all" => Ok(TaskFilter::All),
            other => Err(format!("unknown task filter: {other}")),
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
