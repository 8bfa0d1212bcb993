// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine: every I/O-performing operation in one place
//!
//! Pure transitions come from desk-core; the engine looks up state, commits
//! operations to the store, executes the returned effects (event
//! publication, outbound mail) and maps failures onto the error taxonomy.
//! One engine owns one store; callers hand it a resolved actor per request.

use crate::error::EngineError;
use desk_core::analytics::{kpi_snapshot, stage_dwell_averages, KpiSnapshot, StageDwell};
use desk_core::calendar::tasks_to_ics;
use desk_core::clock::Clock;
use desk_core::config::NotifyConfig;
use desk_core::dwell::{stage_dwell, DwellInfo};
use desk_core::effect::{Effect, Event, LogLevel};
use desk_core::email::{render_task_created, EmailError, TaskCreatedEmail};
use desk_core::events::{EventBus, EventReceiver, SubscriberId, Subscription};
use desk_core::history::StageHistoryEntry;
use desk_core::id::IdGen;
use desk_core::{
    Client, ClientDraft, ClientId, MailAdapter, Role, StageMove, Task, TaskDraft, TaskEvent,
    TaskFilter, TaskId,
};
use desk_core::stage::Stage;
use desk_storage::{Operation, Store};
use std::collections::HashMap;

/// Which clients a listing should include
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientView {
    #[default]
    Active,
    Archived,
    All,
}

/// Outcome of a transition request
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionResult {
    /// The client moved and the history entry was logged
    Moved { client: Client },
    /// Target equals current stage: success with no side effects
    AlreadyThere { client: Client },
}

impl TransitionResult {
    pub fn client(&self) -> &Client {
        match self {
            TransitionResult::Moved { client } | TransitionResult::AlreadyThere { client } => {
                client
            }
        }
    }
}

/// The engine orchestrates state machines and executes effects
pub struct Engine<M: MailAdapter, C: Clock, I: IdGen> {
    store: Store,
    mailer: M,
    clock: C,
    ids: I,
    bus: EventBus,
    notify: NotifyConfig,
}

impl<M: MailAdapter, C: Clock, I: IdGen> Engine<M, C, I> {
    pub fn new(store: Store, mailer: M, clock: C, ids: I) -> Self {
        Self {
            store,
            mailer,
            clock,
            ids,
            bus: EventBus::new(),
            notify: NotifyConfig::default_config(),
        }
    }

    pub fn with_notify_config(mut self, notify: NotifyConfig) -> Self {
        self.notify = notify;
        self
    }

    /// Subscribe to engine events by pattern
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        self.bus.subscribe(subscription)
    }

    /// Unsubscribe a change feed
    pub fn unsubscribe(&self, id: &SubscriberId) {
        self.bus.unsubscribe(id);
    }

    // ------------------------------------------------------------------
    // Clients
    // ------------------------------------------------------------------

    /// Create a client from boundary input
    pub async fn create_client(&mut self, draft: ClientDraft) -> Result<Client, EngineError> {
        let (client, effects) = Client::create(self.ids.next(), draft, &self.clock)
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        self.store.commit(Operation::ClientCreate {
            client: client.clone(),
        })?;
        self.run_effects(effects).await;
        Ok(client)
    }

    /// Edit a client's descriptive fields (last-write-wins)
    pub async fn update_client(
        &mut self,
        id: &ClientId,
        draft: ClientDraft,
    ) -> Result<Client, EngineError> {
        let client = self.require_client(id)?;
        let (updated, effects) = client
            .apply_draft(draft, &self.clock)
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        self.store.commit(Operation::ClientUpdate {
            client: updated.clone(),
        })?;
        self.run_effects(effects).await;
        Ok(updated)
    }

    /// Move a client to a new stage, reading the current stage here.
    ///
    /// Callers that act on a rendered snapshot (a dragged board card)
    /// should use [`Engine::transition_stage_from`] with the stage they
    /// observed, so a stale view surfaces as a conflict instead of a silent
    /// double-move.
    pub async fn transition_stage(
        &mut self,
        id: &ClientId,
        target: Stage,
        role: Role,
    ) -> Result<TransitionResult, EngineError> {
        let observed = self.require_client(id)?.stage;
        self.attempt_transition(id, observed, target, role).await
    }

    /// Move a client to a new stage, conditioned on the stage the caller
    /// observed. A stale precondition retries the whole sequence once from
    /// lookup, then fails with a conflict.
    pub async fn transition_stage_from(
        &mut self,
        id: &ClientId,
        observed: Stage,
        target: Stage,
        role: Role,
    ) -> Result<TransitionResult, EngineError> {
        match self.attempt_transition(id, observed, target, role).await {
            Err(EngineError::Conflict { .. }) => {
                tracing::debug!(id = %id, "stale transition precondition, retrying once");
                self.attempt_transition(id, observed, target, role).await
            }
            other => other,
        }
    }

    /// One optimistic attempt: lookup, no-op short-circuit, authorize,
    /// precondition check, single-record commit.
    async fn attempt_transition(
        &mut self,
        id: &ClientId,
        observed: Stage,
        target: Stage,
        role: Role,
    ) -> Result<TransitionResult, EngineError> {
        let client = self.require_client(id)?;

        if client.stage == target {
            return Ok(TransitionResult::AlreadyThere { client });
        }

        if client.stage != observed {
            return Err(EngineError::Conflict { id: id.0.clone() });
        }

        match client.move_to_stage(target, role, &self.clock) {
            Ok(StageMove::Moved {
                client: updated,
                entry,
                effects,
            }) => {
                self.store.commit(Operation::StageTransition {
                    client_id: id.clone(),
                    from_stage: observed,
                    to_stage: target,
                    changed_at: entry.changed_at,
                })?;
                self.run_effects(effects).await;
                Ok(TransitionResult::Moved { client: updated })
            }
            Ok(StageMove::NoOp) => Ok(TransitionResult::AlreadyThere { client }),
            Err(denied) => Err(EngineError::Forbidden(denied.to_string())),
        }
    }

    /// Archive a client: hidden from active views, history retained
    pub async fn archive_client(
        &mut self,
        id: &ClientId,
        actor_id: &str,
    ) -> Result<Client, EngineError> {
        let client = self.require_client(id)?;
        let (archived, effects) = client.archive(actor_id, &self.clock);
        if effects.is_empty() {
            return Ok(archived); // already archived
        }

        self.store.commit(Operation::ClientUpdate {
            client: archived.clone(),
        })?;
        self.run_effects(effects).await;
        Ok(archived)
    }

    /// Undo an archive
    pub async fn unarchive_client(&mut self, id: &ClientId) -> Result<Client, EngineError> {
        let client = self.require_client(id)?;
        let (restored, effects) = client.unarchive(&self.clock);
        if effects.is_empty() {
            return Ok(restored);
        }

        self.store.commit(Operation::ClientUpdate {
            client: restored.clone(),
        })?;
        self.run_effects(effects).await;
        Ok(restored)
    }

    /// Hard delete: irreversible, removes history, admin only
    pub async fn delete_client(&mut self, id: &ClientId, role: Role) -> Result<(), EngineError> {
        if !role.is_admin() {
            return Err(EngineError::Forbidden(
                "only admins may delete clients".to_string(),
            ));
        }
        self.require_client(id)?;

        self.store.commit(Operation::ClientDelete { id: id.clone() })?;
        self.run_effects(vec![Effect::Emit(Event::ClientDeleted {
            id: id.0.clone(),
        })])
        .await;
        Ok(())
    }

    /// Get one client
    pub fn client(&self, id: &ClientId) -> Result<Client, EngineError> {
        self.require_client(id)
    }

    /// List clients for a view, newest first
    pub fn clients(&self, view: ClientView) -> Vec<Client> {
        let mut clients: Vec<Client> = self
            .store
            .state()
            .all_clients()
            .filter(|c| match view {
                ClientView::Active => !c.is_archived,
                ClientView::Archived => c.is_archived,
                ClientView::All => true,
            })
            .cloned()
            .collect();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.0.cmp(&b.id.0)));
        clients
    }

    /// Days-in-stage summary for one client
    pub fn dwell(&self, id: &ClientId) -> Result<DwellInfo, EngineError> {
        let client = self.require_client(id)?;
        let history = self.store.state().history_for(id);
        Ok(stage_dwell(history, &client, self.clock.now()))
    }

    /// The transition log for one client, oldest first
    pub fn history(&self, id: &ClientId) -> Result<Vec<StageHistoryEntry>, EngineError> {
        self.require_client(id)?;
        Ok(self.store.state().history_for(id).to_vec())
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    /// Create a task. Fires the task-created email as a side effect;
    /// delivery failure is logged and never rolls back the creation.
    pub async fn create_task(&mut self, draft: TaskDraft) -> Result<Task, EngineError> {
        if let Some(client_id) = &draft.client_id {
            self.require_client(client_id)?;
        }

        let (task, mut effects) = Task::create(self.ids.next(), draft, &self.clock)
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        self.store.commit(Operation::TaskCreate { task: task.clone() })?;

        if let Some(email) = self.task_created_email(&task, &effects) {
            effects.push(Effect::SendEmail { message: email });
        }
        self.run_effects(effects).await;
        Ok(task)
    }

    /// Build the notification email for a freshly created task, if the
    /// notify rules say so and a recipient exists.
    fn task_created_email(
        &self,
        task: &Task,
        effects: &[Effect],
    ) -> Option<desk_core::email::EmailMessage> {
        let created_event = effects.iter().find_map(|e| match e {
            Effect::Emit(event @ Event::TaskCreated { .. }) => Some(event),
            _ => None,
        })?;

        if !self.notify.should_notify(created_event) {
            return None;
        }

        let client_name = task
            .client_id
            .as_ref()
            .and_then(|id| self.store.state().client(id))
            .map(|c| c.name.clone());

        let input = TaskCreatedEmail {
            to: task.assignee_email.clone(),
            title: task.title.clone(),
            client_name,
            due_date: task.due_date,
            notes: task.notes.clone(),
        };

        match render_task_created(&input) {
            Ok(message) => Some(message),
            Err(EmailError::MissingRecipient) => {
                tracing::warn!(task = %task.id, "no recipient email; skipping task email");
                None
            }
            Err(e) => {
                tracing::warn!(task = %task.id, error = %e, "task email render failed");
                None
            }
        }
    }

    /// Edit a task's fields
    pub async fn update_task(
        &mut self,
        id: &TaskId,
        draft: TaskDraft,
    ) -> Result<Task, EngineError> {
        if let Some(client_id) = &draft.client_id {
            self.require_client(client_id)?;
        }
        let task = self.require_task(id)?;
        let updated = task
            .apply_draft(draft)
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        self.store.commit(Operation::TaskUpdate {
            task: updated.clone(),
        })?;
        Ok(updated)
    }

    /// Mark a task completed
    pub async fn complete_task(&mut self, id: &TaskId) -> Result<Task, EngineError> {
        self.apply_task_event(id, TaskEvent::Complete).await
    }

    /// Reopen a completed task
    pub async fn reopen_task(&mut self, id: &TaskId) -> Result<Task, EngineError> {
        self.apply_task_event(id, TaskEvent::Reopen).await
    }

    async fn apply_task_event(
        &mut self,
        id: &TaskId,
        event: TaskEvent,
    ) -> Result<Task, EngineError> {
        let task = self.require_task(id)?;
        let (updated, effects) = task.transition(event, &self.clock);

        if !effects.is_empty() {
            self.store.commit(Operation::TaskUpdate {
                task: updated.clone(),
            })?;
            self.run_effects(effects).await;
        }
        Ok(updated)
    }

    /// Delete a task
    pub async fn delete_task(&mut self, id: &TaskId) -> Result<(), EngineError> {
        self.require_task(id)?;
        self.store.commit(Operation::TaskDelete { id: id.clone() })?;
        self.run_effects(vec![Effect::Emit(Event::TaskDeleted {
            id: id.0.clone(),
        })])
        .await;
        Ok(())
    }

    /// List tasks matching a filter, by due date then creation time
    pub fn tasks(&self, filter: TaskFilter) -> Vec<Task> {
        let today = self.clock.today();
        let mut tasks: Vec<Task> = self
            .store
            .state()
            .all_tasks()
            .filter(|t| filter.matches(t, today))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            match (a.due_date, b.due_date) {
                (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            }
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.0.cmp(&b.id.0))
        });
        tasks
    }

    /// Get one task
    pub fn task(&self, id: &TaskId) -> Result<Task, EngineError> {
        self.require_task(id)
    }

    // ------------------------------------------------------------------
    // Derived reads
    // ------------------------------------------------------------------

    /// Average dwell per stage over the full history log
    pub fn analytics(&self) -> Vec<StageDwell> {
        stage_dwell_averages(&self.store.state().all_history())
    }

    /// Dashboard headline numbers
    pub fn kpis(&self) -> KpiSnapshot {
        let clients: Vec<Client> = self.store.state().all_clients().cloned().collect();
        let tasks: Vec<Task> = self.store.state().all_tasks().cloned().collect();
        kpi_snapshot(&clients, &tasks, self.clock.today())
    }

    /// Calendar feed of open, dated tasks
    pub fn calendar_feed(&self) -> String {
        let tasks: Vec<Task> = self.store.state().all_tasks().cloned().collect();
        let names: HashMap<ClientId, String> = self
            .store
            .state()
            .all_clients()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        tasks_to_ics(&tasks, &names, self.clock.now())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn require_client(&self, id: &ClientId) -> Result<Client, EngineError> {
        self.store
            .state()
            .client(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound {
                kind: "client",
                id: id.0.clone(),
            })
    }

    fn require_task(&self, id: &TaskId) -> Result<Task, EngineError> {
        self.store
            .state()
            .task(id)
            .cloned()
            .ok_or_else(|| EngineError::NotFound {
                kind: "task",
                id: id.0.clone(),
            })
    }

    /// Execute effects from a committed operation
    async fn run_effects(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Emit(event) => {
                    tracing::info!(event = %event.name(), "event emitted");
                    self.bus.publish(&event);
                }
                Effect::SendEmail { message } => {
                    if let Err(e) = self.mailer.send(&message).await {
                        // Fire-and-forget: a failed notification never
                        // fails the operation that triggered it
                        tracing::warn!(to = %message.to, error = %e, "task email failed");
                    }
                }
                Effect::Log { level, message } => match level {
                    LogLevel::Debug => tracing::debug!("{}", message),
                    LogLevel::Info => tracing::info!("{}", message),
                    LogLevel::Warn => tracing::warn!("{}", message),
                    LogLevel::Error => tracing::error!("{}", message),
                },
            }
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
