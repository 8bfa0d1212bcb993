// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake adapter implementations for testing

use super::auth::{AuthAdapter, AuthError, ResetToken, SessionToken};
use super::mail::{MailAdapter, MailError};
use crate::actor::Actor;
use crate::email::EmailMessage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Fake mailer that records every send, with a configurable failure mode
#[derive(Clone, Default)]
pub struct FakeMailer {
    state: Arc<Mutex<FakeMailerState>>,
}

#[derive(Default)]
struct FakeMailerState {
    sent: Vec<EmailMessage>,
    fail: bool,
}

impl FakeMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail
    pub fn set_failing(&self, fail: bool) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).fail = fail;
    }

    /// Messages delivered so far
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .sent
            .clone()
    }
}

#[async_trait]
impl MailAdapter for FakeMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.fail {
            return Err(MailError::Delivery("fake mailer failure".to_string()));
        }
        state.sent.push(message.clone());
        Ok(())
    }
}

/// Fake auth backend with preloaded users and in-memory sessions
#[derive(Clone, Default)]
pub struct FakeAuth {
    state: Arc<Mutex<FakeAuthState>>,
}

#[derive(Default)]
struct FakeAuthState {
    // email -> (password, actor)
    users: HashMap<String, (String, Actor)>,
    sessions: HashMap<SessionToken, Actor>,
    resets: HashMap<ResetToken, String>,
    next_token: u64,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with a password
    pub fn add_user(&self, email: &str, password: &str, actor: Actor) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .users
            .insert(email.to_string(), (password.to_string(), actor));
    }

    /// Open a session directly, bypassing credentials (test setup helper)
    pub fn add_session(&self, token: &str, actor: Actor) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .sessions
            .insert(SessionToken(token.to_string()), actor);
    }
}

#[async_trait]
impl AuthAdapter for FakeAuth {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(SessionToken, Actor), AuthError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let actor = match state.users.get(email) {
            Some((stored, actor)) if stored == password => actor.clone(),
            _ => return Err(AuthError::InvalidCredentials),
        };

        state.next_token += 1;
        let token = SessionToken(format!("session-{}", state.next_token));
        state.sessions.insert(token.clone(), actor.clone());
        Ok((token, actor))
    }

    async fn session(&self, token: &SessionToken) -> Result<Option<Actor>, AuthError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        Ok(state.sessions.get(token).cloned())
    }

    async fn sign_out(&self, token: &SessionToken) -> Result<(), AuthError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.sessions.remove(token);
        Ok(())
    }

    async fn request_password_reset(
        &self,
        email: &str,
    ) -> Result<Option<ResetToken>, AuthError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.users.contains_key(email) {
            return Ok(None);
        }
        state.next_token += 1;
        let token = ResetToken(format!("reset-{}", state.next_token));
        state.resets.insert(token.clone(), email.to_string());
        Ok(Some(token))
    }

    async fn confirm_password_reset(
        &self,
        token: &ResetToken,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let email = state
            .resets
            .remove(token)
            .ok_or(AuthError::UnknownResetToken)?;

        if let Some((password, _)) = state.users.get_mut(&email) {
            *password = new_password.to_string();
        }

        // Live sessions for this user are no longer valid
        state.sessions.retain(|_, actor| actor.email != email);
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
