// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed identity
//!
//! Profiles live in a TOML file next to the daemon state; passwords are
//! stored as SHA-256 digests. Sessions are in-memory and die with the
//! daemon. Password reset rotates the digest on disk and drops the user's
//! live sessions.

use async_trait::async_trait;
use desk_core::actor::{Actor, Role};
use desk_core::{AuthAdapter, AuthError, ResetToken, SessionToken};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// One stored profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    /// "admin" or anything else (resolved to assistant)
    pub role: String,
    /// Hex SHA-256 of the password
    pub password_sha256: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProfileFile {
    #[serde(default)]
    users: Vec<Profile>,
}

#[derive(Default)]
struct AuthState {
    users: Vec<Profile>,
    sessions: HashMap<SessionToken, Actor>,
    // reset token -> email
    resets: HashMap<ResetToken, String>,
}

/// Identity backed by a TOML profile file
#[derive(Clone)]
pub struct FileAuth {
    path: PathBuf,
    state: Arc<Mutex<AuthState>>,
}

/// Hex SHA-256 digest of a password
pub fn password_digest(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{digest:x}")
}

impl FileAuth {
    /// Load profiles from `path`. A missing file is an empty store where
    /// every sign-in fails.
    pub fn load(path: &Path) -> Result<Self, AuthError> {
        let users = match std::fs::read_to_string(path) {
            Ok(raw) => {
                let file: ProfileFile =
                    toml::from_str(&raw).map_err(|e| AuthError::Store(e.to_string()))?;
                file.users
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(AuthError::Store(e.to_string())),
        };

        tracing::debug!(path = %path.display(), users = users.len(), "profiles loaded");

        Ok(Self {
            path: path.to_path_buf(),
            state: Arc::new(Mutex::new(AuthState {
                users,
                ..AuthState::default()
            })),
        })
    }

    /// Add a profile and persist the file (provisioning helper)
    pub fn add_profile(
        &self,
        email: &str,
        full_name: &str,
        role: &str,
        password: &str,
    ) -> Result<Profile, AuthError> {
        let profile = Profile {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            role: role.to_string(),
            password_sha256: password_digest(password),
        };

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(AuthError::Store(format!("profile exists: {email}")));
        }
        state.users.push(profile.clone());
        Self::persist(&self.path, &state.users)?;
        Ok(profile)
    }

    fn persist(path: &Path, users: &[Profile]) -> Result<(), AuthError> {
        let file = ProfileFile {
            users: users.to_vec(),
        };
        let raw = toml::to_string_pretty(&file).map_err(|e| AuthError::Store(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AuthError::Store(e.to_string()))?;
        }
        std::fs::write(path, raw).map_err(|e| AuthError::Store(e.to_string()))
    }

    fn actor_for(profile: &Profile) -> Actor {
        Actor::new(
            profile.id.clone(),
            profile.full_name.clone(),
            profile.email.clone(),
            Role::from_profile(&profile.role),
        )
    }
}

#[async_trait]
impl AuthAdapter for FileAuth {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(SessionToken, Actor), AuthError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        let digest = password_digest(password);
        let actor = state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email) && u.password_sha256 == digest)
            .map(Self::actor_for)
            // Unknown email and wrong password are the same error on purpose
            .ok_or(AuthError::InvalidCredentials)?;

        let token = SessionToken(uuid::Uuid::new_v4().to_string());
        state.sessions.insert(token.clone(), actor.clone());
        tracing::info!(email, role = %actor.role, "signed in");
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

        if !state
            .users
            .iter()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            // Do not reveal which addresses exist
            return Ok(None);
        }

        let token = ResetToken(uuid::Uuid::new_v4().to_string());
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

        let digest = password_digest(new_password);
        for user in &mut state.users {
            if user.email.eq_ignore_ascii_case(&email) {
                user.password_sha256 = digest.clone();
            }
        }
        Self::persist(&self.path, &state.users)?;

        // Live sessions for this user are no longer valid
        state
            .sessions
            .retain(|_, actor| !actor.email.eq_ignore_ascii_case(&email));
        tracing::info!(email, "password reset completed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
