// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup, shutdown, single-instance lock.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use desk_adapters::{FileAuth, HttpMailer, TracedMailAdapter};
use desk_core::config::{ConfigError, DeskConfig};
use desk_core::{AuthError, SystemClock, UuidIdGen};
use desk_engine::Engine;
use desk_storage::{Store, StoreError};
use fs2::FileExt;
use thiserror::Error;
use tokio::net::UnixListener;
use tracing::info;

/// Daemon engine with concrete adapter types (mail wrapped with tracing)
pub type DaemonEngine = Engine<TracedMailAdapter<HttpMailer>, SystemClock, UuidIdGen>;

/// Errors during daemon startup/shutdown
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("could not determine a state directory")]
    NoStateDir,
    #[error("another daemon already holds {0}")]
    AlreadyRunning(PathBuf),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem layout of one daemon instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory
    pub state_dir: PathBuf,
    /// Path to the Unix socket
    pub socket_path: PathBuf,
    /// Path to the lock/PID file
    pub lock_path: PathBuf,
    /// Path to the version file
    pub version_path: PathBuf,
    /// Path to the daemon log file
    pub log_path: PathBuf,
    /// Path to the WAL
    pub wal_path: PathBuf,
    /// Path to the profiles file
    pub profiles_path: PathBuf,
    /// Path to the desk.toml config file
    pub config_path: PathBuf,
}

impl Config {
    /// Resolve the state directory: explicit argument, then
    /// `DESK_STATE_DIR`, then the platform state dir.
    pub fn resolve(state_dir: Option<PathBuf>) -> Result<Self, LifecycleError> {
        let dir = state_dir
            .or_else(|| std::env::var_os("DESK_STATE_DIR").map(PathBuf::from))
            .or_else(|| dirs::state_dir().map(|d| d.join("mortgage-desk")))
            .or_else(|| dirs::home_dir().map(|d| d.join(".local/state/mortgage-desk")))
            .ok_or(LifecycleError::NoStateDir)?;
        Ok(Self::for_state_dir(&dir))
    }

    /// Layout for a given state directory
    pub fn for_state_dir(dir: &Path) -> Self {
        Self {
            state_dir: dir.to_path_buf(),
            socket_path: dir.join("deskd.sock"),
            lock_path: dir.join("deskd.pid"),
            version_path: dir.join("deskd.version"),
            log_path: dir.join("deskd.log"),
            wal_path: dir.join("wal.jsonl"),
            profiles_path: dir.join("profiles.toml"),
            config_path: dir.join("desk.toml"),
        }
    }
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    // NOTE(lifetime): held to maintain the exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    /// Unix socket listener
    pub listener: UnixListener,
    /// The engine owning the store
    pub engine: DaemonEngine,
    /// Identity backend
    pub auth: FileAuth,
    /// When the daemon started
    pub start_time: Instant,
    /// Shutdown requested flag
    pub shutdown_requested: bool,
}

/// Start the daemon: take the instance lock, open the store, bind the socket
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    std::fs::create_dir_all(&config.state_dir)?;

    // Single instance per state dir
    let mut lock_file = File::options()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(|_| LifecycleError::AlreadyRunning(config.lock_path.clone()))?;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;

    std::fs::write(&config.version_path, env!("CARGO_PKG_VERSION"))?;

    let desk_config = DeskConfig::load(&config.config_path)?;
    if !desk_config.mail.is_configured() {
        tracing::warn!("mail not configured; task emails will be dropped");
    }

    let store = Store::open(&config.wal_path)?;
    let auth = FileAuth::load(&config.profiles_path)?;

    let mailer = TracedMailAdapter::new(HttpMailer::new(desk_config.mail.clone()));
    let engine = Engine::new(store, mailer, SystemClock, UuidIdGen);

    // A stale socket from an unclean shutdown blocks bind
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    let listener = UnixListener::bind(&config.socket_path)?;

    info!(state_dir = %config.state_dir.display(), "daemon started");

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        listener,
        engine,
        auth,
        start_time: Instant::now(),
        shutdown_requested: false,
    })
}

impl DaemonState {
    /// Remove the socket so clients see a clean "not running"
    pub fn cleanup(&self) {
        if let Err(e) = std::fs::remove_file(&self.config.socket_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, "failed to remove socket");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_in_the_state_dir() {
        let config = Config::for_state_dir(Path::new("/tmp/desk-test"));
        assert_eq!(config.socket_path, Path::new("/tmp/desk-test/deskd.sock"));
        assert_eq!(config.wal_path, Path::new("/tmp/desk-test/wal.jsonl"));
        assert_eq!(
            config.profiles_path,
            Path::new("/tmp/desk-test/profiles.toml")
        );
    }

    #[tokio::test]
    async fn second_daemon_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_state_dir(dir.path());

        let first = startup(&config).await.unwrap();
        let second = startup(&config).await;
        assert!(matches!(second, Err(LifecycleError::AlreadyRunning(_))));

        first.cleanup();
    }

    #[tokio::test]
    async fn stale_socket_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_state_dir(dir.path());
        std::fs::create_dir_all(&config.state_dir).unwrap();
        std::fs::write(&config.socket_path, b"stale").unwrap();

        let daemon = startup(&config).await.unwrap();
        daemon.cleanup();
    }
}
