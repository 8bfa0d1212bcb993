// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::time::{Duration, Instant};

use desk_daemon::protocol::{self, ProtocolError};
use desk_daemon::{Config, Request, Response};
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Timeout for IPC requests
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("DESK_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for the daemon to start
pub fn timeout_connect() -> Duration {
    parse_duration_ms("DESK_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Polling interval for startup retries
pub fn poll_interval() -> Duration {
    parse_duration_ms("DESK_POLL_INTERVAL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    DaemonNotRunning,

    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("timed out waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine state directory: {0}")]
    NoStateDir(String),
}

/// Daemon client
pub struct DaemonClient {
    config: Config,
}

impl DaemonClient {
    /// Connect to the daemon, auto-starting it if not running
    pub async fn connect_or_start(state_dir: Option<PathBuf>) -> Result<Self, ClientError> {
        let config =
            Config::resolve(state_dir).map_err(|e| ClientError::NoStateDir(e.to_string()))?;

        let client = Self { config };
        if client.config.socket_path.exists() && client.ping().await.is_ok() {
            return Ok(client);
        }

        client.start_daemon()?;
        client.wait_for_daemon().await?;
        Ok(client)
    }

    /// Connect to an already-running daemon (no auto-start)
    pub async fn connect(state_dir: Option<PathBuf>) -> Result<Self, ClientError> {
        let config =
            Config::resolve(state_dir).map_err(|e| ClientError::NoStateDir(e.to_string()))?;

        if !config.socket_path.exists() {
            return Err(ClientError::DaemonNotRunning);
        }
        Ok(Self { config })
    }

    /// Spawn `deskd` detached, preferring the binary next to this one
    fn start_daemon(&self) -> Result<(), ClientError> {
        let deskd = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("deskd")))
            .filter(|p| p.exists())
            .unwrap_or_else(|| PathBuf::from("deskd"));

        std::fs::create_dir_all(&self.config.state_dir)?;

        std::process::Command::new(&deskd)
            .arg(&self.config.state_dir)
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| ClientError::DaemonStartFailed(format!("{}: {e}", deskd.display())))?;

        tracing::debug!(deskd = %deskd.display(), "spawned daemon");
        Ok(())
    }

    /// Poll for the socket until the daemon answers a ping
    async fn wait_for_daemon(&self) -> Result<(), ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout_connect() {
            if self.config.socket_path.exists() && self.ping().await.is_ok() {
                return Ok(());
            }
            tokio::time::sleep(poll_interval()).await;
        }
        Err(ClientError::DaemonStartTimeout)
    }

    async fn ping(&self) -> Result<(), ClientError> {
        match self.request(Request::Ping).await? {
            Response::Pong => Ok(()),
            _ => Err(ClientError::DaemonNotRunning),
        }
    }

    /// Send one request and read one response
    pub async fn request(&self, request: Request) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.config.socket_path)
            .await
            .map_err(|_| ClientError::DaemonNotRunning)?;
        let (mut reader, mut writer) = stream.into_split();

        protocol::write_frame(&mut writer, &request, timeout_ipc()).await?;
        let response = protocol::read_frame(&mut reader, timeout_ipc()).await?;
        Ok(response)
    }

    /// The daemon's filesystem layout (session file, state dir)
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ------------------------------------------------------------------
    // Session token cache
    // ------------------------------------------------------------------

    fn session_path(&self) -> PathBuf {
        self.config.state_dir.join("session")
    }

    /// Load the cached session token, if any
    pub fn load_token(&self) -> Option<String> {
        std::fs::read_to_string(self.session_path())
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Cache a session token for subsequent commands
    pub fn save_token(&self, token: &str) -> Result<(), ClientError> {
        std::fs::create_dir_all(&self.config.state_dir)?;
        std::fs::write(self.session_path(), token)?;
        Ok(())
    }

    /// Forget the cached session token
    pub fn clear_token(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(self.session_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// The cached token, or an instruction to log in
    pub fn require_token(&self) -> anyhow::Result<String> {
        self.load_token()
            .ok_or_else(|| anyhow::anyhow!("not signed in; run `desk login --email <email>`"))
    }
}
