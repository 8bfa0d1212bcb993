// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire protocol between the CLI and the daemon
//!
//! JSON frames with a 4-byte big-endian length prefix over a Unix socket.
//! Errors cross the wire with their taxonomy kind so the client can tell
//! "retry" apart from "fix your input".

use desk_core::actor::Actor;
use desk_core::analytics::{KpiSnapshot, StageDwell};
use desk_core::client::{Client, ClientDraft};
use desk_core::dwell::DwellTier;
use desk_core::task::{Task, TaskDraft};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Protocol version; bumped on incompatible changes
pub const PROTOCOL_VERSION: &str = "1";

/// Default timeout for a single read or write
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Frames larger than this are rejected as corrupt
const MAX_FRAME_BYTES: u32 = 4 * 1024 * 1024;

/// Errors from protocol operations
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timed out")]
    Timeout,
    #[error("connection closed")]
    ConnectionClosed,
    #[error("frame too large: {0} bytes")]
    FrameTooLarge(u32),
}

/// Requests from the CLI to the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    Ping,
    Hello { version: String },
    Status,
    Shutdown,

    // Identity
    SignIn { email: String, password: String },
    SignOut { token: String },
    WhoAmI { token: String },
    ResetRequest { email: String },
    ResetConfirm { token: String, new_password: String },

    // Clients
    ClientCreate { token: String, draft: ClientDraft },
    ClientUpdate { token: String, id: String, draft: ClientDraft },
    /// Move a client; `observed` is the stage the caller's view showed,
    /// if it acted on a rendered snapshot
    ClientMove {
        token: String,
        id: String,
        to: String,
        observed: Option<String>,
    },
    ClientArchive { token: String, id: String },
    ClientUnarchive { token: String, id: String },
    ClientDelete { token: String, id: String },
    ClientGet { token: String, id: String },
    /// view: "active" | "archived" | "all"
    ClientList { token: String, view: String },

    // Tasks
    TaskCreate { token: String, draft: TaskDraft },
    TaskUpdate { token: String, id: String, draft: TaskDraft },
    TaskComplete { token: String, id: String },
    TaskReopen { token: String, id: String },
    TaskDelete { token: String, id: String },
    /// filter: open | overdue | today | upcoming | completed | all
    TaskList { token: String, filter: String },

    // Derived reads
    Analytics { token: String },
    Kpis { token: String },
    /// The calendar feed is a read-only export, fetchable without a session
    Calendar,
}

/// One row of a client listing, with its days-in-stage badge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientRow {
    pub client: Client,
    pub days_in_stage: i64,
    pub tier: DwellTier,
}

/// Responses from the daemon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Pong,
    Hello { version: String },
    Ok,
    Error { kind: String, message: String },
    Status {
        uptime_secs: u64,
        clients: usize,
        tasks: usize,
    },
    ShuttingDown,

    Session { token: String, actor: Actor },
    Actor { actor: Actor },
    /// Some(token) when the email exists; None otherwise (no probing)
    ResetToken { token: Option<String> },

    Client { client: Client },
    Clients { clients: Vec<ClientRow> },
    Task { task: Task },
    Tasks { tasks: Vec<Task> },
    Analytics { rows: Vec<StageDwell> },
    Kpis { kpis: KpiSnapshot },
    Calendar { ics: String },
}

/// Serialize a message to raw JSON bytes (no length prefix)
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(value)?)
}

/// Parse a message from raw JSON bytes
pub fn decode<T: for<'de> Deserialize<'de>>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Write one length-prefixed frame
pub async fn write_frame<W, T>(
    writer: &mut W,
    value: &T,
    timeout: Duration,
) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = encode(value)?;
    let len = payload.len() as u32;

    let write = async {
        writer.write_all(&len.to_be_bytes()).await?;
        writer.write_all(&payload).await?;
        writer.flush().await?;
        Ok::<(), std::io::Error>(())
    };

    match tokio::time::timeout(timeout, write).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(ProtocolError::Timeout),
    }
}

/// Read one length-prefixed frame
pub async fn read_frame<R, T>(reader: &mut R, timeout: Duration) -> Result<T, ProtocolError>
where
    R: AsyncRead + Unpin,
    T: for<'de> Deserialize<'de>,
{
    let read = async {
        let mut len_bytes = [0u8; 4];
        match reader.read_exact(&mut len_bytes).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(ProtocolError::ConnectionClosed);
            }
            Err(e) => return Err(e.into()),
        }

        let len = u32::from_be_bytes(len_bytes);
        if len > MAX_FRAME_BYTES {
            return Err(ProtocolError::FrameTooLarge(len));
        }

        let mut payload = vec![0u8; len as usize];
        reader.read_exact(&mut payload).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::UnexpectedEof {
                ProtocolError::ConnectionClosed
            } else {
                ProtocolError::Io(e)
            }
        })?;
        decode(&payload)
    };

    match tokio::time::timeout(timeout, read).await {
        Ok(result) => result,
        Err(_) => Err(ProtocolError::Timeout),
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
