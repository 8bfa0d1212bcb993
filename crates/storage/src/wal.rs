// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable storage
//!
//! Newline-delimited JSON entries with CRC32 checksums. Every append is
//! fsync'd before returning. On open, a corrupted tail (torn write, checksum
//! mismatch) truncates the log at the last valid entry.

use crate::operation::Operation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single entry in the write-ahead log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalEntry {
    /// Monotonically increasing sequence number
    pub seq: u64,
    /// When the entry was appended (metadata; operations carry their own
    /// domain timestamps)
    pub at: DateTime<Utc>,
    /// The operation being recorded
    pub op: Operation,
    /// CRC32 checksum of the serialized operation
    pub checksum: u32,
}

impl WalEntry {
    fn new(seq: u64, op: Operation) -> Self {
        let checksum = Self::calculate_checksum(&op);
        Self {
            seq,
            at: Utc::now(),
            op,
            checksum,
        }
    }

    fn calculate_checksum(op: &Operation) -> u32 {
        let json = serde_json::to_string(op).unwrap_or_default();
        crc32fast::hash(json.as_bytes())
    }

    /// Verify the checksum matches the operation
    pub fn verify(&self) -> bool {
        self.checksum == Self::calculate_checksum(&self.op)
    }
}

/// Write-ahead log for durable operation storage
pub struct Wal {
    file: File,
    sequence: u64,
    /// Test-only failpoint for the next append
    #[cfg(test)]
    fail_next: bool,
}

impl Wal {
    /// Open or create a WAL at the given path.
    ///
    /// Scans existing entries to find the next sequence number. A corrupted
    /// tail is truncated so new appends continue from the last valid entry.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut sequence = 0;
        if path.exists() {
            let (last_seq, valid_bytes, corrupted) = Self::scan(path)?;
            sequence = last_seq;
            if corrupted {
                tracing::warn!(
                    path = %path.display(),
                    valid_bytes,
                    "truncating corrupted WAL tail"
                );
                let file = OpenOptions::new().write(true).open(path)?;
                file.set_len(valid_bytes)?;
                file.sync_all()?;
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file,
            sequence,
            #[cfg(test)]
            fail_next: false,
        })
    }

    /// Arm the failpoint: the next append returns an IO error without
    /// writing anything.
    #[cfg(test)]
    pub(crate) fn fail_next_append(&mut self) {
        self.fail_next = true;
    }

    /// Scan a WAL file: returns (last valid sequence, byte length of the
    /// valid prefix, whether a corrupted tail was found).
    fn scan(path: &Path) -> Result<(u64, u64, bool), WalError> {
        let reader = BufReader::new(File::open(path)?);

        let mut last_seq = 0;
        let mut valid_bytes: u64 = 0;
        let mut corrupted = false;

        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                // A torn write can leave invalid bytes; treat as corruption
                Err(_) => {
                    corrupted = true;
                    break;
                }
            };
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(&line) {
                Ok(entry) if entry.verify() => {
                    last_seq = entry.seq;
                    valid_bytes += line.len() as u64 + 1;
                }
                _ => {
                    corrupted = true;
                    break;
                }
            }
        }

        Ok((last_seq, valid_bytes, corrupted))
    }

    /// Append an operation to the log.
    ///
    /// The operation is durably persisted (fsync'd) before this returns.
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        #[cfg(test)]
        if self.fail_next {
            self.fail_next = false;
            return Err(WalError::Io(io::Error::other("injected append failure")));
        }

        self.sequence += 1;
        let entry = WalEntry::new(self.sequence, op.clone());
        let line = serde_json::to_string(&entry)?;

        writeln!(self.file, "{}", line)?;
        self.file.sync_all()?;
        Ok(self.sequence)
    }

    /// Get the current sequence number
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Replay all valid operations from the log.
    ///
    /// A missing file is an empty log. Replay stops at the first invalid
    /// entry (torn write or checksum mismatch).
    pub fn replay(path: &Path) -> Result<Vec<Operation>, WalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let reader = BufReader::new(file);
        let mut ops = Vec::new();

        for line in reader.lines() {
            let Ok(line) = line else { break };
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(&line) {
                Ok(entry) if entry.verify() => ops.push(entry.op),
                _ => break,
            }
        }

        Ok(ops)
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
