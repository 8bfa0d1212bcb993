// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon management commands

use clap::{Args, Subcommand};
use desk_daemon::{Request, Response};
use std::path::PathBuf;

use crate::client::{ClientError, DaemonClient};
use crate::commands::client::unexpected;

#[derive(Args)]
pub struct DaemonArgs {
    #[command(subcommand)]
    pub command: DaemonCommand,
}

#[derive(Subcommand)]
pub enum DaemonCommand {
    /// Start the daemon if it is not running
    Start,
    /// Ask a running daemon to shut down
    Stop,
    /// Show daemon status
    Status,
}

pub async fn handle(state_dir: Option<PathBuf>, command: DaemonCommand) -> anyhow::Result<()> {
    match command {
        DaemonCommand::Start => {
            let client = DaemonClient::connect_or_start(state_dir).await?;
            let _ = client.request(Request::Ping).await?;
            println!("Daemon running at {}", client.config().socket_path.display());
            Ok(())
        }

        DaemonCommand::Stop => {
            match DaemonClient::connect(state_dir).await {
                Ok(client) => {
                    match client.request(Request::Shutdown).await {
                        Ok(Response::ShuttingDown) => {
                            println!("Daemon shutting down.");
                            Ok(())
                        }
                        Ok(other) => unexpected(other),
                        // The daemon may exit before the response flushes
                        Err(ClientError::Protocol(_)) | Err(ClientError::DaemonNotRunning) => {
                            println!("Daemon shutting down.");
                            Ok(())
                        }
                        Err(e) => Err(e.into()),
                    }
                }
                Err(ClientError::DaemonNotRunning) => {
                    println!("Daemon is not running.");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }

        DaemonCommand::Status => {
            match DaemonClient::connect(state_dir).await {
                Ok(client) => match client.request(Request::Status).await {
                    Ok(Response::Status {
                        uptime_secs,
                        clients,
                        tasks,
                    }) => {
                        println!("Daemon: running");
                        println!("Uptime: {uptime_secs}s");
                        println!("Clients: {clients}");
                        println!("Tasks: {tasks}");
                        Ok(())
                    }
                    Ok(other) => unexpected(other),
                    Err(_) => {
                        println!("Daemon: not responding");
                        Ok(())
                    }
                },
                Err(ClientError::DaemonNotRunning) => {
                    println!("Daemon: not running");
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
