// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mortgage Desk daemon (deskd)
//!
//! Background process that owns the store and serves the CLI over a Unix
//! socket. One instance per state directory.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::PathBuf;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use desk_daemon::lifecycle::{self, Config};
use desk_daemon::server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Optional positional argument: the state directory
    let state_dir = std::env::args().nth(1).map(PathBuf::from);
    let config = Config::resolve(state_dir)?;

    std::fs::create_dir_all(&config.state_dir)?;
    let _log_guard = setup_logging(&config)?;

    info!(state_dir = %config.state_dir.display(), "starting deskd");

    let mut daemon = match lifecycle::startup(&config).await {
        Ok(daemon) => daemon,
        Err(e) => {
            eprintln!("deskd failed to start: {e}");
            error!("failed to start daemon: {}", e);
            return Err(e.into());
        }
    };

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(socket = %config.socket_path.display(), "daemon ready");

    // Signal ready for the parent process (the CLI waits for this line)
    println!("READY");

    loop {
        tokio::select! {
            result = daemon.listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        if let Err(e) = server::handle_connection(&mut daemon, stream).await {
                            error!("error handling connection: {}", e);
                        }
                    }
                    Err(e) => {
                        error!("error accepting connection: {}", e);
                    }
                }

                if daemon.shutdown_requested {
                    info!("shutdown requested over the socket");
                    break;
                }
            }

            _ = sigterm.recv() => {
                info!("received SIGTERM");
                break;
            }

            _ = sigint.recv() => {
                info!("received SIGINT");
                break;
            }
        }
    }

    daemon.cleanup();
    info!("daemon stopped");
    Ok(())
}

/// Set up logging to the daemon log file; returns the guard that flushes
/// the non-blocking writer on drop.
fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, Box<dyn std::error::Error>> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    let filter = tracing_subscriber::EnvFilter::try_from_env("DESK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(guard)
}
