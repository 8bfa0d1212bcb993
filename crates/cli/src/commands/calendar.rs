// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar export command

use clap::{Args, Subcommand};
use desk_daemon::{Request, Response};
use std::path::PathBuf;

use crate::client::DaemonClient;
use crate::commands::client::unexpected;

#[derive(Args)]
pub struct CalendarArgs {
    #[command(subcommand)]
    pub command: CalendarCommand,
}

#[derive(Subcommand)]
pub enum CalendarCommand {
    /// Export open, dated tasks as an iCalendar file
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

pub async fn handle(client: &DaemonClient, command: CalendarCommand) -> anyhow::Result<()> {
    match command {
        CalendarCommand::Export { out } => {
            let response = client.request(Request::Calendar).await?;
            match response {
                Response::Calendar { ics } => {
                    match out {
                        Some(path) => {
                            std::fs::write(&path, &ics)?;
                            println!("Wrote {}", path.display());
                        }
                        None => println!("{ics}"),
                    }
                    Ok(())
                }
                other => unexpected(other),
            }
        }
    }
}
