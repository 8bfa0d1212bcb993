// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client commands

use anyhow::bail;
use clap::{Args, Subcommand};
use desk_core::client::ClientDraft;
use desk_daemon::{ClientRow, Request, Response};
use serde::Serialize;
use std::fmt;

use crate::client::DaemonClient;
use crate::error::render_error;
use crate::output::{print, print_list, OutputFormat};

#[derive(Args)]
pub struct ClientArgs {
    #[command(subcommand)]
    pub command: ClientCommand,
}

#[derive(Subcommand)]
pub enum ClientCommand {
    /// List clients
    List {
        /// Which clients: active, archived, all
        #[arg(long, default_value = "active")]
        view: String,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Show one client
    Show {
        id: String,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Create a client
    Create {
        /// Client name
        name: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        assigned_to: Option<String>,
        #[arg(long)]
        lender: Option<String>,
        #[arg(long)]
        banker_name: Option<String>,
        #[arg(long)]
        banker_email: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Move a client to a pipeline stage
    Move {
        id: String,
        /// Target stage label, e.g. "Sent to Banker"
        stage: String,
        /// Stage your view showed, for optimistic-concurrency checking
        #[arg(long)]
        from: Option<String>,
    },
    /// Archive a client (kept, hidden from active views)
    Archive { id: String },
    /// Restore an archived client
    Unarchive { id: String },
    /// Permanently delete a client and its history (admin only)
    Delete {
        id: String,
        /// Confirm the irreversible delete
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct ClientLine {
    id: String,
    name: String,
    stage: String,
    days_in_stage: i64,
    tier: String,
    assigned_to: Option<String>,
}

impl From<&ClientRow> for ClientLine {
    fn from(row: &ClientRow) -> Self {
        Self {
            id: row.client.id.0.clone(),
            name: row.client.name.clone(),
            stage: row.client.stage.to_string(),
            days_in_stage: row.days_in_stage,
            tier: format!("{:?}", row.tier).to_lowercase(),
            assigned_to: row.client.assigned_to.clone(),
        }
    }
}

impl fmt::Display for ClientLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<38} {:<24} {:<26} {:>3}d [{}]",
            self.id, self.name, self.stage, self.days_in_stage, self.tier
        )
    }
}

#[derive(Serialize)]
#[serde(transparent)]
struct ClientDetails {
    client: desk_core::Client,
}

impl fmt::Display for ClientDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.client;
        writeln!(f, "Client: {}", c.name)?;
        writeln!(f, "ID: {}", c.id)?;
        writeln!(f, "Stage: {}", c.stage)?;
        if let Some(assigned) = &c.assigned_to {
            writeln!(f, "Assigned: {}", assigned)?;
        }
        if let Some(lender) = &c.lender {
            writeln!(f, "Lender: {}", lender)?;
        }
        if let Some(banker) = &c.banker_name {
            writeln!(f, "Banker: {}", banker)?;
        }
        if c.is_archived {
            writeln!(f, "Archived: yes")?;
        }
        write!(f, "Created: {}", c.created_at)
    }
}

pub async fn handle(client: &DaemonClient, command: ClientCommand) -> anyhow::Result<()> {
    let token = client.require_token()?;

    match command {
        ClientCommand::List { view, format } => {
            let response = client
                .request(Request::ClientList { token, view })
                .await?;
            match response {
                Response::Clients { clients } => {
                    let lines: Vec<ClientLine> = clients.iter().map(ClientLine::from).collect();
                    if lines.is_empty() {
                        println!("No clients found.");
                    } else {
                        print_list(&lines, format);
                    }
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        ClientCommand::Show { id, format } => {
            let response = client.request(Request::ClientGet { token, id }).await?;
            match response {
                Response::Client { client } => {
                    print(&ClientDetails { client }, format);
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        ClientCommand::Create {
            name,
            email,
            phone,
            assigned_to,
            lender,
            banker_name,
            banker_email,
            notes,
        } => {
            let draft = ClientDraft {
                name,
                email,
                phone,
                assigned_to,
                lender,
                banker_name,
                banker_email,
                notes,
                ..ClientDraft::default()
            };
            let response = client.request(Request::ClientCreate { token, draft }).await?;
            match response {
                Response::Client { client } => {
                    println!("Created: {} ({})", client.name, client.id);
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        ClientCommand::Move { id, stage, from } => {
            let response = client
                .request(Request::ClientMove {
                    token,
                    id,
                    to: stage,
                    observed: from,
                })
                .await?;
            match response {
                Response::Client { client } => {
                    println!("{} is now in {}", client.name, client.stage);
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        ClientCommand::Archive { id } => {
            let response = client.request(Request::ClientArchive { token, id }).await?;
            match response {
                Response::Client { client } => {
                    println!("Archived: {}", client.name);
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        ClientCommand::Unarchive { id } => {
            let response = client
                .request(Request::ClientUnarchive { token, id })
                .await?;
            match response {
                Response::Client { client } => {
                    println!("Restored: {}", client.name);
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        ClientCommand::Delete { id, yes } => {
            if !yes {
                bail!("deleting a client is irreversible and removes its history; pass --yes to confirm");
            }
            let response = client.request(Request::ClientDelete { token, id }).await?;
            match response {
                Response::Ok => {
                    println!("Deleted.");
                    Ok(())
                }
                other => unexpected(other),
            }
        }
    }
}

/// Convert an error response to anyhow, bail on anything else unexpected
pub fn unexpected(response: Response) -> anyhow::Result<()> {
    match response {
        Response::Error { kind, message } => Err(render_error(&kind, &message)),
        other => bail!("unexpected response from daemon: {other:?}"),
    }
}
