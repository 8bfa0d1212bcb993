// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity commands: login, logout, whoami, password reset

use anyhow::bail;
use clap::{Args, Subcommand};
use desk_daemon::{Request, Response};
use std::io::Write;

use crate::client::DaemonClient;
use crate::commands::client::unexpected;

#[derive(Args)]
pub struct LoginArgs {
    /// Profile email
    #[arg(long)]
    pub email: String,
    /// Password; prompted on stdin when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ResetArgs {
    #[command(subcommand)]
    pub command: ResetCommand,
}

#[derive(Subcommand)]
pub enum ResetCommand {
    /// Request a password reset token for an email
    Request { email: String },
    /// Complete a reset with the token
    Confirm {
        token: String,
        /// New password; prompted on stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
}

fn read_password(prompt: &str) -> anyhow::Result<String> {
    eprint!("{prompt}: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        bail!("empty password");
    }
    Ok(password)
}

pub async fn login(client: &DaemonClient, args: LoginArgs) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password("Password")?,
    };

    let response = client
        .request(Request::SignIn {
            email: args.email,
            password,
        })
        .await?;

    match response {
        Response::Session { token, actor } => {
            client.save_token(&token)?;
            println!("Signed in as {} ({})", actor.name, actor.role);
            Ok(())
        }
        other => unexpected(other),
    }
}

pub async fn logout(client: &DaemonClient) -> anyhow::Result<()> {
    if let Some(token) = client.load_token() {
        let _ = client.request(Request::SignOut { token }).await;
    }
    client.clear_token()?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(client: &DaemonClient) -> anyhow::Result<()> {
    let token = client.require_token()?;
    let response = client.request(Request::WhoAmI { token }).await?;
    match response {
        Response::Actor { actor } => {
            println!("{} <{}> ({})", actor.name, actor.email, actor.role);
            Ok(())
        }
        other => unexpected(other),
    }
}

pub async fn reset(client: &DaemonClient, args: ResetArgs) -> anyhow::Result<()> {
    match args.command {
        ResetCommand::Request { email } => {
            let response = client.request(Request::ResetRequest { email }).await?;
            match response {
                Response::ResetToken { token } => {
                    // The same message either way: requests never reveal
                    // which emails exist
                    println!("If that profile exists, a reset token was issued.");
                    if let Some(token) = token {
                        println!("Token: {token}");
                    }
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        ResetCommand::Confirm { token, password } => {
            let password = match password {
                Some(password) => password,
                None => read_password("New password")?,
            };
            let response = client
                .request(Request::ResetConfirm {
                    token,
                    new_password: password,
                })
                .await?;
            match response {
                Response::Ok => {
                    println!("Password updated; sign in again.");
                    client.clear_token()?;
                    Ok(())
                }
                other => unexpected(other),
            }
        }
    }
}
