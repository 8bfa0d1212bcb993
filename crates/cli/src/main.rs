// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! desk - Mortgage Desk CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod client;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::client::DaemonClient;
use commands::{auth, calendar, client as client_cmd, daemon, insights, task};

#[derive(Parser)]
#[command(
    name = "desk",
    version,
    about = "Mortgage Desk - client pipeline operations"
)]
struct Cli {
    /// State directory override (defaults to the platform state dir)
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Client pipeline management
    Client(client_cmd::ClientArgs),
    /// Task management
    Task(task::TaskArgs),
    /// Average days per pipeline stage
    Analytics(insights::AnalyticsArgs),
    /// Dashboard headline numbers
    Kpi(insights::KpiArgs),
    /// Calendar export of open tasks
    Calendar(calendar::CalendarArgs),
    /// Sign in
    Login(auth::LoginArgs),
    /// Sign out
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Password reset
    ResetPassword(auth::ResetArgs),
    /// Daemon management
    Daemon(daemon::DaemonArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DESK_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        // No daemon connection needed
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
        Commands::Daemon(args) => daemon::handle(cli.state_dir, args.command).await,

        // Everything else goes through the daemon
        command => {
            let client = DaemonClient::connect_or_start(cli.state_dir).await?;
            match command {
                Commands::Client(args) => client_cmd::handle(&client, args.command).await,
                Commands::Task(args) => task::handle(&client, args.command).await,
                Commands::Analytics(args) => insights::analytics(&client, args).await,
                Commands::Kpi(args) => insights::kpis(&client, args).await,
                Commands::Calendar(args) => calendar::handle(&client, args.command).await,
                Commands::Login(args) => auth::login(&client, args).await,
                Commands::Logout => auth::logout(&client).await,
                Commands::Whoami => auth::whoami(&client).await,
                Commands::ResetPassword(args) => auth::reset(&client, args).await,
                Commands::Daemon(_) | Commands::Completions { .. } => unreachable!(),
            }
        }
    }
}
