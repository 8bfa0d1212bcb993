// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analytics and KPI commands

use clap::Args;
use desk_daemon::{Request, Response};

use crate::client::DaemonClient;
use crate::commands::client::unexpected;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct AnalyticsArgs {
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct KpiArgs {
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

pub async fn analytics(client: &DaemonClient, args: AnalyticsArgs) -> anyhow::Result<()> {
    let token = client.require_token()?;
    let response = client.request(Request::Analytics { token }).await?;

    match response {
        Response::Analytics { rows } => {
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
                OutputFormat::Text => {
                    println!("{:<26} {:>9} {:>8}", "STAGE", "AVG DAYS", "SAMPLES");
                    println!("{}", "-".repeat(45));
                    for row in rows {
                        println!(
                            "{:<26} {:>9.2} {:>8}",
                            row.stage.to_string(),
                            row.avg_days,
                            row.samples
                        );
                    }
                }
            }
            Ok(())
        }
        other => unexpected(other),
    }
}

pub async fn kpis(client: &DaemonClient, args: KpiArgs) -> anyhow::Result<()> {
    let token = client.require_token()?;
    let response = client.request(Request::Kpis { token }).await?;

    match response {
        Response::Kpis { kpis } => {
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&kpis)?),
                OutputFormat::Text => {
                    println!("Active clients:        {}", kpis.active_clients);
                    println!("Sent to banker:        {}", kpis.sent_to_banker);
                    println!("Overdue tasks:         {}", kpis.tasks_overdue);
                    println!("Completed this month:  {}", kpis.completed_this_month);
                }
            }
            Ok(())
        }
        other => unexpected(other),
    }
}
