// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task commands

use anyhow::bail;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use desk_core::client::ClientId;
use desk_core::task::{Task, TaskDraft, TaskStatus};
use desk_daemon::{Request, Response};
use serde::Serialize;
use std::fmt;

use crate::client::DaemonClient;
use crate::commands::client::unexpected;
use crate::output::{print_list, OutputFormat};

#[derive(Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    pub command: TaskCommand,
}

#[derive(Subcommand)]
pub enum TaskCommand {
    /// List tasks
    List {
        /// open, overdue, today, upcoming, completed, all
        #[arg(long, default_value = "open")]
        filter: String,
        #[arg(long, value_enum, default_value_t)]
        format: OutputFormat,
    },
    /// Add a task
    Add {
        /// Task title
        title: String,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Client id this task belongs to
        #[arg(long)]
        client: Option<String>,
        /// Assignee display name
        #[arg(long)]
        assignee: Option<String>,
        /// Assignee email; the task-created notification goes here
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark a task completed
    Done { id: String },
    /// Reopen a completed task
    Reopen { id: String },
    /// Delete a task
    Rm {
        id: String,
        /// Confirm the delete
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Serialize)]
struct TaskLine {
    id: String,
    title: String,
    status: String,
    due_date: Option<NaiveDate>,
    assigned_to: Option<String>,
}

impl From<&Task> for TaskLine {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.0.clone(),
            title: task.title.clone(),
            status: match task.status {
                TaskStatus::Open => "open".to_string(),
                TaskStatus::Completed => "completed".to_string(),
            },
            due_date: task.due_date,
            assigned_to: task.assigned_to.clone(),
        }
    }
}

impl fmt::Display for TaskLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let due = self
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "{:<38} {:<32} {:<10} {:<12}",
            self.id, self.title, self.status, due
        )
    }
}

pub async fn handle(client: &DaemonClient, command: TaskCommand) -> anyhow::Result<()> {
    let token = client.require_token()?;

    match command {
        TaskCommand::List { filter, format } => {
            let response = client.request(Request::TaskList { token, filter }).await?;
            match response {
                Response::Tasks { tasks } => {
                    let lines: Vec<TaskLine> = tasks.iter().map(TaskLine::from).collect();
                    if lines.is_empty() {
                        println!("No tasks found.");
                    } else {
                        print_list(&lines, format);
                    }
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        TaskCommand::Add {
            title,
            due,
            client: client_id,
            assignee,
            email,
            notes,
        } => {
            let draft = TaskDraft {
                title,
                due_date: due,
                client_id: client_id.map(|id| ClientId::from(id.as_str())),
                assigned_to: assignee,
                assignee_email: email,
                notes,
            };
            let response = client.request(Request::TaskCreate { token, draft }).await?;
            match response {
                Response::Task { task } => {
                    println!("Created: {} ({})", task.title, task.id);
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        TaskCommand::Done { id } => {
            let response = client.request(Request::TaskComplete { token, id }).await?;
            match response {
                Response::Task { task } => {
                    println!("Completed: {}", task.title);
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        TaskCommand::Reopen { id } => {
            let response = client.request(Request::TaskReopen { token, id }).await?;
            match response {
                Response::Task { task } => {
                    println!("Reopened: {}", task.title);
                    Ok(())
                }
                other => unexpected(other),
            }
        }

        TaskCommand::Rm { id, yes } => {
            if !yes {
                bail!("pass --yes to confirm the delete");
            }
            let response = client.request(Request::TaskDelete { token, id }).await?;
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
