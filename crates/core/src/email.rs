// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Outbound email rendering
//!
//! Builds the task-created notification message. Delivery is the mail
//! adapter's problem; rendering is pure.

use chrono::NaiveDate;
use minijinja::{context, Environment};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A rendered, ready-to-send email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum EmailError {
    /// No recipient on the task; the send is skipped, not failed
    #[error("no recipient email")]
    MissingRecipient,
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

const TASK_CREATED_TEMPLATE: &str = r#"<div style="font-family: system-ui; font-size:14px;">
  <h2>New task created</h2>
  <p><strong>Title:</strong> {{ title }}</p>
  {%- if client_name %}
  <p><strong>Client:</strong> {{ client_name }}</p>
  {%- endif %}
  {%- if due_date %}
  <p><strong>Due date:</strong> {{ due_date }}</p>
  {%- endif %}
  {%- if notes %}
  <p><strong>Notes:</strong><br>{{ notes | escape | replace("\n", "<br>") | safe }}</p>
  {%- endif %}
</div>"#;

/// Inputs for the task-created notification
#[derive(Debug, Clone, Default)]
pub struct TaskCreatedEmail {
    pub to: Option<String>,
    pub title: String,
    pub client_name: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Render the task-created notification email
pub fn render_task_created(input: &TaskCreatedEmail) -> Result<EmailMessage, EmailError> {
    let to = input
        .to
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(EmailError::MissingRecipient)?;

    let title = if input.title.trim().is_empty() {
        "Untitled task"
    } else {
        input.title.as_str()
    };

    let mut env = Environment::new();
    // .html name switches on auto-escaping for interpolated fields
    env.add_template("task_created.html", TASK_CREATED_TEMPLATE)?;
    let template = env.get_template("task_created.html")?;

    let html = template.render(context! {
        title => title,
        client_name => input.client_name,
        due_date => input.due_date.map(|d| d.to_string()),
        notes => input.notes,
    })?;

    Ok(EmailMessage {
        to: to.to_string(),
        subject: format!("New task: {title}"),
        html,
    })
}

#[cfg(test)]
#[path = "email_tests.rs"]
mod tests;
