// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Calendar feed
//!
//! Renders open tasks with a due date as an iCalendar document of all-day
//! events. UIDs are derived from the task id so a subscribed calendar
//! updates entries on refetch instead of duplicating them.

use crate::client::ClientId;
use crate::task::Task;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use std::collections::HashMap;

const PRODID: &str = "-//Mortgage Desk//Tasks//EN";
const UID_DOMAIN: &str = "mortgagedesk";

/// Escape ICS text values: backslash, newline, comma, semicolon
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// YYYYMMDD for all-day DTSTART/DTEND values
fn ymd(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// Render open, dated tasks as a `text/calendar` document.
///
/// Events are ordered by due date so repeated exports are byte-stable for
/// unchanged data. `client_names` enriches summaries for tasks attached to
/// a client.
pub fn tasks_to_ics(
    tasks: &[Task],
    client_names: &HashMap<ClientId, String>,
    now: DateTime<Utc>,
) -> String {
    let dtstamp = now.format("%Y%m%dT%H%M%SZ").to_string();

    let mut dated: Vec<(&Task, NaiveDate)> = tasks
        .iter()
        .filter(|t| t.is_open())
        .filter_map(|t| t.due_date.map(|d| (t, d)))
        .collect();
    dated.sort_by_key(|(t, due)| (*due, t.id.0.clone()));

    let mut lines: Vec<String> = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{PRODID}"),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];

    for (task, due) in dated {
        let client_name = task
            .client_id
            .as_ref()
            .and_then(|id| client_names.get(id))
            .filter(|name| !name.is_empty());

        let summary = match client_name {
            Some(name) => format!("{} - {}", task.title, name),
            None => task.title.clone(),
        };

        lines.push("BEGIN:VEVENT".to_string());
        // All-day event on the due date; DTEND is exclusive, so the next day
        lines.push(format!("DTSTART;VALUE=DATE:{}", ymd(due)));
        lines.push(format!("DTEND;VALUE=DATE:{}", ymd(due + Duration::days(1))));
        lines.push(format!("DTSTAMP:{dtstamp}"));
        lines.push(format!("UID:{}@{UID_DOMAIN}", task.id));
        lines.push(format!("SUMMARY:{}", escape_text(&summary)));
        if let Some(notes) = task.notes.as_deref().filter(|n| !n.is_empty()) {
            lines.push(format!("DESCRIPTION:{}", escape_text(notes)));
        }
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join("\r\n")
}

#[cfg(test)]
#[path = "calendar_tests.rs"]
mod tests;
