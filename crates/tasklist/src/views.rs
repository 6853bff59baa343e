//! Plain-text rendering of store state for the terminal views.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDateTime};
use colored::{ColoredString, Colorize};

use crate::models::{Task, TaskStatus};
use crate::store::StoreState;

/// Render the task list view.
#[must_use]
pub fn render_list(state: &StoreState) -> String {
    let mut out = String::new();

    if let Some(error) = &state.error {
        let _ = writeln!(out, "{}", error.red());
    }

    if !state.has_tasks() {
        let _ = writeln!(out, "{}", "No tasks yet.".dimmed());
        return out;
    }

    for task in &state.tasks {
        let _ = writeln!(
            out,
            "{:<14} {}  {}",
            status_badge(task.status),
            task.title.bold(),
            task.id.dimmed()
        );
    }
    out
}

/// Render one task in detail.
#[must_use]
pub fn render_task(task: &Task) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", task.title.bold());
    let _ = writeln!(out, "  id:          {}", task.id);
    let _ = writeln!(
        out,
        "  status:      {} ({})",
        status_badge(task.status),
        task.status_description
    );
    if let Some(description) = &task.description {
        let _ = writeln!(out, "  description: {description}");
    }
    if let Some(created) = &task.created_at {
        let _ = writeln!(out, "  created:     {}", format_timestamp(created));
    }
    if let Some(updated) = &task.updated_at {
        let _ = writeln!(out, "  updated:     {}", format_timestamp(updated));
    }
    out
}

/// Colored status label.
#[must_use]
pub fn status_badge(status: TaskStatus) -> ColoredString {
    match status {
        TaskStatus::Pending => status.label().yellow(),
        TaskStatus::InProgress => status.label().cyan(),
        TaskStatus::Completed => status.label().green(),
    }
}

/// Format a server timestamp as `YYYY-MM-DD HH:MM`.
///
/// Accepts RFC 3339 and zone-less ISO local date-times; anything else is
/// returned unchanged.
#[must_use]
pub fn format_timestamp(raw: &str) -> String {
    const OUTPUT: &str = "%Y-%m-%d %H:%M";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(OUTPUT).to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format(OUTPUT).to_string();
    }
    raw.to_string()
}
