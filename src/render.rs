//! Terminal rendering for calboard types.
//!
//! Extension trait adding coloured output to core types using owo_colors.

use std::collections::BTreeMap;

use calboard_core::form::ValidationErrors;
use calboard_core::grid::DisplayEvent;
use calboard_core::time::{format_day_label, format_hhmm, format_time_range};
use calboard_core::{CommandOutcome, DomainEvent};
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DisplayEvent {
    fn render(&self) -> String {
        let time = if self.end == self.start {
            format!("{:>13}", format_hhmm(&self.start))
        } else {
            format_time_range(&self.start, Some(&self.end))
        };
        let id = format!("[{}]", self.id.as_deref().unwrap_or("unsaved"));

        format!("  {} {} {}", time, self.title, id.dimmed())
    }
}

impl Render for DomainEvent {
    fn render(&self) -> String {
        let mut lines = vec![self.title.bold().to_string()];

        lines.push(format!(
            "  {}  {}",
            format_day_label(self.day()),
            format_time_range(&self.start, self.end.as_ref()).dimmed()
        ));
        if let Some(location) = &self.location {
            lines.push(format!("  📍 {location}"));
        }
        if let Some(description) = &self.description {
            lines.push(String::new());
            lines.push(format!("  {description}"));
        }
        if let Some(id) = &self.id {
            lines.push(format!("  {}", format!("id: {id}").dimmed()));
        }

        lines.join("\n")
    }
}

impl Render for CommandOutcome {
    fn render(&self) -> String {
        match self {
            CommandOutcome::Created(event) => format!("{} {}", "+ Created".green(), event),
            CommandOutcome::Updated(event) => format!("{} {}", "~ Updated".yellow(), event),
            CommandOutcome::Deleted(id) => format!("{} {}", "- Deleted".red(), id),
            CommandOutcome::Failed(e) => format!("{} {}", "✗ Failed".red(), e),
        }
    }
}

impl Render for ValidationErrors {
    fn render(&self) -> String {
        self.messages()
            .iter()
            .map(|m| format!("{} {}", "✗".red(), m))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Heading for a day: "Today", "Tomorrow", or the full date.
fn day_heading(day: NaiveDate) -> String {
    let today = Local::now().date_naive();
    match (day - today).num_days() {
        0 => format!("Today, {}", day.format("%B %-d")),
        1 => format!("Tomorrow, {}", day.format("%B %-d")),
        _ => format_day_label(day),
    }
}

pub fn day(day: NaiveDate, events: &[DisplayEvent]) -> String {
    let mut lines = vec![day_heading(day).bold().to_string()];

    if events.is_empty() {
        lines.push(format!("  {}", "No events".dimmed()));
    }
    lines.extend(events.iter().map(Render::render));

    lines.join("\n")
}

pub fn month(
    label: &str,
    is_current: bool,
    days: &BTreeMap<NaiveDate, Vec<DisplayEvent>>,
) -> String {
    let mut header = format!("📅 {}", label.bold());
    if is_current {
        header.push_str(&format!(" {}", "(this month)".dimmed()));
    }

    let mut lines = vec![header];
    if days.is_empty() {
        lines.push(format!("  {}", "No events".dimmed()));
    }

    for (date, events) in days {
        lines.push(String::new());
        lines.push(day(*date, events));
    }

    lines.join("\n")
}
