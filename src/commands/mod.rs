pub mod add;
pub mod day;
pub mod delete;
pub mod edit;
pub mod init_config;
pub mod month;
pub mod show;

use anyhow::{Context, Result};
use calboard_core::form::{EventForm, ValidationErrors};
use calboard_core::store::EventStore;
use calboard_core::{CalendarViewModel, CommandOutcome, MonthCursor, PanelCommand, PanelController};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use tracing::debug;

use crate::render::Render;

/// Form values given on the command line. `None` keeps what the form already has.
pub struct FormChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl FormChanges {
    pub fn apply(self, form: &mut EventForm) {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(location) = self.location {
            form.location = location;
        }
        if let Some(start) = self.start {
            form.start_time = start;
        }
        if let Some(end) = self.end {
            form.end_time = end;
        }
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{value}', expected YYYY-MM-DD"))
}

/// Load the month around `day` and open the panel on it.
pub async fn open_day<S: EventStore>(
    vm: &CalendarViewModel<S>,
    day: NaiveDate,
) -> Result<PanelController> {
    vm.set_month(MonthCursor::new(day)).await?;

    let mut panel = PanelController::new(vm.subscribe_events());
    panel.select_day(day);
    Ok(panel)
}

/// Walk the panel to the details of event `id`, the way a click on its row would.
pub async fn open_event<S: EventStore>(
    vm: &CalendarViewModel<S>,
    id: &str,
) -> Result<PanelController> {
    let event = vm.event(id).await?;
    let mut panel = open_day(vm, event.day()).await?;

    let summary = panel
        .day_events()
        .into_iter()
        .find(|e| e.id.as_deref() == Some(id))
        .unwrap_or(event);
    panel.select_event(summary, vm).await;

    Ok(panel)
}

/// Hand a panel command to the view model and print what happened.
pub async fn execute<S: EventStore>(
    vm: &CalendarViewModel<S>,
    command: Option<PanelCommand>,
) -> Result<()> {
    let Some(command) = command else {
        println!("{}", "Nothing to do".dimmed());
        return Ok(());
    };

    debug!(kind = command.kind(), "handing panel command to view model");
    match vm.execute(command).await {
        CommandOutcome::Failed(e) => Err(e.into()),
        outcome => {
            println!("{}", outcome.render());
            Ok(())
        }
    }
}

pub fn invalid_form(errors: ValidationErrors) -> anyhow::Error {
    eprintln!("{}", errors.render());
    anyhow::anyhow!("Event not saved")
}
