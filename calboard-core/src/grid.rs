//! Adapter between the core and a month grid widget.
//!
//! The widget only needs a flat, ordered list of events with a concrete end,
//! and it reports back a single signal: which day was clicked.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::event::{DomainEvent, EventColor};
use crate::panel::PanelController;

/// An event as the grid draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayEvent {
    pub id: Option<String>,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub color: Option<EventColor>,
}

impl From<&DomainEvent> for DisplayEvent {
    fn from(event: &DomainEvent) -> Self {
        DisplayEvent {
            id: event.id.clone(),
            title: event.title.clone(),
            start: event.start,
            end: event.end_or_start(),
            color: event.color.clone(),
        }
    }
}

impl DisplayEvent {
    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

/// Display events ordered by start. Events starting at the same instant keep
/// their cache order.
pub fn display_events(events: &[DomainEvent]) -> Vec<DisplayEvent> {
    let mut display: Vec<DisplayEvent> = events.iter().map(DisplayEvent::from).collect();
    display.sort_by_key(|e| e.start);
    display
}

/// Display events grouped by the day they start on.
pub fn by_day(events: &[DomainEvent]) -> BTreeMap<NaiveDate, Vec<DisplayEvent>> {
    let mut days: BTreeMap<NaiveDate, Vec<DisplayEvent>> = BTreeMap::new();
    for event in display_events(events) {
        days.entry(event.day()).or_default().push(event);
    }
    days
}

/// Signals emitted by the grid widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSignal {
    DayClicked(NaiveDate),
}

/// Hand a grid signal to the panel.
pub fn forward(signal: GridSignal, panel: &mut PanelController) {
    match signal {
        GridSignal::DayClicked(day) => panel.select_day(day),
    }
}
