//! Domain event types.
//!
//! These are the events the view model, the panel and the grid work with.
//! The store's JSON shape lives in `wire`, and `mapper` converts between the two.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar event as the UI sees it.
///
/// `id` is `None` for a draft that has not been saved to the store yet.
/// When `end` is present it is never before `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<FixedOffset>,
    pub end: Option<DateTime<FixedOffset>>,
    /// Display colours for the grid. Never sent to the store.
    pub color: Option<EventColor>,
}

/// Colour pair used by the grid widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventColor {
    pub primary: String,
    pub secondary: String,
}

impl DomainEvent {
    /// An unsaved event with only the required fields set.
    pub fn draft(title: impl Into<String>, start: DateTime<FixedOffset>) -> Self {
        DomainEvent {
            id: None,
            title: title.into(),
            description: None,
            location: None,
            start,
            end: None,
            color: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_end(mut self, end: DateTime<FixedOffset>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// End time, collapsing a missing end onto the start.
    pub fn end_or_start(&self) -> DateTime<FixedOffset> {
        self.end.unwrap_or(self.start)
    }

    /// Calendar day the event starts on, in the event's own offset.
    pub fn day(&self) -> NaiveDate {
        self.start.date_naive()
    }
}

impl fmt::Display for DomainEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
