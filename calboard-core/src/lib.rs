//! Core types and state for calboard.
//!
//! This crate holds everything between the remote event store and the UI:
//! - `wire` / `mapper` for the JSON representation of events and its conversion
//! - `store` for the HTTP repository
//! - `calendar` for the month view model and its event cache
//! - `panel` for the side panel workflow
//! - `form` for local validation of event input
//! - `grid` for what a month grid widget draws and the signals it sends back

pub mod calendar;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod form;
pub mod grid;
pub mod mapper;
pub mod panel;
pub mod store;
pub mod time;
pub mod wire;

pub use calendar::{CalendarViewModel, CommandOutcome, FetchOutcome};
pub use error::{CalboardError, CalboardResult};
pub use event::{DomainEvent, EventColor};
pub use panel::{PanelCommand, PanelController, PanelState};
pub use time::MonthCursor;
