//! Access to the remote event store.
//!
//! `EventStore` is the seam the view model talks to; `HttpEventStore` is the
//! implementation that speaks the store's JSON API. Implementations return
//! domain events and never swallow errors.

mod http;

pub use http::HttpEventStore;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::error::CalboardResult;
use crate::event::DomainEvent;
use crate::time::MonthCursor;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Summaries of every event in the month containing the cursor.
    async fn month_previews(&self, cursor: MonthCursor) -> CalboardResult<Vec<DomainEvent>>;

    /// Full events between `start` and `end`.
    async fn events_in_range(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> CalboardResult<Vec<DomainEvent>>;

    async fn get_event(&self, id: &str) -> CalboardResult<DomainEvent>;

    /// Persist a new event. The returned event carries the id the store assigned.
    async fn create_event(&self, event: &DomainEvent) -> CalboardResult<DomainEvent>;

    async fn update_event(&self, id: &str, event: &DomainEvent) -> CalboardResult<DomainEvent>;

    async fn delete_event(&self, id: &str) -> CalboardResult<()>;
}
