//! Month view model: the visible month, its cached events, and the commands
//! that change them.
//!
//! The cursor, the event cache and the last reported error are `watch` cells,
//! so the panel and any front end can read them and wait for changes. Every
//! month fetch is tagged with a generation number when it is issued; a
//! response is only applied if no newer fetch was issued in the meantime.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::error::{CalboardError, CalboardResult};
use crate::event::DomainEvent;
use crate::panel::{EventLookup, PanelCommand};
use crate::store::EventStore;
use crate::time::MonthCursor;

/// Events from `events` that start on `day`. Time of day is ignored.
pub fn events_for_day(events: &[DomainEvent], day: NaiveDate) -> Vec<DomainEvent> {
    events.iter().filter(|e| e.day() == day).cloned().collect()
}

/// What happened to a month fetch once it resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the cache.
    Applied { count: usize },
    /// A newer fetch was issued while this one was in flight; the response was dropped.
    Stale,
}

/// Result of running a panel command at the view model boundary.
#[derive(Debug, Clone)]
pub enum CommandOutcome {
    Created(DomainEvent),
    Updated(DomainEvent),
    Deleted(String),
    /// The command failed. The cache was not touched and the error has been
    /// reported through `subscribe_errors`.
    Failed(CalboardError),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, CommandOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, Copy)]
struct FetchTicket {
    generation: u64,
    cursor: MonthCursor,
}

pub struct CalendarViewModel<S> {
    store: S,
    cursor: watch::Sender<MonthCursor>,
    events: watch::Sender<Vec<DomainEvent>>,
    last_error: watch::Sender<Option<CalboardError>>,
    generation: AtomicU64,
}

impl<S: EventStore> CalendarViewModel<S> {
    /// A view model on `cursor` with an empty cache. Call `refresh` to load it.
    pub fn new(store: S, cursor: MonthCursor) -> Self {
        CalendarViewModel {
            store,
            cursor: watch::channel(cursor).0,
            events: watch::channel(Vec::new()).0,
            last_error: watch::channel(None).0,
            generation: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cursor(&self) -> MonthCursor {
        *self.cursor.borrow()
    }

    /// Snapshot of the month cache.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.events.borrow().clone()
    }

    pub fn events_for_day(&self, day: NaiveDate) -> Vec<DomainEvent> {
        events_for_day(&self.events.borrow(), day)
    }

    pub fn subscribe_events(&self) -> watch::Receiver<Vec<DomainEvent>> {
        self.events.subscribe()
    }

    pub fn subscribe_cursor(&self) -> watch::Receiver<MonthCursor> {
        self.cursor.subscribe()
    }

    pub fn subscribe_errors(&self) -> watch::Receiver<Option<CalboardError>> {
        self.last_error.subscribe()
    }

    pub fn last_error(&self) -> Option<CalboardError> {
        self.last_error.borrow().clone()
    }

    pub fn clear_error(&self) {
        self.last_error.send_replace(None);
    }

    /// "October 2025"
    pub fn month_label(&self) -> String {
        self.cursor().label()
    }

    pub fn is_current_month(&self) -> bool {
        self.cursor().same_month(MonthCursor::today().date())
    }

    /// Move to `cursor` and fetch its month.
    ///
    /// The cursor changes and the fetch is issued as soon as this is called; the
    /// returned future only waits for the response. Any fetch issued earlier
    /// that resolves later is discarded.
    pub fn set_month(
        &self,
        cursor: MonthCursor,
    ) -> impl Future<Output = CalboardResult<FetchOutcome>> + '_ {
        self.cursor.send_replace(cursor);
        let ticket = self.issue(cursor);
        self.load(ticket)
    }

    /// Fetch the current month again.
    pub fn refresh(&self) -> impl Future<Output = CalboardResult<FetchOutcome>> + '_ {
        let ticket = self.issue(self.cursor());
        self.load(ticket)
    }

    pub fn next_month(&self) -> impl Future<Output = CalboardResult<FetchOutcome>> + '_ {
        self.set_month(self.cursor().next())
    }

    pub fn previous_month(&self) -> impl Future<Output = CalboardResult<FetchOutcome>> + '_ {
        self.set_month(self.cursor().previous())
    }

    pub fn go_to_today(&self) -> impl Future<Output = CalboardResult<FetchOutcome>> + '_ {
        self.set_month(MonthCursor::today())
    }

    fn issue(&self, cursor: MonthCursor) -> FetchTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(generation, month = %cursor.label(), "month fetch issued");
        FetchTicket { generation, cursor }
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.generation
    }

    async fn load(&self, ticket: FetchTicket) -> CalboardResult<FetchOutcome> {
        let result = self.store.month_previews(ticket.cursor).await;

        if !self.is_current(&ticket) {
            debug!(
                generation = ticket.generation,
                month = %ticket.cursor.label(),
                "discarding stale month response"
            );
            return Ok(FetchOutcome::Stale);
        }

        match result {
            Ok(events) => {
                let count = events.len();
                debug!(generation = ticket.generation, count, "month cache replaced");
                self.events.send_replace(events);
                Ok(FetchOutcome::Applied { count })
            }
            Err(e) => {
                self.report("fetch", &e);
                Err(e)
            }
        }
    }

    /// Full events in a range, straight from the store. The cache is not touched.
    pub async fn events_in_range(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> CalboardResult<Vec<DomainEvent>> {
        self.store.events_in_range(start, end).await
    }

    /// Full details of one event, straight from the store.
    pub async fn event(&self, id: &str) -> CalboardResult<DomainEvent> {
        self.store.get_event(id).await
    }

    /// Create `event` in the store and append the stored copy to the cache.
    pub async fn create(&self, event: DomainEvent) -> CalboardResult<DomainEvent> {
        let mut created = self.store.create_event(&event).await?;
        created.color = created.color.or(event.color);

        info!(id = ?created.id, title = %created.title, "event created");
        self.events.send_modify(|events| events.push(created.clone()));
        Ok(created)
    }

    /// Update event `id` in the store and replace the cached copy.
    pub async fn update(&self, id: &str, event: DomainEvent) -> CalboardResult<DomainEvent> {
        let mut updated = self.store.update_event(id, &event).await?;
        updated.color = updated.color.or(event.color);

        info!(id = ?updated.id, title = %updated.title, "event updated");
        self.events.send_modify(|events| {
            for cached in events.iter_mut().filter(|e| e.id == updated.id) {
                *cached = updated.clone();
            }
        });
        Ok(updated)
    }

    /// Delete event `id` in the store and drop it from the cache.
    pub async fn delete(&self, id: &str) -> CalboardResult<()> {
        self.store.delete_event(id).await?;

        info!(id, "event deleted");
        self.events
            .send_modify(|events| events.retain(|e| e.id.as_deref() != Some(id)));
        Ok(())
    }

    /// Run a command from the panel. Failures are logged and published on
    /// `subscribe_errors` instead of being returned as `Err`.
    pub async fn execute(&self, command: PanelCommand) -> CommandOutcome {
        let kind = command.kind();

        let result = match command {
            PanelCommand::Create(event) => self.create(event).await.map(CommandOutcome::Created),
            PanelCommand::Update { id, event } => {
                self.update(&id, event).await.map(CommandOutcome::Updated)
            }
            PanelCommand::Delete(id) => self
                .delete(&id)
                .await
                .map(|()| CommandOutcome::Deleted(id)),
        };

        result.unwrap_or_else(|e| {
            self.report(kind, &e);
            CommandOutcome::Failed(e)
        })
    }

    fn report(&self, operation: &'static str, e: &CalboardError) {
        error!(operation, error = %e, "calendar operation failed");
        self.last_error.send_replace(Some(e.clone()));
    }
}

#[async_trait]
impl<S: EventStore> EventLookup for CalendarViewModel<S> {
    async fn lookup_event(&self, id: &str) -> CalboardResult<DomainEvent> {
        self.event(id).await
    }
}
