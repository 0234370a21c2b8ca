//! Side panel workflow for the selected day.
//!
//! The panel is a single state machine:
//!
//! ```text
//! Closed --select day--> List --add--> AddForm --save/cancel--> List
//!                         |
//!                         +--row--> Details(e) --edit--> EditForm(e) --save--> Details(e')
//!                                     |   ^                  |
//!                                     |   +------back--------+
//!                                     +--back/delete--> List
//! ```
//!
//! Selecting a day from any state lands in `List`, and closing from any state
//! lands in `Closed` with the day cleared. Saves and deletes hand a
//! `PanelCommand` back to the caller, which forwards it to the view model. The
//! panel moves on straight away and does not undo the move if the command
//! later fails.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::calendar::events_for_day;
use crate::error::CalboardResult;
use crate::event::DomainEvent;
use crate::form::{EventForm, FormValidator, ValidationErrors};

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Closed,
    List,
    AddForm,
    Details(DomainEvent),
    EditForm(DomainEvent),
}

impl PanelState {
    fn name(&self) -> &'static str {
        match self {
            PanelState::Closed => "closed",
            PanelState::List => "list",
            PanelState::AddForm => "add-form",
            PanelState::Details(_) => "details",
            PanelState::EditForm(_) => "edit-form",
        }
    }
}

/// A change the panel asks the view model to make in the store.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    Create(DomainEvent),
    Update { id: String, event: DomainEvent },
    Delete(String),
}

impl PanelCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            PanelCommand::Create(_) => "create",
            PanelCommand::Update { .. } => "update",
            PanelCommand::Delete(_) => "delete",
        }
    }
}

/// Read access to full event details, used when a row in the list is opened.
#[async_trait]
pub trait EventLookup: Send + Sync {
    async fn lookup_event(&self, id: &str) -> CalboardResult<DomainEvent>;
}

pub struct PanelController {
    state: PanelState,
    selected_day: watch::Sender<Option<NaiveDate>>,
    day_rx: watch::Receiver<Option<NaiveDate>>,
    events: watch::Receiver<Vec<DomainEvent>>,
}

impl PanelController {
    /// `events` is the view model's month cache. The panel only reads it.
    pub fn new(events: watch::Receiver<Vec<DomainEvent>>) -> Self {
        let (selected_day, day_rx) = watch::channel(None);
        PanelController {
            state: PanelState::Closed,
            selected_day,
            day_rx,
            events,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PanelState::Closed
    }

    pub fn selected_day(&self) -> Option<NaiveDate> {
        *self.selected_day.borrow()
    }

    pub fn subscribe_selected_day(&self) -> watch::Receiver<Option<NaiveDate>> {
        self.selected_day.subscribe()
    }

    /// The event shown in `Details` or being edited in `EditForm`.
    pub fn focused_event(&self) -> Option<&DomainEvent> {
        match &self.state {
            PanelState::Details(e) | PanelState::EditForm(e) => Some(e),
            _ => None,
        }
    }

    fn transition(&mut self, next: PanelState) {
        debug!(from = self.state.name(), to = next.name(), "panel transition");
        self.state = next;
    }

    fn ignored(&self, trigger: &str) {
        debug!(state = self.state.name(), trigger, "panel trigger ignored");
    }

    /// Open the panel on `day`. Always resets to the list, whatever was open before.
    pub fn select_day(&mut self, day: NaiveDate) {
        self.selected_day.send_replace(Some(day));
        self.transition(PanelState::List);
    }

    pub fn close(&mut self) {
        self.selected_day.send_replace(None);
        self.transition(PanelState::Closed);
    }

    pub fn request_add(&mut self) -> bool {
        if self.state != PanelState::List {
            self.ignored("add");
            return false;
        }
        self.transition(PanelState::AddForm);
        true
    }

    pub fn cancel_add(&mut self) -> bool {
        if self.state != PanelState::AddForm {
            self.ignored("cancel");
            return false;
        }
        self.transition(PanelState::List);
        true
    }

    /// Open a row from the list.
    ///
    /// Saved events are re-read through `lookup` to get the full details. If that
    /// fails the summary from the list is shown instead.
    pub async fn select_event<L>(&mut self, summary: DomainEvent, lookup: &L) -> bool
    where
        L: EventLookup + ?Sized,
    {
        if self.state != PanelState::List {
            self.ignored("select-event");
            return false;
        }

        let event = match summary.id.clone() {
            Some(id) => match lookup.lookup_event(&id).await {
                Ok(mut full) => {
                    full.color = full.color.or_else(|| summary.color.clone());
                    full
                }
                Err(e) => {
                    warn!(id = %id, error = %e, "could not load event details, showing summary");
                    summary
                }
            },
            None => summary,
        };

        self.transition(PanelState::Details(event));
        true
    }

    /// Save the add form. On success the panel returns to the list and the
    /// create command for the new draft is returned.
    pub fn save_new(&mut self, form: &EventForm) -> Result<Option<PanelCommand>, ValidationErrors> {
        let day = match (&self.state, self.selected_day()) {
            (PanelState::AddForm, Some(day)) => day,
            _ => {
                self.ignored("save-new");
                return Ok(None);
            }
        };

        let draft = FormValidator::validate(form)?.into_draft(day);
        self.transition(PanelState::List);
        Ok(Some(PanelCommand::Create(draft)))
    }

    /// Back from details to the list, or from the edit form to details.
    pub fn back(&mut self) -> bool {
        let next = match &self.state {
            PanelState::Details(_) => PanelState::List,
            PanelState::EditForm(event) => PanelState::Details(event.clone()),
            _ => {
                self.ignored("back");
                return false;
            }
        };
        self.transition(next);
        true
    }

    /// Delete the event in details. The panel returns to the list either way;
    /// a command is only produced for saved events.
    pub fn request_delete(&mut self) -> Option<PanelCommand> {
        let id = match &self.state {
            PanelState::Details(event) => event.id.clone(),
            _ => {
                self.ignored("delete");
                return None;
            }
        };

        self.transition(PanelState::List);
        id.map(PanelCommand::Delete)
    }

    pub fn request_edit(&mut self) -> bool {
        let next = match &self.state {
            PanelState::Details(event) => PanelState::EditForm(event.clone()),
            _ => {
                self.ignored("edit");
                return false;
            }
        };
        self.transition(next);
        true
    }

    /// Save the edit form. On success the panel shows the edited event and the
    /// update command is returned.
    pub fn save_edit(&mut self, form: &EventForm) -> Result<Option<PanelCommand>, ValidationErrors> {
        let original = match &self.state {
            PanelState::EditForm(event) => event,
            _ => {
                self.ignored("save-edit");
                return Ok(None);
            }
        };

        let edited = FormValidator::validate(form)?.apply_to(original);
        let command = edited.id.clone().map(|id| PanelCommand::Update {
            id,
            event: edited.clone(),
        });

        self.transition(PanelState::Details(edited));
        Ok(command)
    }

    /// The form to show for the current state: defaults when adding, the
    /// focused event's values when editing.
    pub fn form_for_current(&self) -> Option<EventForm> {
        match &self.state {
            PanelState::AddForm => Some(EventForm::default()),
            PanelState::EditForm(event) => Some(EventForm::from_event(event)),
            _ => None,
        }
    }

    /// Events of the month cache that start on the selected day.
    pub fn day_events(&self) -> Vec<DomainEvent> {
        match self.selected_day() {
            Some(day) => events_for_day(&self.events.borrow(), day),
            None => Vec::new(),
        }
    }

    /// Wait until the selected day or the month cache changes, then return the
    /// recomputed day view. `None` once the view model is gone.
    pub async fn day_events_changed(&mut self) -> Option<Vec<DomainEvent>> {
        tokio::select! {
            changed = self.events.changed() => changed.ok()?,
            changed = self.day_rx.changed() => changed.ok()?,
        }
        Some(self.day_events())
    }
}
