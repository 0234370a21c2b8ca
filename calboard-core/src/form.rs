//! Add/edit form input and its local validation.
//!
//! Validation here only guards the save transition. The store checks again and
//! may still refuse; that comes back as a `RemoteRejection`.

use std::fmt;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::constants::{DEFAULT_END_TIME, DEFAULT_START_TIME};
use crate::event::DomainEvent;
use crate::time::{at_local, format_hhmm, minutes_of_day, parse_hhmm};

/// Raw form values, as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_time: String,
    pub end_time: String,
}

impl Default for EventForm {
    fn default() -> Self {
        EventForm {
            title: String::new(),
            description: String::new(),
            location: String::new(),
            start_time: DEFAULT_START_TIME.to_string(),
            end_time: DEFAULT_END_TIME.to_string(),
        }
    }
}

impl EventForm {
    /// Prefill the form from an existing event. A missing end shows the start time.
    pub fn from_event(event: &DomainEvent) -> Self {
        EventForm {
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            location: event.location.clone().unwrap_or_default(),
            start_time: format_hhmm(&event.start),
            end_time: format_hhmm(&event.end_or_start()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Location,
    StartTime,
    EndTime,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Location => "Location",
            FormField::StartTime => "Start time",
            FormField::EndTime => "End time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    Pattern,
    InvalidTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FieldErrorKind::Required => write!(f, "{} is required", self.field.label()),
            FieldErrorKind::Pattern => write!(
                f,
                "Only alphanumeric characters, spaces, hyphens, and @ symbols allowed"
            ),
            FieldErrorKind::InvalidTime => {
                write!(f, "{} must be a time in HH:MM format", self.field.label())
            }
        }
    }
}

/// Everything wrong with a form. `time_range` is the form-level start/end
/// check and is kept apart from the per-field errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
    pub time_range: bool,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && !self.time_range
    }

    pub fn for_field(&self, field: FormField) -> Option<&FieldError> {
        self.fields.iter().find(|e| e.field == field)
    }

    pub fn messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self.fields.iter().map(|e| e.to_string()).collect();
        if self.time_range {
            messages.push("Start time must be before end time".to_string());
        }
        messages
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ValidatedForm {
    /// A new draft on `day`.
    pub fn into_draft(self, day: NaiveDate) -> DomainEvent {
        DomainEvent {
            id: None,
            title: self.title,
            description: Some(self.description),
            location: self.location,
            start: at_local(day, self.start),
            end: Some(at_local(day, self.end)),
            color: None,
        }
    }

    /// `original` with the form applied. The event stays on its own day and keeps
    /// its id and colour.
    pub fn apply_to(self, original: &DomainEvent) -> DomainEvent {
        let day = original.day();
        DomainEvent {
            id: original.id.clone(),
            title: self.title,
            description: Some(self.description),
            location: self.location,
            start: at_local(day, self.start),
            end: Some(at_local(day, self.end)),
            color: original.color.clone(),
        }
    }
}

pub struct FormValidator;

impl FormValidator {
    pub fn validate(form: &EventForm) -> Result<ValidatedForm, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_text(&mut errors, FormField::Title, &form.title, true);
        check_text(&mut errors, FormField::Description, &form.description, true);
        check_text(&mut errors, FormField::Location, &form.location, false);

        let start = check_time(&mut errors, FormField::StartTime, &form.start_time);
        let end = check_time(&mut errors, FormField::EndTime, &form.end_time);

        if let (Some(start), Some(end)) = (start, end) {
            if minutes_of_day(start) >= minutes_of_day(end) {
                errors.time_range = true;
            }
        }

        match (start, end) {
            (Some(start), Some(end)) if errors.is_empty() => Ok(ValidatedForm {
                title: form.title.clone(),
                description: form.description.clone(),
                location: if form.location.is_empty() {
                    None
                } else {
                    Some(form.location.clone())
                },
                start,
                end,
            }),
            _ => Err(errors),
        }
    }
}

/// Letters, digits, whitespace, `-` and `@`. The store enforces the same pattern.
static ALLOWED_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9\s\-@]+$").expect("valid text pattern"));

fn check_text(errors: &mut ValidationErrors, field: FormField, value: &str, required: bool) {
    if value.is_empty() {
        if required {
            errors.fields.push(FieldError {
                field,
                kind: FieldErrorKind::Required,
            });
        }
        return;
    }

    if !ALLOWED_TEXT.is_match(value) {
        errors.fields.push(FieldError {
            field,
            kind: FieldErrorKind::Pattern,
        });
    }
}

fn check_time(errors: &mut ValidationErrors, field: FormField, value: &str) -> Option<NaiveTime> {
    if value.is_empty() {
        errors.fields.push(FieldError {
            field,
            kind: FieldErrorKind::Required,
        });
        return None;
    }

    let parsed = parse_hhmm(value);
    if parsed.is_none() {
        errors.fields.push(FieldError {
            field,
            kind: FieldErrorKind::InvalidTime,
        });
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn form(start: &str, end: &str) -> EventForm {
        EventForm {
            title: "Team Sync".into(),
            description: "Weekly planning".into(),
            location: String::new(),
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    #[test]
    fn accepts_start_before_end() {
        let valid = FormValidator::validate(&form("09:00", "10:00")).unwrap();
        assert_eq!(valid.start, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(valid.end, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
        assert_eq!(valid.location, None);
    }

    #[test]
    fn rejects_inverted_range() {
        let errors = FormValidator::validate(&form("10:00", "09:00")).unwrap_err();
        assert!(errors.time_range);
        assert!(errors.fields.is_empty());
        assert_eq!(errors.messages(), vec!["Start time must be before end time"]);
    }

    #[test]
    fn rejects_equal_times() {
        let errors = FormValidator::validate(&form("09:00", "09:00")).unwrap_err();
        assert!(errors.time_range);
    }

    #[test]
    fn reports_every_missing_field() {
        let empty = EventForm {
            title: String::new(),
            description: String::new(),
            ..EventForm::default()
        };

        let errors = FormValidator::validate(&empty).unwrap_err();
        assert_eq!(errors.fields.len(), 2);
        assert_eq!(
            errors.for_field(FormField::Title).map(|e| e.kind),
            Some(FieldErrorKind::Required)
        );
        assert_eq!(
            errors.for_field(FormField::Description).unwrap().to_string(),
            "Description is required"
        );
        assert!(!errors.time_range);
    }

    #[test]
    fn rejects_markup_in_text_fields() {
        let mut input = form("09:00", "10:00");
        input.title = "<script>".into();
        input.location = "Room <b>A</b>".into();

        let errors = FormValidator::validate(&input).unwrap_err();
        assert_eq!(
            errors.for_field(FormField::Title).map(|e| e.kind),
            Some(FieldErrorKind::Pattern)
        );
        assert_eq!(
            errors.for_field(FormField::Location).map(|e| e.kind),
            Some(FieldErrorKind::Pattern)
        );
    }

    #[test]
    fn allows_hyphen_at_and_spaces() {
        let mut input = form("09:00", "10:00");
        input.title = "Sync with ops-team @ HQ".into();
        input.location = "Room 4-B".into();

        let valid = FormValidator::validate(&input).unwrap();
        assert_eq!(valid.location.as_deref(), Some("Room 4-B"));
    }

    #[test]
    fn text_pattern_covers_whole_value() {
        let mut input = form("09:00", "10:00");
        input.description = "Line one\nline two".into();
        assert!(FormValidator::validate(&input).is_ok());

        // Only ASCII letters and digits are allowed
        input.description = "Café".into();
        input.title = "Planning!".into();
        let errors = FormValidator::validate(&input).unwrap_err();
        assert_eq!(
            errors.for_field(FormField::Description).map(|e| e.kind),
            Some(FieldErrorKind::Pattern)
        );
        assert_eq!(
            errors.for_field(FormField::Title).unwrap().to_string(),
            "Only alphanumeric characters, spaces, hyphens, and @ symbols allowed"
        );
    }

    #[test]
    fn bad_time_skips_range_check() {
        let errors = FormValidator::validate(&form("9am", "10:00")).unwrap_err();
        assert_eq!(
            errors.for_field(FormField::StartTime).map(|e| e.kind),
            Some(FieldErrorKind::InvalidTime)
        );
        assert!(!errors.time_range);
    }

    #[test]
    fn draft_lands_on_selected_day() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let event = FormValidator::validate(&form("09:00", "10:30"))
            .unwrap()
            .into_draft(day);

        assert_eq!(event.id, None);
        assert_eq!(event.day(), day);
        assert_eq!(format_hhmm(&event.start), "09:00");
        assert_eq!(event.end.map(|e| format_hhmm(&e)).as_deref(), Some("10:30"));
        assert_eq!(event.description.as_deref(), Some("Weekly planning"));
    }

    #[test]
    fn apply_keeps_id_and_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let original = DomainEvent::draft("Old", at_local(day, NaiveTime::from_hms_opt(8, 0, 0).unwrap()))
            .with_id("42");

        let updated = FormValidator::validate(&form("13:00", "14:00"))
            .unwrap()
            .apply_to(&original);

        assert_eq!(updated.id.as_deref(), Some("42"));
        assert_eq!(updated.title, "Team Sync");
        assert_eq!(updated.day(), day);
        assert_eq!(format_hhmm(&updated.start), "13:00");
    }

    #[test]
    fn prefill_from_event_without_end() {
        let start = DateTime::parse_from_rfc3339("2024-05-01T09:15:00+00:00").unwrap();
        let event = DomainEvent::draft("Standup", start).with_location("Room 1");

        let prefilled = EventForm::from_event(&event);
        assert_eq!(prefilled.start_time, prefilled.end_time);
        assert_eq!(prefilled.start_time, "09:15");
        assert_eq!(prefilled.location, "Room 1");
        assert_eq!(prefilled.description, "");
    }
}
