//! JSON shapes exchanged with the event store.
//!
//! Timestamps stay as strings here; `mapper` owns parsing them so that a bad
//! timestamp surfaces as `MalformedTimestamp` instead of a generic decode error.

use serde::{Deserialize, Serialize};

/// An event as returned by the store.
///
/// Month previews leave out `description`, so it defaults to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_at: String,
    pub finish_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Request body for create and update. Has no `id`; the store assigns it on
/// create and takes it from the path on update.
///
/// A `None` location is left out of the JSON entirely, which the store reads
/// as "unchanged" rather than "cleared".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEventPayload {
    pub title: String,
    pub description: String,
    pub start_at: String,
    pub finish_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl WireEventPayload {
    /// Attach a store id, giving the full DTO the store would echo back.
    pub fn with_id(self, id: impl Into<String>) -> WireEvent {
        WireEvent {
            id: id.into(),
            title: self.title,
            description: self.description,
            start_at: self.start_at,
            finish_at: self.finish_at,
            location: self.location,
        }
    }
}

/// Error body the store sends with 4xx/5xx responses.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub field_errors: Vec<FieldRejection>,
}

impl ErrorBody {
    /// Best human-readable summary of the failure.
    pub fn summary(&self) -> String {
        match (&self.error, &self.message) {
            (Some(error), Some(message)) => format!("{error}: {message}"),
            (None, Some(message)) => message.clone(),
            (Some(error), None) => error.clone(),
            (None, None) => "no details".to_string(),
        }
    }
}

/// A single field the store refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRejection {
    pub field: String,
    #[serde(default)]
    pub rejected_value: Option<serde_json::Value>,
    pub message: String,
}
