//! Conversion between store DTOs and domain events.

use crate::error::{CalboardError, CalboardResult};
use crate::event::DomainEvent;
use crate::time::parse_timestamp;
use crate::wire::{WireEvent, WireEventPayload};

/// Convert a store event into a domain event.
///
/// Fails with `MalformedTimestamp` when either timestamp does not parse, or
/// when `finishAt` is before `startAt`.
pub fn to_domain(dto: WireEvent) -> CalboardResult<DomainEvent> {
    let start = parse_timestamp("startAt", &dto.start_at)?;
    let end = parse_timestamp("finishAt", &dto.finish_at)?;
    if end < start {
        return Err(CalboardError::MalformedTimestamp {
            field: "finishAt",
            value: dto.finish_at,
        });
    }

    Ok(DomainEvent {
        id: Some(dto.id),
        title: dto.title,
        description: non_empty(dto.description),
        location: dto.location.and_then(non_empty),
        start,
        end: Some(end),
        color: None,
    })
}

/// Convert a list of store events, stopping at the first malformed one.
pub fn to_domains(dtos: Vec<WireEvent>) -> CalboardResult<Vec<DomainEvent>> {
    dtos.into_iter().map(to_domain).collect()
}

/// Build the create/update body for an event.
///
/// A missing end becomes a zero-length event (`finishAt == startAt`), and a
/// missing location is left out of the body.
pub fn to_wire(event: &DomainEvent) -> WireEventPayload {
    WireEventPayload {
        title: event.title.clone(),
        description: event.description.clone().unwrap_or_default(),
        start_at: event.start.to_rfc3339(),
        finish_at: event.end_or_start().to_rfc3339(),
        location: event.location.clone(),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
