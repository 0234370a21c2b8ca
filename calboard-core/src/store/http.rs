//! HTTP client for the event store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reqwest::{Response, StatusCode};
use tracing::debug;
use url::Url;

use crate::config::CalboardConfig;
use crate::error::{CalboardError, CalboardResult};
use crate::event::DomainEvent;
use crate::mapper::{to_domain, to_domains, to_wire};
use crate::store::EventStore;
use crate::time::MonthCursor;
use crate::wire::{ErrorBody, WireEvent};

const EVENTS: &str = "events";

/// Event store reached over HTTP/JSON.
pub struct HttpEventStore {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpEventStore {
    pub fn new(config: &CalboardConfig) -> CalboardResult<Self> {
        Self::with_base_url(config.api_url()?, config.request_timeout())
    }

    pub fn with_base_url(base_url: Url, timeout: Duration) -> CalboardResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(CalboardError::Config(format!(
                "'{base_url}' cannot be used as a base URL"
            )));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpEventStore { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended as escaped path segments.
    fn url(&self, segments: &[&str]) -> CalboardResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CalboardError::Config(format!("'{}' cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turn a non-2xx response into a `RemoteRejection`, keeping the store's own
/// message when the body has one.
async fn check(resp: Response) -> CalboardResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.map_err(|e| {
        CalboardError::NetworkFailure(format!("reading {status} error body: {e}"))
    })?;
    Err(rejection(status, &text))
}

fn rejection(status: StatusCode, body: &str) -> CalboardError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => CalboardError::RemoteRejection {
            status: status.as_u16(),
            message: err.summary(),
            field_errors: err.field_errors,
        },
        Err(_) => CalboardError::RemoteRejection {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.canonical_reason().unwrap_or("no details").to_string()
            } else {
                body.to_string()
            },
            field_errors: Vec::new(),
        },
    }
}

#[async_trait]
impl EventStore for HttpEventStore {
    /// GET /events/previews/month?date=
    async fn month_previews(&self, cursor: MonthCursor) -> CalboardResult<Vec<DomainEvent>> {
        let url = self.url(&[EVENTS, "previews", "month"])?;
        let date = cursor.query_timestamp();
        debug!(%url, %date, "fetching month previews");

        let resp = self.http.get(url).query(&[("date", date)]).send().await?;
        let dtos: Vec<WireEvent> = check(resp).await?.json().await?;
        to_domains(dtos)
    }

    /// GET /events?start=&end=
    async fn events_in_range(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> CalboardResult<Vec<DomainEvent>> {
        let url = self.url(&[EVENTS])?;
        debug!(%url, %start, %end, "fetching events in range");

        let resp = self
            .http
            .get(url)
            .query(&[("start", start.to_rfc3339()), ("end", end.to_rfc3339())])
            .send()
            .await?;
        let dtos: Vec<WireEvent> = check(resp).await?.json().await?;
        to_domains(dtos)
    }

    /// GET /events/:id
    async fn get_event(&self, id: &str) -> CalboardResult<DomainEvent> {
        let url = self.url(&[EVENTS, id])?;
        debug!(%url, "fetching event");

        let resp = self.http.get(url).send().await?;
        let dto: WireEvent = check(resp).await?.json().await?;
        to_domain(dto)
    }

    /// POST /events
    async fn create_event(&self, event: &DomainEvent) -> CalboardResult<DomainEvent> {
        let url = self.url(&[EVENTS])?;
        debug!(%url, title = %event.title, "creating event");

        let resp = self.http.post(url).json(&to_wire(event)).send().await?;
        let dto: WireEvent = check(resp).await?.json().await?;
        to_domain(dto)
    }

    /// PUT /events/:id
    async fn update_event(&self, id: &str, event: &DomainEvent) -> CalboardResult<DomainEvent> {
        let url = self.url(&[EVENTS, id])?;
        debug!(%url, title = %event.title, "updating event");

        let resp = self.http.put(url).json(&to_wire(event)).send().await?;
        let dto: WireEvent = check(resp).await?.json().await?;
        to_domain(dto)
    }

    /// DELETE /events/:id
    async fn delete_event(&self, id: &str) -> CalboardResult<()> {
        let url = self.url(&[EVENTS, id])?;
        debug!(%url, "deleting event");

        let resp = self.http.delete(url).send().await?;
        check(resp).await?;
        Ok(())
    }
}
