use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use calboard_core::store::{EventStore, HttpEventStore};
use calboard_core::{CalboardError, DomainEvent, MonthCursor};
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use url::Url;

#[derive(Clone, Default)]
struct ServerState {
    queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
    deleted: Arc<Mutex<Vec<String>>>,
}

fn standup_json() -> Value {
    json!({
        "id": "1",
        "title": "Standup",
        "description": "Daily sync",
        "startAt": "2024-05-01T09:00:00Z",
        "finishAt": "2024-05-01T09:15:00Z",
        "location": "Room 1"
    })
}

fn not_found(path: &str) -> Response {
    let body = json!({
        "timestamp": "2024-05-01T09:00:00Z",
        "status": 404,
        "error": "Not Found",
        "message": "Event not found",
        "path": path,
        "fieldErrors": []
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

async fn month_previews(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.queries.lock().await.push(query);
    Json(json!([
        {
            "id": "1",
            "title": "Standup",
            "startAt": "2024-05-01T09:00:00Z",
            "finishAt": "2024-05-01T09:15:00Z"
        },
        {
            "id": "2",
            "title": "Retro",
            "startAt": "2024-05-02T16:00:00+02:00[Europe/Berlin]",
            "finishAt": "2024-05-02T17:00:00+02:00[Europe/Berlin]",
            "location": ""
        }
    ]))
}

async fn list_events(
    State(state): State<ServerState>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.queries.lock().await.push(query);
    Json(json!([standup_json()]))
}

async fn create_event(State(state): State<ServerState>, Json(body): Json<Value>) -> Response {
    state.bodies.lock().await.push(body.clone());

    if body["title"].as_str().is_some_and(str::is_empty) {
        let err = json!({
            "status": 400,
            "error": "Bad Request",
            "message": "Validation failed",
            "path": "/events",
            "fieldErrors": [
                { "field": "title", "rejectedValue": "", "message": "must not be blank" }
            ]
        });
        return (StatusCode::BAD_REQUEST, Json(err)).into_response();
    }

    let mut created = body;
    created["id"] = json!("42");
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn get_event(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "1" => Json(standup_json()).into_response(),
        "bad-time" => {
            let mut event = standup_json();
            event["startAt"] = json!("yesterday-ish");
            Json(event).into_response()
        }
        "not-json" => (StatusCode::OK, "<html>oops</html>").into_response(),
        _ => not_found(&format!("/events/{id}")),
    }
}

async fn update_event(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    state.bodies.lock().await.push(body.clone());
    let mut updated = body;
    updated["id"] = json!(id);
    Json(updated).into_response()
}

async fn delete_event(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    if id == "locked" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "database is locked").into_response();
    }
    state.deleted.lock().await.push(id);
    StatusCode::NO_CONTENT.into_response()
}

async fn spawn_event_server() -> (HttpEventStore, ServerState) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = ServerState::default();

    let app = Router::new()
        .route("/api/events/previews/month", get(month_previews))
        .route("/api/events", get(list_events).post(create_event))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let base = Url::parse(&format!("http://{addr}/api/")).unwrap();
    let store = HttpEventStore::with_base_url(base, Duration::from_secs(5)).unwrap();
    (store, state)
}

fn ts(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

#[tokio::test]
async fn month_previews_sends_local_midnight_and_maps_events() {
    let (store, state) = spawn_event_server().await;
    let cursor = MonthCursor::new(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());

    let events = store.month_previews(cursor).await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id.as_deref(), Some("1"));
    assert_eq!(events[0].description, None);
    assert_eq!(events[0].start, ts("2024-05-01T09:00:00Z"));
    assert_eq!(events[1].end, Some(ts("2024-05-02T15:00:00Z")));
    assert_eq!(events[1].location, None);

    let queries = state.queries.lock().await;
    let date = ts(&queries[0]["date"]);
    assert_eq!(date.date_naive(), cursor.date());
    assert_eq!(date.time(), chrono::NaiveTime::MIN);
}

#[tokio::test]
async fn range_query_passes_both_bounds() {
    let (store, state) = spawn_event_server().await;
    let start = ts("2024-05-01T00:00:00+02:00");
    let end = ts("2024-06-01T00:00:00+02:00");

    let events = store.events_in_range(start, end).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].description.as_deref(), Some("Daily sync"));

    let queries = state.queries.lock().await;
    assert_eq!(ts(&queries[0]["start"]), start);
    assert_eq!(ts(&queries[0]["end"]), end);
}

#[tokio::test]
async fn get_event_returns_full_details() {
    let (store, _) = spawn_event_server().await;

    let event = store.get_event("1").await.unwrap();
    assert_eq!(event.title, "Standup");
    assert_eq!(event.location.as_deref(), Some("Room 1"));
    assert_eq!(event.end, Some(ts("2024-05-01T09:15:00Z")));
}

#[tokio::test]
async fn missing_event_is_a_remote_rejection() {
    let (store, _) = spawn_event_server().await;

    match store.get_event("nope").await.unwrap_err() {
        CalboardError::RemoteRejection { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found: Event not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_timestamp_is_surfaced() {
    let (store, _) = spawn_event_server().await;

    match store.get_event("bad-time").await.unwrap_err() {
        CalboardError::MalformedTimestamp { field, value } => {
            assert_eq!(field, "startAt");
            assert_eq!(value, "yesterday-ish");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_success_is_malformed_response() {
    let (store, _) = spawn_event_server().await;
    let err = store.get_event("not-json").await.unwrap_err();
    assert!(matches!(err, CalboardError::MalformedResponse(_)));
}

#[tokio::test]
async fn create_posts_payload_without_id() {
    let (store, state) = spawn_event_server().await;
    let draft = DomainEvent::draft("Standup", ts("2024-05-01T09:00:00Z")).with_description("Daily sync");

    let created = store.create_event(&draft).await.unwrap();
    assert_eq!(created.id.as_deref(), Some("42"));
    assert_eq!(created.start, draft.start);
    assert_eq!(created.end, Some(draft.start));

    let bodies = state.bodies.lock().await;
    let body = &bodies[0];
    assert!(body.get("id").is_none());
    assert!(body.get("location").is_none());
    assert_eq!(body["title"], "Standup");
    assert_eq!(body["startAt"], body["finishAt"]);
}

#[tokio::test]
async fn create_rejection_keeps_field_errors() {
    let (store, _) = spawn_event_server().await;
    let draft = DomainEvent::draft("", ts("2024-05-01T09:00:00Z"));

    match store.create_event(&draft).await.unwrap_err() {
        CalboardError::RemoteRejection {
            status,
            field_errors,
            ..
        } => {
            assert_eq!(status, 400);
            assert_eq!(field_errors.len(), 1);
            assert_eq!(field_errors[0].field, "title");
            assert_eq!(field_errors[0].message, "must not be blank");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn update_puts_to_event_path() {
    let (store, state) = spawn_event_server().await;
    let edited = DomainEvent::draft("Daily standup", ts("2024-05-01T09:00:00Z"))
        .with_id("1")
        .with_end(ts("2024-05-01T09:30:00Z"))
        .with_location("Room 2");

    let updated = store.update_event("1", &edited).await.unwrap();
    assert_eq!(updated.id.as_deref(), Some("1"));
    assert_eq!(updated.title, "Daily standup");
    assert_eq!(updated.end, edited.end);

    let bodies = state.bodies.lock().await;
    assert_eq!(bodies[0]["location"], "Room 2");
    assert_eq!(bodies[0]["description"], "");
}

#[tokio::test]
async fn delete_accepts_empty_body() {
    let (store, state) = spawn_event_server().await;

    store.delete_event("1").await.unwrap();
    assert_eq!(*state.deleted.lock().await, vec!["1".to_string()]);
}

#[tokio::test]
async fn delete_failure_keeps_plain_text_message() {
    let (store, _) = spawn_event_server().await;

    match store.delete_event("locked").await.unwrap_err() {
        CalboardError::RemoteRejection { status, message, .. } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database is locked");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_store_is_a_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let store = HttpEventStore::with_base_url(base, Duration::from_secs(2)).unwrap();

    let err = store.delete_event("1").await.unwrap_err();
    assert!(matches!(err, CalboardError::NetworkFailure(_)));
    assert!(err.is_remote_failure());
}

#[tokio::test]
async fn truncated_error_body_is_a_network_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = [0u8; 4096];
        let _ = socket.read(&mut request).await;
        // Promise more body than is sent, then hang up
        let _ = socket
            .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 100\r\n\r\npartial")
            .await;
    });

    let base = Url::parse(&format!("http://{addr}")).unwrap();
    let store = HttpEventStore::with_base_url(base, Duration::from_secs(2)).unwrap();

    let err = store.delete_event("1").await.unwrap_err();
    assert!(matches!(err, CalboardError::NetworkFailure(_)), "got {err:?}");
}
