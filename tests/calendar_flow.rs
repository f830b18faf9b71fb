use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use personalcli::clients::google_calendar_client::GoogleCalendarClient;
use personalcli::error::AppError;
use personalcli::models::calendar::render_events;
use personalcli::oauth::Token;
use personalcli::service::calendar_service::CalendarService;
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn spawn_calendar() -> SocketAddr {
    let app = Router::new().route("/calendars/primary/events", get(list_events));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn list_events(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        == Some("Bearer good-token");
    if !authorized {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "invalid_token"})));
    }
    let expected = [
        ("showDeleted", "false"),
        ("singleEvents", "true"),
        ("maxResults", "10"),
        ("orderBy", "startTime"),
        ("timeMin", "2024-03-01T12:00:00Z"),
    ];
    for (key, value) in expected {
        if query.get(key).map(String::as_str) != Some(value) {
            return (StatusCode::BAD_REQUEST, Json(json!({"error": format!("bad {}", key)})));
        }
    }
    (
        StatusCode::OK,
        Json(json!({
            "kind": "calendar#events",
            "items": [
                {"summary": "Dentist", "start": {"dateTime": "2024-03-05T15:04:00-05:00"}},
                {"summary": "Spring break", "start": {"date": "2024-03-09"}}
            ]
        })),
    )
}

fn token(access: &str) -> Token {
    Token {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: None,
        expiry: None,
    }
}

#[tokio::test]
async fn lists_and_renders_upcoming_events() {
    let addr = spawn_calendar().await;
    let client = GoogleCalendarClient::new(&format!("http://{}/", addr), token("good-token"));
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let events = CalendarService::upcoming(&client, now).await.unwrap();

    assert_eq!(
        render_events(&events),
        "Upcoming events:\n- Dentist (March 5 - 3:04PM)\n- Spring break (March 9)"
    );
}

#[tokio::test]
async fn rejected_token_is_a_service_error() {
    let addr = spawn_calendar().await;
    let client = GoogleCalendarClient::new(&format!("http://{}", addr), token("revoked"));
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let err = CalendarService::upcoming(&client, now).await.unwrap_err();

    assert!(matches!(err, AppError::Service { .. }));
    assert!(err.to_string().contains("token.json"));
}
