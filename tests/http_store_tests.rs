use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use chrono::{TimeZone, Utc};
use focus_timer::{
    error::PersistError,
    services::{HttpSessionStore, SessionStore, StaticToken},
    state::CompletedSession,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

/// Serve `router` on a loopback port and return its base URL
async fn spawn_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn recording_backend(captured: Captured) -> Router {
    async fn create(
        State(captured): State<Captured>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        captured.lock().unwrap().push((auth, body.clone()));

        let mut stored = body;
        stored["id"] = json!(42);
        (StatusCode::CREATED, Json(stored))
    }

    async fn list(State(captured): State<Captured>) -> impl IntoResponse {
        let sessions: Vec<Value> = captured
            .lock()
            .unwrap()
            .iter()
            .enumerate()
            .map(|(i, (_, body))| {
                let mut stored = body.clone();
                stored["id"] = json!(i + 1);
                stored
            })
            .collect();

        if sessions.is_empty() {
            StatusCode::NO_CONTENT.into_response()
        } else {
            Json(sessions).into_response()
        }
    }

    Router::new()
        .route("/api/pomodoro", post(create).get(list))
        .with_state(captured)
}

fn session() -> CompletedSession {
    CompletedSession {
        start_time: Some(Utc.with_ymd_and_hms(2025, 12, 1, 9, 0, 0).unwrap()),
        end_time: Utc.with_ymd_and_hms(2025, 12, 1, 9, 25, 0).unwrap(),
        duration: 25,
        score: 4,
        notes: "focused well".to_string(),
    }
}

fn store(base_url: &str, token: Option<&str>) -> HttpSessionStore {
    HttpSessionStore::new(base_url, Arc::new(StaticToken::new(token.map(str::to_string))))
}

#[tokio::test]
async fn test_save_posts_session_with_bearer_token() {
    let captured: Captured = Arc::default();
    let base_url = spawn_backend(recording_backend(captured.clone())).await;

    let stored = store(&format!("{base_url}/"), Some("token-123"))
        .save_session(&session())
        .await
        .unwrap();
    assert_eq!(stored.id, 42);
    assert_eq!(stored.duration, 25);
    assert_eq!(stored.score, Some(4));

    let captured = captured.lock().unwrap();
    let (auth, body) = &captured[0];
    assert_eq!(auth.as_deref(), Some("Bearer token-123"));
    assert_eq!(
        body,
        &json!({
            "startTime": "2025-12-01T09:00:00Z",
            "endTime": "2025-12-01T09:25:00Z",
            "duration": 25,
            "score": 4,
            "notes": "focused well",
        })
    );
}

#[tokio::test]
async fn test_list_handles_no_content_and_records() {
    let captured: Captured = Arc::default();
    let base_url = spawn_backend(recording_backend(captured)).await;
    let store = store(&base_url, Some("token-123"));

    assert!(store.list_sessions().await.unwrap().is_empty());

    store.save_session(&session()).await.unwrap();
    let sessions = store.list_sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].notes.as_deref(), Some("focused well"));
}

#[tokio::test]
async fn test_missing_token_never_sends_request() {
    let captured: Captured = Arc::default();
    let base_url = spawn_backend(recording_backend(captured.clone())).await;

    let err = store(&base_url, None).save_session(&session()).await.unwrap_err();
    assert!(matches!(err, PersistError::MissingCredential));
    assert_eq!(err.to_string(), "No authentication token available");
    assert!(captured.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejection_uses_server_message() {
    let router = Router::new().route(
        "/api/pomodoro",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Score must be at most 5" })),
            )
        }),
    );
    let base_url = spawn_backend(router).await;

    let err = store(&base_url, Some("t")).save_session(&session()).await.unwrap_err();
    match err {
        PersistError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Score must be at most 5");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rejection_without_body_falls_back_to_status() {
    let router = Router::new().route(
        "/api/pomodoro",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base_url = spawn_backend(router).await;

    let err = store(&base_url, Some("t")).save_session(&session()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to save session (Status: 500)");
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = store(&format!("http://{addr}"), Some("t"))
        .save_session(&session())
        .await
        .unwrap_err();
    assert!(matches!(err, PersistError::Transport(_)));
}

#[test]
fn test_base_url_is_normalised() {
    assert_eq!(store("http://localhost:8080/", None).base_url(), "http://localhost:8080");
}
