use std::sync::{Arc, Mutex};

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use serde_json::json;

use super::*;

// =============================================================================
// Fixture server
// =============================================================================

type Received = Arc<Mutex<Vec<(Option<String>, Value)>>>;

async fn save(State(received): State<Received>, headers: HeaderMap, Json(body): Json<Value>) -> StatusCode {
    let agent = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()).map(str::to_owned);
    received.lock().unwrap().push((agent, body));
    StatusCode::OK
}

async fn serve_fixture() -> (String, Received) {
    let received: Received = Arc::default();
    let app = Router::new()
        .route("/widget.json", get(|| async { Json(json!({ "weather": { "top": "10px" } })) }))
        .route("/broken.json", get(|| async { "{not json" }))
        .route("/widgets/clock/main.js", get(|| async { "// clock" }))
        .route("/save_widget_positions", post(save))
        .route("/save_fails", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), received)
}

fn backend(base_url: &str, token: Option<&str>) -> HttpBackend {
    let config = ShellConfig {
        base_url: base_url.to_owned(),
        auth_token: token.map(str::to_owned),
        ..ShellConfig::default()
    };
    HttpBackend::new(&config).unwrap()
}

// =============================================================================
// HttpBackend
// =============================================================================

#[tokio::test]
async fn get_json_reads_document() {
    let (base, _) = serve_fixture().await;
    let value = backend(&base, None).get_json("/widget.json").await.unwrap();
    assert_eq!(value["weather"]["top"], "10px");
}

#[tokio::test]
async fn get_json_missing_is_fetch_error() {
    let (base, _) = serve_fixture().await;
    let err = backend(&base, None).get_json("/widget_visibility.json").await.unwrap_err();
    assert!(matches!(err, ShellError::Fetch { ref reason, .. } if reason == "status 404"));
}

#[tokio::test]
async fn get_json_malformed_is_parse_error() {
    let (base, _) = serve_fixture().await;
    let err = backend(&base, None).get_json("/broken.json").await.unwrap_err();
    assert!(matches!(err, ShellError::Parse { .. }));
}

#[tokio::test]
async fn fetch_text_reads_asset() {
    let (base, _) = serve_fixture().await;
    let text = backend(&base, None).fetch_text("/widgets/clock/main.js").await.unwrap();
    assert_eq!(text, "// clock");
}

#[tokio::test]
async fn post_json_sends_body_and_token() {
    let (base, received) = serve_fixture().await;
    let body = json!({ "live-clock": { "left": "5px" } });

    backend(&base, Some("wallboard-token")).post_json("/save_widget_positions", &body).await.unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].0.as_deref(), Some("wallboard-token"));
    assert_eq!(received[0].1, body);
}

#[tokio::test]
async fn post_json_error_status() {
    let (base, _) = serve_fixture().await;
    let err = backend(&base, None).post_json("/save_fails", &json!({})).await.unwrap_err();
    assert!(matches!(err, ShellError::Fetch { ref reason, .. } if reason == "status 500"));
}

#[tokio::test]
async fn unreachable_backend_is_fetch_error() {
    let err = backend("http://127.0.0.1:1", None).get_json("/widget.json").await.unwrap_err();
    assert!(matches!(err, ShellError::Fetch { .. }));
}
