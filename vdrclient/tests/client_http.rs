//! Integration tests against an in-process mock of the VDR restful API.
//!
//! The mock is a small axum router bound to an ephemeral port; every test
//! builds its own router and client, so tests run in parallel without
//! sharing state.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use vdrclient::{Error, VdrClient};

const CHANNELS_BODY: &str = r#"{
    "channels": [
        {"number": 1, "name": "Das Erste HD", "channel_id": "S19.2E-1-1019-10301"},
        {"number": 2, "name": "ZDF HD", "channel_id": "S19.2E-1-1011-11110"},
        {"number": 5, "name": "arte HD", "channel_id": "S19.2E-1-1011-11120"}
    ]
}"#;

const RECORDINGS_BODY: &str = r#"{
    "recordings": [
        {"number": 1, "name": "Tatort", "filename": "/video/Tatort/2024-03-10.rec"},
        {"number": 2, "name": "Sportschau", "filename": "/video/Sportschau/2024-03-09.rec"}
    ]
}"#;

/// One recorded POST request
#[derive(Debug, Clone)]
struct RecordedPost {
    path: String,
    content_length: Option<String>,
    body: String,
}

#[derive(Debug, Clone, Default)]
struct Posts(Arc<Mutex<Vec<RecordedPost>>>);

impl Posts {
    fn record(&self, path: String, headers: &HeaderMap, body: String) {
        let content_length = headers
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.0.lock().unwrap().push(RecordedPost {
            path,
            content_length,
            body,
        });
    }

    fn recorded(&self) -> Vec<RecordedPost> {
        self.0.lock().unwrap().clone()
    }
}

async fn spawn_mock(app: Router) -> SocketAddr {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> VdrClient {
    VdrClient::builder()
        .host("127.0.0.1")
        .port(addr.port())
        .build()
        .unwrap()
}

fn json_response(body: &'static str) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], body)
}

#[tokio::test]
async fn fetch_channels_parses_list_in_order() {
    let app = Router::new().route("/channels.json", get(|| async { json_response(CHANNELS_BODY) }));
    let addr = spawn_mock(app).await;

    let channels = client_for(addr).channels().await.unwrap();

    assert_eq!(channels.len(), 3);
    assert_eq!(channels[0].number, 1);
    assert_eq!(channels[0].name, "Das Erste HD");
    assert_eq!(channels[2].channel_id, "S19.2E-1-1011-11120");
}

#[tokio::test]
async fn fetch_recordings_parses_list_in_order() {
    let app = Router::new().route(
        "/recordings.json",
        get(|| async { json_response(RECORDINGS_BODY) }),
    );
    let addr = spawn_mock(app).await;

    let recordings = client_for(addr).recordings().await.unwrap();

    assert_eq!(recordings.len(), 2);
    assert_eq!(recordings[0].name, "Tatort");
    assert_eq!(recordings[1].filename, "/video/Sportschau/2024-03-09.rec");
}

#[test]
fn fetch_info_reports_version() {
    tokio_test::block_on(async {
        let app = Router::new().route(
            "/info.json",
            get(|| async { json_response(r#"{"version": "2.4.7", "channels": 312}"#) }),
        );
        let addr = spawn_mock(app).await;

        let info = client_for(addr).info().await.unwrap();

        assert_eq!(info.version.as_deref(), Some("2.4.7"));
        assert!(info.extra.contains_key("channels"));
    });
}

#[tokio::test]
async fn non_200_response_is_a_status_error() {
    let app = Router::new().route(
        "/channels.json",
        get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
    );
    let addr = spawn_mock(app).await;

    let err = client_for(addr).channels().await.unwrap_err();

    assert!(matches!(err, Error::Status(status) if status.as_u16() == 500));
    assert!(err.is_rejected_response());
}

#[tokio::test]
async fn html_payload_is_a_content_type_error() {
    // axum serves &str bodies as text/plain
    let app = Router::new().route("/channels.json", get(|| async { "<html>not json</html>" }));
    let addr = spawn_mock(app).await;

    let err = client_for(addr).channels().await.unwrap_err();

    match err {
        Error::ContentType(Some(ct)) => assert!(ct.starts_with("text/plain"), "got {ct}"),
        other => panic!("expected ContentType error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let app = Router::new().route(
        "/channels.json",
        get(|| async { json_response(r#"{"channels": [{"number": "#) }),
    );
    let addr = spawn_mock(app).await;

    let err = client_for(addr).channels().await.unwrap_err();

    assert!(matches!(err, Error::Json(_)), "got {err:?}");
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Bind a listener to reserve a port, then drop it so nothing answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr).channels().await.unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}

fn remote_router(posts: Posts) -> Router {
    Router::new()
        .route(
            "/remote/{key}",
            post(
                |State(posts): State<Posts>,
                 Path(key): Path<String>,
                 headers: HeaderMap,
                 body: String| async move {
                    posts.record(format!("/remote/{key}"), &headers, body);
                    "ok"
                },
            ),
        )
        .route(
            "/remote/switch/{channel}",
            post(
                |State(posts): State<Posts>,
                 Path(channel): Path<String>,
                 headers: HeaderMap,
                 body: String| async move {
                    posts.record(format!("/remote/switch/{channel}"), &headers, body);
                    "ok"
                },
            ),
        )
        .with_state(posts)
}

#[tokio::test]
async fn press_key_posts_once_with_empty_body() {
    let posts = Posts::default();
    let addr = spawn_mock(remote_router(posts.clone())).await;

    client_for(addr).press_key("Menu").await.unwrap();

    let recorded = posts.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/remote/Menu");
    assert_eq!(recorded[0].content_length.as_deref(), Some("0"));
    assert!(recorded[0].body.is_empty());
}

#[tokio::test]
async fn select_channel_posts_to_switch_endpoint() {
    let posts = Posts::default();
    let addr = spawn_mock(remote_router(posts.clone())).await;

    client_for(addr).select_channel("5").await.unwrap();

    let recorded = posts.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].path, "/remote/switch/5");
}

#[tokio::test]
async fn post_command_ignores_error_status() {
    // Fire-and-forget: a 404 from the device is not an error.
    let app = Router::new().route(
        "/remote/{key}",
        post(|| async { (StatusCode::NOT_FOUND, "no such key") }),
    );
    let addr = spawn_mock(app).await;

    client_for(addr).press_key("Bogus").await.unwrap();
}
