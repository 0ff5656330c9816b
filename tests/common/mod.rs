//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{any, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use job_proxy::backend::BackendEndpoint;
use job_proxy::health::ReadinessGate;
use job_proxy::http::{ProxyTimeouts, RequestTranslator};
use job_proxy::job::JobHandler;

/// Bytes served as the remote audio file.
pub const CLIP: &[u8] = b"RIFF\x00\x01\x02\x03WAVEfmt \xff\xfe";

/// Request counters shared with a mock backend.
#[derive(Clone, Default)]
pub struct Hits {
    pub health: Arc<AtomicU32>,
    pub models: Arc<AtomicU32>,
    pub files: Arc<AtomicU32>,
    pub uploads: Arc<AtomicU32>,
}

impl Hits {
    pub fn get(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }
}

/// One multipart part as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct ReceivedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    hits: Hits,
    health_status: StatusCode,
    parts: Arc<Mutex<Vec<ReceivedPart>>>,
}

/// A running mock backend.
pub struct MockBackend {
    pub addr: SocketAddr,
    pub hits: Hits,
    pub parts: Arc<Mutex<Vec<ReceivedPart>>>,
}

impl MockBackend {
    pub fn endpoint(&self) -> BackendEndpoint {
        BackendEndpoint::new("127.0.0.1", self.addr.port()).unwrap()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a mock backend whose `/health` answers `health_status`.
pub async fn start_mock_backend(health_status: StatusCode) -> MockBackend {
    let hits = Hits::default();
    let parts = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        hits: hits.clone(),
        health_status,
        parts: parts.clone(),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/models", get(models))
        .route("/v1/audio/transcriptions", post(transcriptions))
        .route("/files/clip.wav", get(file))
        .route("/speech", get(|| async { ([(header::CONTENT_TYPE, "audio/wav")], CLIP) }))
        .route("/plain", get(|| async { ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], "hello") }))
        .route("/latin1", get(|| async {
            ([(header::CONTENT_TYPE, "text/plain; charset=iso-8859-1")], &b"caf\xe9"[..])
        }))
        .route("/image", get(|| async { ([(header::CONTENT_TYPE, "image/png")], &b"\x89PNG\r\n"[..]) }))
        .route("/fail", get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "application/json")],
                r#"{"error":"bad"}"#,
            )
        }))
        .route("/slow", get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            "late"
        }))
        .route("/echo", any(echo))
        .with_state(state);

    let addr = serve(app).await;
    MockBackend { addr, hits, parts }
}

/// Serve a router on an ephemeral loopback port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A loopback address nothing listens on.
pub fn unused_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// HTTP client that never routes loopback traffic through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

pub fn translator(timeouts: ProxyTimeouts) -> RequestTranslator {
    RequestTranslator::new(client(), timeouts)
}

pub fn handler(endpoint: BackendEndpoint, ready: bool) -> JobHandler {
    JobHandler::new(
        ReadinessGate::new(endpoint, ready),
        translator(ProxyTimeouts::default()),
    )
}

async fn health(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.health.fetch_add(1, Ordering::SeqCst);
    (state.health_status, "ok")
}

async fn models(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.models.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "data": [] }))
}

async fn file(State(state): State<MockState>) -> impl IntoResponse {
    state.hits.files.fetch_add(1, Ordering::SeqCst);
    ([(header::CONTENT_TYPE, "audio/wav")], CLIP)
}

async fn transcriptions(State(state): State<MockState>, mut multipart: Multipart) -> impl IntoResponse {
    state.hits.uploads.fetch_add(1, Ordering::SeqCst);

    let mut fields = serde_json::Map::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        if file_name.is_none() {
            fields.insert(name.clone(), Value::String(String::from_utf8_lossy(&data).into_owned()));
        }
        state.parts.lock().unwrap().push(ReceivedPart { name, file_name, data });
    }

    Json(json!({ "text": "transcribed", "fields": fields }))
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    body: Bytes,
) -> impl IntoResponse {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "method": method.as_str(),
        "query": query,
        "authorization": header_value("authorization"),
        "content_type": header_value("content-type"),
        "body": body,
    }))
}
