//! Request/response access logging middleware.
//!
//! # Responsibilities
//! - Emit one structured record when a request arrives and one when its
//!   response completes
//! - Capture request bodies for mutating methods (POST/PUT)
//! - Capture response bodies for API and probe paths, parsed as JSON with a
//!   raw-text fallback
//!
//! # Design Decisions
//! - The arrival record is emitted before the handler runs, so it always
//!   precedes the completion record for the same request
//! - Bodies are buffered and re-wrapped untouched; the client sees exactly
//!   the bytes and status the handler produced
//! - A parse failure of the outgoing body is never surfaced: the raw text is
//!   logged instead

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, Method, Request},
    middleware::Next,
    response::Response,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::observability::metrics;

/// Tracing target for access records, so the sink can be filtered or routed
/// independently of application logs.
pub const ACCESS_TARGET: &str = "access";

/// Cap on buffered request bodies. Bodies that declare a larger length are
/// passed through uncaptured rather than held in memory.
const MAX_CAPTURED_BODY: usize = 1024 * 1024;

/// Arrival record, one per request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub request_id: String,
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub client_addr: String,
    pub user_agent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

/// Completion record, one per response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    #[serde(rename = "type")]
    pub record_type: &'static str,
    pub request_id: String,
    pub timestamp: String,
    pub method: String,
    pub path: String,
    pub status: u16,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

/// Axum middleware observing every request/response pair.
pub async fn access_log(request: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request
        .uri()
        .query()
        .filter(|q| !q.is_empty())
        .map(str::to_string);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("Unknown")
        .to_string();
    let client_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // Buffer the body of mutating requests so it can be logged, then hand an
    // identical body to the handler. Bodies over the cap (or of undeclared
    // length) skip capture entirely; the handler gets the original body.
    let mut request_body = None;
    let request = if (method == Method::POST || method == Method::PUT)
        && captures_request_body(request.headers())
    {
        let (parts, body) = request.into_parts();
        match axum::body::to_bytes(body, MAX_CAPTURED_BODY).await {
            Ok(bytes) => {
                request_body = parse_or_text(&bytes);
                Request::from_parts(parts, Body::from(bytes))
            }
            Err(_) => Request::from_parts(parts, Body::empty()),
        }
    } else {
        request
    };

    emit(&RequestRecord {
        record_type: "request",
        request_id: request_id.clone(),
        timestamp: iso_timestamp(),
        method: method.to_string(),
        path: path.clone(),
        client_addr,
        user_agent,
        query,
        body: request_body,
    });

    let response = next.run(request).await;
    let status = response.status();

    // Observe the outgoing body for API and probe paths without altering it.
    let mut response_body = None;
    let response = if captures_response_body(&path) {
        let (parts, body) = response.into_parts();
        match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => {
                response_body = parse_or_text(&bytes);
                Response::from_parts(parts, Body::from(bytes))
            }
            Err(_) => Response::from_parts(parts, Body::empty()),
        }
    } else {
        response
    };

    metrics::record_request(method.as_str(), status.as_u16(), started);

    emit(&ResponseRecord {
        record_type: "response",
        request_id,
        timestamp: iso_timestamp(),
        method: method.to_string(),
        path,
        status: status.as_u16(),
        duration_ms: started.elapsed().as_millis() as u64,
        body: response_body,
    });

    response
}

/// Whether the request body is small enough to buffer for logging.
fn captures_request_body(headers: &axum::http::HeaderMap) -> bool {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .is_some_and(|len| len <= MAX_CAPTURED_BODY as u64)
}

/// Paths whose outgoing body is captured in the completion record.
fn captures_response_body(path: &str) -> bool {
    path.starts_with("/api/") || path == "/health"
}

/// Best-effort body enrichment: parse as JSON, fall back to raw text.
fn parse_or_text(bytes: &[u8]) -> Option<serde_json::Value> {
    if bytes.is_empty() {
        return None;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => Some(value),
        Err(_) => Some(serde_json::Value::String(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
    }
}

fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn emit<T: Serialize>(record: &T) {
    match serde_json::to_string(record) {
        Ok(line) => tracing::info!(target: ACCESS_TARGET, "{line}"),
        Err(error) => {
            tracing::warn!(target: ACCESS_TARGET, %error, "Failed to serialize access record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::http::StatusCode;
    use axum::routing::{get, post};
    use axum::{middleware, Json, Router};
    use serde_json::json;
    use tower::ServiceExt;
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory log sink shared between the subscriber and assertions.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        /// Parse every captured access record, in emission order.
        fn records(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .filter_map(|line| line.find('{').map(|i| line[i..].to_string()))
                .filter_map(|json| serde_json::from_str(&json).ok())
                .collect()
        }
    }

    impl std::io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for SharedBuf {
        type Writer = SharedBuf;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Install a capturing subscriber for the current (test) thread.
    fn capture_output(buf: &SharedBuf) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buf.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn response_body_captured_for_api_and_probe_paths_only() {
        assert!(captures_response_body("/health"));
        assert!(captures_response_body("/api/health-status"));
        assert!(captures_response_body("/api/toggle-health"));
        assert!(!captures_response_body("/"));
        assert!(!captures_response_body("/healthz"));
        assert!(!captures_response_body("/static/script.js"));
    }

    #[test]
    fn parse_or_text_prefers_json() {
        let value = parse_or_text(br#"{"status":"healthy"}"#).unwrap();
        assert_eq!(value, json!({"status": "healthy"}));
    }

    #[test]
    fn parse_or_text_falls_back_to_raw_text() {
        let value = parse_or_text(b"not json at all").unwrap();
        assert_eq!(value, json!("not json at all"));
    }

    #[test]
    fn parse_or_text_omits_empty_bodies() {
        assert!(parse_or_text(b"").is_none());
    }

    #[test]
    fn request_body_capture_requires_declared_length_within_cap() {
        let mut headers = axum::http::HeaderMap::new();
        assert!(!captures_request_body(&headers), "undeclared length");

        headers.insert(header::CONTENT_LENGTH, "0".parse().unwrap());
        assert!(captures_request_body(&headers));

        headers.insert(
            header::CONTENT_LENGTH,
            MAX_CAPTURED_BODY.to_string().parse().unwrap(),
        );
        assert!(captures_request_body(&headers));

        headers.insert(
            header::CONTENT_LENGTH,
            (MAX_CAPTURED_BODY + 1).to_string().parse().unwrap(),
        );
        assert!(!captures_request_body(&headers), "over the cap");
    }

    #[test]
    fn request_record_serializes_contract_fields() {
        let record = RequestRecord {
            record_type: "request",
            request_id: "abc".to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            method: "POST".to_string(),
            path: "/api/toggle-health".to_string(),
            client_addr: "127.0.0.1:5000".to_string(),
            user_agent: "Unknown".to_string(),
            query: None,
            body: None,
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(value["type"], "request");
        assert_eq!(value["userAgent"], "Unknown");
        assert_eq!(value["clientAddr"], "127.0.0.1:5000");
        // Empty query and body are omitted, not serialized as null.
        assert!(value.get("query").is_none());
        assert!(value.get("body").is_none());
    }

    #[test]
    fn response_record_serializes_contract_fields() {
        let record = ResponseRecord {
            record_type: "response",
            request_id: "abc".to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            method: "GET".to_string(),
            path: "/health".to_string(),
            status: 500,
            duration_ms: 3,
            body: Some(json!({"status": "unhealthy"})),
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();
        assert_eq!(value["type"], "response");
        assert_eq!(value["status"], 500);
        assert_eq!(value["durationMs"], 3);
        assert_eq!(value["body"]["status"], "unhealthy");
    }

    #[tokio::test]
    async fn middleware_passes_response_through_unchanged() {
        let app = Router::new()
            .route("/api/echo", post(|body: String| async move { body }))
            .route(
                "/health",
                get(|| async { Json(json!({"status": "healthy"})) }),
            )
            .layer(middleware::from_fn(access_log));

        let payload = "payload bytes";
        let response = app
            .clone()
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/api/echo")
                    .header(header::CONTENT_LENGTH, payload.len())
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], payload.as_bytes());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["status"], "healthy");
    }

    #[tokio::test]
    async fn arrival_record_precedes_completion_and_carries_sent_status() {
        let buf = SharedBuf::default();
        let _guard = capture_output(&buf);

        let app = Router::new()
            .route(
                "/health",
                get(|| async {
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({"status": "unhealthy"})),
                    )
                }),
            )
            .layer(middleware::from_fn(access_log));

        // No user-agent header on purpose.
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let records = buf.records();
        assert_eq!(records.len(), 2, "one arrival and one completion record");
        assert_eq!(records[0]["type"], "request");
        assert_eq!(records[1]["type"], "response");
        assert_eq!(
            records[0]["requestId"], records[1]["requestId"],
            "both records belong to the same request"
        );
        assert_eq!(
            records[1]["status"], 500,
            "completion record carries the status actually sent"
        );
        assert_eq!(records[1]["body"]["status"], "unhealthy");
        assert_eq!(records[0]["userAgent"], "Unknown");
        assert_eq!(records[0]["method"], "GET");
        assert_eq!(records[0]["path"], "/health");
    }

    #[tokio::test]
    async fn request_body_logged_for_posts_with_declared_length() {
        let buf = SharedBuf::default();
        let _guard = capture_output(&buf);

        let app = Router::new()
            .route("/api/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(access_log));

        let payload = r#"{"reason":"failover drill"}"#;
        app.oneshot(
            axum::http::Request::builder()
                .method("POST")
                .uri("/api/echo")
                .header(header::CONTENT_LENGTH, payload.len())
                .header(header::USER_AGENT, "curl/8.5")
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();

        let records = buf.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["body"]["reason"], "failover drill");
        assert_eq!(records[0]["userAgent"], "curl/8.5");
    }

    #[tokio::test]
    async fn oversized_request_body_passes_through_uncaptured() {
        let buf = SharedBuf::default();
        let _guard = capture_output(&buf);

        let app = Router::new()
            .route(
                "/api/echo",
                post(|body: axum::body::Bytes| async move { body }),
            )
            .layer(middleware::from_fn(access_log));

        let payload = vec![b'x'; MAX_CAPTURED_BODY + 1];
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .method("POST")
                    .uri("/api/echo")
                    .header(header::CONTENT_LENGTH, payload.len())
                    .body(Body::from(payload.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.len(), payload.len(), "body reaches the handler intact");

        let records = buf.records();
        assert_eq!(records.len(), 2);
        assert!(
            records[0].get("body").is_none(),
            "over-cap bodies are not captured in the arrival record"
        );
    }
}
