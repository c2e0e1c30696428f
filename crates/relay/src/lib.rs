//! Bakehouse order relay.
//!
//! The storefront posts each placed order to `POST /send-order`; the relay
//! forwards the request bytes unchanged to the configured upstream webhook (a
//! spreadsheet or mail automation) and hands the upstream's answer back. The
//! body must be valid JSON but is never re-encoded, so key order and number
//! precision survive.
//! Browsers may call it directly, so every origin is allowed.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;

use std::time::Duration;

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::de::IgnoredAny;
use thiserror::Error;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, instrument, warn};
use url::Url;

/// Body returned when the upstream cannot be reached.
pub const FAILURE_MESSAGE: &str = "Something went wrong";

/// Errors that can occur when forwarding to the upstream.
#[derive(Debug, Error)]
pub enum RelayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// The upstream's answer, passed back to the caller.
#[derive(Debug)]
pub struct Forwarded {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Forwards JSON payloads to the upstream webhook.
#[derive(Clone)]
pub struct Forwarder {
    client: reqwest::Client,
    upstream: Url,
}

impl Forwarder {
    /// Create a forwarder with a request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(upstream: Url, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, upstream })
    }

    #[must_use]
    pub const fn upstream(&self) -> &Url {
        &self.upstream
    }

    /// POST the JSON `payload` bytes as-is to the upstream and read its full
    /// answer.
    ///
    /// Non-2xx answers are not errors; only transport failures are.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::Http` if the upstream cannot be reached or the
    /// answer cannot be read.
    pub async fn forward(&self, payload: Bytes) -> Result<Forwarded, RelayError> {
        let response = self
            .client
            .post(self.upstream.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;

        Ok(Forwarded {
            status,
            content_type,
            body,
        })
    }
}

/// Build the relay router.
pub fn router(forwarder: Forwarder) -> Router {
    Router::new()
        .route("/send-order", post(send_order))
        .route("/health", axum::routing::get(|| async { "ok" }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(forwarder)
}

/// Forward one order notification.
///
/// Answers 400 when the body is not JSON, 200 with the upstream body whatever
/// the upstream status was, and 500 with [`FAILURE_MESSAGE`] when the upstream
/// cannot be reached.
#[instrument(skip_all)]
async fn send_order(State(forwarder): State<Forwarder>, payload: Bytes) -> Response {
    if let Err(e) = serde_json::from_slice::<IgnoredAny>(&payload) {
        warn!(error = %e, "Rejected malformed order notification");
        return (StatusCode::BAD_REQUEST, format!("Invalid JSON: {e}")).into_response();
    }
    info!(payload = %String::from_utf8_lossy(&payload), "Order notification received");

    match forwarder.forward(payload).await {
        Ok(forwarded) => {
            if forwarded.status.is_success() {
                info!(status = forwarded.status.as_u16(), "Forwarded to upstream");
            } else {
                warn!(
                    status = forwarded.status.as_u16(),
                    "Upstream answered with an error status"
                );
            }

            let mut response = forwarded.body.into_response();
            match forwarded.content_type {
                Some(content_type) => {
                    response
                        .headers_mut()
                        .insert(header::CONTENT_TYPE, content_type);
                }
                None => {
                    response.headers_mut().remove(header::CONTENT_TYPE);
                }
            }
            response
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            error!(error = %e, sentry_event_id = %event_id, "Failed to forward order");
            (StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE).into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    /// Raw bodies and content types the upstream received.
    type Seen = Arc<Mutex<Vec<(Option<HeaderValue>, Bytes)>>>;

    async fn spawn(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });
        addr
    }

    /// Upstream that records payloads and answers with `status` and `body`.
    async fn fake_upstream(status: StatusCode, body: &'static str) -> (Url, Seen) {
        let seen: Seen = Arc::default();
        let recorder = Arc::clone(&seen);
        let app = Router::new().route(
            "/exec",
            post(move |headers: axum::http::HeaderMap, payload: Bytes| {
                recorder
                    .lock()
                    .unwrap()
                    .push((headers.get(header::CONTENT_TYPE).cloned(), payload));
                async move { (status, [(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body) }
            }),
        );
        let addr = spawn(app).await;
        (Url::parse(&format!("http://{addr}/exec")).unwrap(), seen)
    }

    async fn spawn_relay(upstream: Url) -> String {
        let forwarder = Forwarder::new(upstream, Duration::from_secs(5)).unwrap();
        let addr = spawn(router(forwarder)).await;
        format!("http://{addr}/send-order")
    }

    fn payload() -> serde_json::Value {
        json!({
            "productId": 4,
            "productTitle": "Black forest cake",
            "quantity": 1,
            "buyerName": "Ira",
            "buyerEmail": "ira@example.com",
            "sellerEmail": "oven@example.com",
            "txnId": "12345@upi",
        })
    }

    #[tokio::test]
    async fn test_forwards_payload_and_returns_upstream_body() {
        let (upstream, seen) = fake_upstream(StatusCode::OK, "Email sent").await;
        let relay = spawn_relay(upstream).await;

        let response = reqwest::Client::new()
            .post(&relay)
            .json(&payload())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(response.text().await.unwrap(), "Email sent");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_ref().unwrap(), "application/json");
        assert_eq!(seen[0].1, serde_json::to_vec(&payload()).unwrap());
    }

    #[tokio::test]
    async fn test_forwards_body_bytes_verbatim() {
        let (upstream, seen) = fake_upstream(StatusCode::OK, "ok").await;
        let relay = spawn_relay(upstream).await;
        let raw = r#"{"txnId":"9@upi", "productId":4,"big":123456789012345678901234567890}"#;

        let response = reqwest::Client::new()
            .post(&relay)
            .header(header::CONTENT_TYPE, "application/json")
            .body(raw)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(seen.lock().unwrap()[0].1, raw.as_bytes());
    }

    #[tokio::test]
    async fn test_upstream_error_status_still_returns_200() {
        let (upstream, _) = fake_upstream(StatusCode::INTERNAL_SERVER_ERROR, "quota exceeded").await;
        let relay = spawn_relay(upstream).await;

        let response = reqwest::Client::new()
            .post(&relay)
            .json(&payload())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(response.text().await.unwrap(), "quota exceeded");
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_500() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = listener.local_addr().unwrap();
        drop(listener);

        let relay = spawn_relay(Url::parse(&format!("http://{dead}/exec")).unwrap()).await;

        let response = reqwest::Client::new()
            .post(&relay)
            .json(&payload())
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text().await.unwrap(), FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_malformed_json_is_rejected() {
        let (upstream, seen) = fake_upstream(StatusCode::OK, "ok").await;
        let relay = spawn_relay(upstream).await;

        let response = reqwest::Client::new()
            .post(&relay)
            .header(header::CONTENT_TYPE, "application/json")
            .body("{not json")
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let (upstream, _) = fake_upstream(StatusCode::OK, "ok").await;
        let relay = spawn_relay(upstream).await;

        let response = reqwest::Client::new()
            .request(reqwest::Method::OPTIONS, &relay)
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert!(
            response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }
}
