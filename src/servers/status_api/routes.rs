use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderName;
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use derive_more::Constructor;
use hyper::Request;
use room_service_registry::RegistrationState;
use serde_json::json;
use tokio::sync::watch;
use tower_http::compression::CompressionLayer;
use tower_http::propagate_header::PropagateHeaderLayer;
use tower_http::request_id::{MakeRequestUuid, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{Level, Span};

use super::handlers::{health_handler, info_handler};
use super::STATUS_API_LOG_TARGET;

/// What the status pages report.
#[derive(Debug, Clone, Constructor)]
pub struct Status {
    pub app_name: Arc<str>,
    pub registration: watch::Receiver<RegistrationState>,
}

pub fn router(status: Status) -> Router {
    Router::new()
        .route("/", get(|| async { Json(json!({})) }))
        .route("/info", get(info_handler))
        .route("/health", get(health_handler))
        .with_state(status)
        .layer(CompressionLayer::new())
        .layer(PropagateHeaderLayer::new(HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(|request: &Request<axum::body::Body>, _span: &Span| {
                    let method = request.method().to_string();
                    let uri = request.uri().to_string();
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .map(|v| v.to_str().unwrap_or_default())
                        .unwrap_or_default();

                    tracing::debug!(target: STATUS_API_LOG_TARGET, %method, %uri, %request_id, "request");
                })
                .on_response(|response: &Response, latency: Duration, _span: &Span| {
                    let status_code = response.status();
                    let request_id = response
                        .headers()
                        .get("x-request-id")
                        .map(|v| v.to_str().unwrap_or_default())
                        .unwrap_or_default();
                    let latency_ms = latency.as_millis();

                    tracing::debug!(target: STATUS_API_LOG_TARGET, %latency_ms, status = %status_code, %request_id, "response");
                }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
