use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::warn;
use crate::{error::RelayError, services::OrderRelay, types::*};

pub fn router(relay: OrderRelay) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/", post(webhook))
        .route("/webhook", post(webhook))
        .layer(CorsLayer::permissive())
        .with_state(relay)
}

// health check
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().timestamp().max(0) as u64,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// alert in, order out. the body is parsed here so bad JSON gets our error shape
pub async fn webhook(State(relay): State<OrderRelay>, body: Bytes) -> Response {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            warn!("Rejected malformed webhook body: {}", e);
            return failure(
                StatusCode::BAD_REQUEST,
                "bad_request",
                format!("malformed JSON body: {}", e),
                None,
            );
        }
    };

    match relay.relay(&payload).await {
        Ok((order, result)) => (
            StatusCode::OK,
            Json(WebhookSuccess {
                success: true,
                order,
                result,
            }),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            RelayError::Signing(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::Transport { timed_out: true, .. } => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Transport { .. } => StatusCode::BAD_GATEWAY,
            RelayError::Exchange { .. } => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let code = match &self {
            RelayError::Exchange { code, .. } => Some(*code),
            _ => None,
        };
        failure(self.status_code(), self.kind(), self.to_string(), code)
    }
}

fn failure(status: StatusCode, kind: &'static str, error: String, code: Option<i64>) -> Response {
    (
        status,
        Json(WebhookFailure {
            success: false,
            kind,
            error,
            code,
        }),
    )
        .into_response()
}
