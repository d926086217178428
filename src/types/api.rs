// response bodies rendered by the webhook server
use crate::types::{ExchangeResult, OrderRequest};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
}

#[derive(Serialize)]
pub struct WebhookSuccess {
    pub success: bool,
    pub order: OrderRequest,
    pub result: ExchangeResult,
}

#[derive(Serialize)]
pub struct WebhookFailure {
    pub success: bool,
    pub kind: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}
