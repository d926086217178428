use crate::error::{RelayError, SigningError};
use crate::services::signer::RequestSigner;
use crate::types::{Config, ExchangeResult, OrderRequest, SignedRequest};
use anyhow::{Context, Result};
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::{debug, error, info, warn};

const ORDER_CREATE_PATH: &str = "/v5/order/create";

#[derive(Clone)]
pub struct ExchangeClient {
    client: Client,
    base_url: String,
    signer: RequestSigner,
}

impl ExchangeClient {
    // client initialization, the timeout bounds the whole request
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.clone(),
            signer: RequestSigner::new(config),
        })
    }

    /// Serializes and signs `order` without sending it.
    pub fn prepare(&self, order: &OrderRequest) -> Result<SignedRequest, RelayError> {
        let body = serde_json::to_string(order).map_err(SigningError::from)?;
        let timestamp = chrono::Utc::now().timestamp_millis();

        Ok(self.signer.sign_body(body, timestamp)?)
    }

    /// Places a single market order. One attempt, no retry.
    pub async fn place_order(&self, order: &OrderRequest) -> Result<ExchangeResult, RelayError> {
        let signed = self.prepare(order)?;
        info!(
            symbol = %order.symbol,
            side = ?order.side,
            qty = %order.qty,
            category = ?order.category,
            "Submitting market order"
        );

        let response = self
            .client
            .post(format!("{}{}", self.base_url, ORDER_CREATE_PATH))
            .header("X-BAPI-API-KEY", self.signer.api_key())
            .header("X-BAPI-TIMESTAMP", &signed.timestamp)
            .header("X-BAPI-SIGN", &signed.signature)
            .header("X-BAPI-SIGN-TYPE", "2")
            .header("X-BAPI-RECV-WINDOW", &signed.recv_window)
            .header(CONTENT_TYPE, "application/json")
            // the signed string itself, never a re-serialization
            .body(signed.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    warn!(symbol = %order.symbol, "Order request timed out, the exchange may still have accepted it");
                } else {
                    error!(symbol = %order.symbol, "Order request failed: {}", e);
                }
                RelayError::from(e)
            })?;

        let status = response.status();
        let text = response.text().await?;
        debug!(%status, body = %text, "Exchange response");

        interpret_response(status.as_u16(), status.canonical_reason(), &text)
    }
}

// the embedded retCode is authoritative, HTTP 200 alone means nothing
fn interpret_response(
    status: u16,
    reason: Option<&str>,
    text: &str,
) -> Result<ExchangeResult, RelayError> {
    let http_ok = (200..300).contains(&status);

    let envelope = match serde_json::from_str::<ExchangeResult>(text) {
        Ok(envelope) => envelope,
        Err(e) if http_ok => {
            return Err(RelayError::Transport {
                message: format!("unreadable response from exchange: {}", e),
                timed_out: false,
            });
        }
        Err(_) => {
            let message = if text.trim().is_empty() {
                reason.unwrap_or("unknown error").to_string()
            } else {
                text.trim().to_string()
            };
            error!(status, "Exchange returned HTTP error: {}", message);
            return Err(RelayError::Exchange {
                code: i64::from(status),
                message,
            });
        }
    };

    if !envelope.is_success() {
        error!(
            code = envelope.ret_code,
            "Exchange rejected order: {}", envelope.ret_msg
        );
        return Err(RelayError::Exchange {
            code: envelope.ret_code,
            message: envelope.ret_msg,
        });
    }

    info!(order_id = envelope.order_id().unwrap_or("-"), "Order accepted");
    Ok(envelope)
}
