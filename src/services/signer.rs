use crate::error::SigningError;
use crate::types::{Config, SignedRequest};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// HMAC-SHA256 over `timestamp || api_key || recv_window || body`, hex encoded.
///
/// `body` must be the exact bytes that go on the wire.
pub fn sign(
    secret: &str,
    timestamp: &str,
    api_key: &str,
    recv_window: &str,
    body: &str,
) -> Result<String, SigningError> {
    if secret.is_empty() {
        return Err(SigningError::EmptySecret);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| SigningError::InvalidKey(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(api_key.as_bytes());
    mac.update(recv_window.as_bytes());
    mac.update(body.as_bytes());

    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[derive(Clone)]
pub struct RequestSigner {
    api_key: String,
    api_secret: String,
    recv_window: String,
}

impl RequestSigner {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            recv_window: config.recv_window.to_string(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn sign_body(&self, body: String, timestamp_ms: i64) -> Result<SignedRequest, SigningError> {
        let timestamp = timestamp_ms.to_string();
        let signature = sign(
            &self.api_secret,
            &timestamp,
            &self.api_key,
            &self.recv_window,
            &body,
        )?;

        Ok(SignedRequest {
            timestamp,
            recv_window: self.recv_window.clone(),
            signature,
            body,
        })
    }
}
