use serde::{Deserialize, Serialize};

// headers and body for one authenticated call, built right before sending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub timestamp: String,
    pub recv_window: String,
    pub signature: String,
    pub body: String,
}

/// Response envelope returned by every V5 endpoint.
///
/// Only `ret_code` is interpreted; everything else is handed back to the
/// caller as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeResult {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: serde_json::Value,
    #[serde(rename = "retExtInfo", default)]
    pub ret_ext_info: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<u64>,
}

impl ExchangeResult {
    pub fn is_success(&self) -> bool {
        self.ret_code == 0
    }

    pub fn order_id(&self) -> Option<&str> {
        self.result.get("orderId").and_then(|v| v.as_str())
    }
}
