use rust_decimal::Decimal;
use serde::Serialize;
use std::{fmt, str::FromStr};

/// Order parameters for `POST /v5/order/create`.
///
/// Field order here is the key order of the serialized body, and the
/// serialized body is the exact byte sequence that gets signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub category: Category,
    pub symbol: String,
    pub side: Side,
    #[serde(rename = "orderType")]
    pub order_type: OrderType,
    #[serde(with = "decimal_text")]
    pub qty: Decimal,
    #[serde(rename = "timeInForce")]
    pub time_in_force: TimeInForce,
    #[serde(
        rename = "stopLoss",
        skip_serializing_if = "Option::is_none",
        with = "optional_decimal_text"
    )]
    pub stop_loss: Option<Decimal>,
    #[serde(
        rename = "takeProfit",
        skip_serializing_if = "Option::is_none",
        with = "optional_decimal_text"
    )]
    pub take_profit: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Spot,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderType {
    Market,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeInForce {
    #[default]
    #[serde(rename = "GTC")]
    GoodTillCancel,
    #[serde(rename = "IOC")]
    ImmediateOrCancel,
}

impl FromStr for TimeInForce {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GTC" | "GOODTILLCANCEL" => Ok(TimeInForce::GoodTillCancel),
            "IOC" | "IMMEDIATEORCANCEL" => Ok(TimeInForce::ImmediateOrCancel),
            other => Err(format!("unsupported time in force policy: {}", other)),
        }
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeInForce::GoodTillCancel => write!(f, "GTC"),
            TimeInForce::ImmediateOrCancel => write!(f, "IOC"),
        }
    }
}

// Decimal's Display keeps the scale it was parsed with, so "0.010" stays "0.010"
mod decimal_text {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

mod optional_decimal_text {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.collect_str(v),
            None => serializer.serialize_none(),
        }
    }
}
