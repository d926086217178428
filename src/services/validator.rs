use crate::error::ValidationError;
use crate::services::normalize_symbol;
use crate::types::{Action, Alert, ProductCategory};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

/// Turns a parsed webhook payload into an [`Alert`].
///
/// Required: `action`, `symbol`, `quantity`. Optional: `stopLoss`,
/// `takeProfit` (ignored when absent or not positive) and `productCategory`
/// (unknown values fall back to linear perpetual).
pub fn validate_alert(payload: &Value) -> Result<Alert, ValidationError> {
    let fields = payload.as_object().ok_or(ValidationError::NotAnObject)?;

    let action = parse_action(fields)?;
    let symbol = parse_symbol(fields)?;

    let quantity = parse_decimal("quantity", fields.get("quantity"))?
        .ok_or(ValidationError::MissingField("quantity"))?;
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveQuantity(quantity.to_string()));
    }

    let stop_loss = positive_or_unset(parse_decimal("stopLoss", fields.get("stopLoss"))?);
    let take_profit = positive_or_unset(parse_decimal("takeProfit", fields.get("takeProfit"))?);

    let product_category =
        ProductCategory::parse_lenient(fields.get("productCategory").and_then(Value::as_str));

    Ok(Alert {
        action,
        symbol,
        quantity,
        stop_loss,
        take_profit,
        product_category,
    })
}

fn parse_action(fields: &Map<String, Value>) -> Result<Action, ValidationError> {
    let raw = match fields.get("action") {
        None | Some(Value::Null) => return Err(ValidationError::MissingField("action")),
        Some(Value::String(s)) => s.as_str(),
        Some(other) => return Err(ValidationError::InvalidAction(other.to_string())),
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "buy" => Ok(Action::Buy),
        "sell" => Ok(Action::Sell),
        "" => Err(ValidationError::MissingField("action")),
        _ => Err(ValidationError::InvalidAction(raw.to_string())),
    }
}

fn parse_symbol(fields: &Map<String, Value>) -> Result<String, ValidationError> {
    match fields.get("symbol") {
        None | Some(Value::Null) => Err(ValidationError::MissingField("symbol")),
        // "BYBIT:" survives trimming but leaves nothing to trade
        Some(Value::String(s)) if normalize_symbol(s).is_empty() => Err(ValidationError::EmptySymbol),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(ValidationError::InvalidSymbol(other.to_string())),
    }
}

// null and empty strings count as "not supplied"; anything else must be numeric
fn parse_decimal(field: &'static str, value: Option<&Value>) -> Result<Option<Decimal>, ValidationError> {
    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return Err(ValidationError::InvalidNumber {
                field,
                value: other.to_string(),
            });
        }
    };

    match Decimal::from_str(&text).or_else(|_| Decimal::from_scientific(&text)) {
        Ok(value) if same_number(&text, &value) => Ok(Some(value)),
        _ => Err(ValidationError::InvalidNumber { field, value: text }),
    }
}

// Decimal rounds past 28 fractional digits; a rounded value would resize the order
fn same_number(text: &str, value: &Decimal) -> bool {
    match (significant_digits(text), significant_digits(&value.to_string())) {
        (Some(input), Some(parsed)) => input == parsed,
        _ => false,
    }
}

// (negative, digits without leading/trailing zeros, power of ten), zero is ("", 0)
fn significant_digits(text: &str) -> Option<(bool, String, i64)> {
    let text = text.trim();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(idx) => (&unsigned[..idx], unsigned[idx + 1..].parse::<i64>().ok()?),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let frac_digits: String = frac_part.chars().filter(|c| *c != '_').collect();
    let mut digits: String = int_part.chars().filter(|c| *c != '_').collect();
    digits.push_str(&frac_digits);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut power = exponent - frac_digits.len() as i64;
    let trimmed = digits.trim_start_matches('0');
    let significant = trimmed.trim_end_matches('0');
    if significant.is_empty() {
        return Some((false, String::new(), 0));
    }
    power += (trimmed.len() - significant.len()) as i64;

    Some((negative, significant.to_string(), power))
}

fn positive_or_unset(value: Option<Decimal>) -> Option<Decimal> {
    value.filter(|v| *v > Decimal::ZERO)
}
