use crate::types::{Action, Alert, Category, OrderRequest, OrderType, ProductCategory, Side, TimeInForce};

// listing suffixes charting platforms append to the tradable symbol
const SYMBOL_SUFFIXES: &[&str] = &["-EQ", "-BE", "-BZ", ".NS", ".BO", ".P"];

/// Maps validated alerts onto market orders.
///
/// The time-in-force policy is fixed when the builder is created and applies
/// to every order it produces.
#[derive(Debug, Clone, Copy)]
pub struct OrderBuilder {
    time_in_force: TimeInForce,
}

impl OrderBuilder {
    pub fn new(time_in_force: TimeInForce) -> Self {
        Self { time_in_force }
    }

    pub fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    pub fn build(&self, alert: &Alert) -> OrderRequest {
        let side = match alert.action {
            Action::Buy => Side::Buy,
            Action::Sell => Side::Sell,
        };

        let category = match alert.product_category {
            ProductCategory::Spot => Category::Spot,
            ProductCategory::LinearPerpetual => Category::Linear,
        };

        OrderRequest {
            category,
            symbol: normalize_symbol(&alert.symbol),
            side,
            order_type: OrderType::Market,
            qty: alert.quantity,
            time_in_force: self.time_in_force,
            stop_loss: alert.stop_loss,
            take_profit: alert.take_profit,
        }
    }
}

impl Default for OrderBuilder {
    fn default() -> Self {
        Self::new(TimeInForce::default())
    }
}

/// Best-effort symbol cleanup: `"BYBIT:BTCUSDT"` becomes `"BTCUSDT"` and
/// `"RELIANCE-EQ"` becomes `"RELIANCE"`. Unknown symbols are left for the
/// exchange to reject.
pub fn normalize_symbol(raw: &str) -> String {
    let without_prefix = match raw.rfind(':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };

    let mut symbol = without_prefix.trim().to_ascii_uppercase();
    for suffix in SYMBOL_SUFFIXES {
        if symbol.len() > suffix.len() && symbol.ends_with(suffix) {
            symbol.truncate(symbol.len() - suffix.len());
            break;
        }
    }

    symbol
}
