// inbound trade signal after validation
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductCategory {
    Spot,
    #[default]
    LinearPerpetual,
}

impl ProductCategory {
    // unknown categories fall back to the default, the caller never sees an error
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("spot") => ProductCategory::Spot,
            Some("linear") | Some("linearperpetual") | Some("linear_perpetual") => {
                ProductCategory::LinearPerpetual
            }
            _ => ProductCategory::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub action: Action,
    pub symbol: String,
    pub quantity: Decimal,
    pub stop_loss: Option<Decimal>,
    pub take_profit: Option<Decimal>,
    pub product_category: ProductCategory,
}
