use crate::error::RelayError;
use crate::services::{validate_alert, ExchangeClient, OrderBuilder};
use crate::types::{Config, ExchangeResult, OrderRequest};
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Alert in, exchange outcome out. Shared by the webhook server and the CLI.
#[derive(Clone)]
pub struct OrderRelay {
    builder: OrderBuilder,
    client: ExchangeClient,
    config: Arc<Config>,
}

impl OrderRelay {
    pub fn new(config: Config) -> Result<Self> {
        let client = ExchangeClient::new(&config)?;

        Ok(Self {
            builder: OrderBuilder::new(config.time_in_force),
            client,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn client(&self) -> &ExchangeClient {
        &self.client
    }

    // validation and building happen before anything is sent
    pub fn build_order(&self, payload: &Value) -> Result<OrderRequest, RelayError> {
        let alert = validate_alert(payload)?;
        info!(action = ?alert.action, symbol = %alert.symbol, quantity = %alert.quantity, "Alert accepted");

        Ok(self.builder.build(&alert))
    }

    pub async fn relay(&self, payload: &Value) -> Result<(OrderRequest, ExchangeResult), RelayError> {
        let order = self.build_order(payload)?;
        let result = self.client.place_order(&order).await?;

        Ok((order, result))
    }
}
