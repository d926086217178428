use clap::{Args, Subcommand};
use anyhow::{Context, Result};
use serde_json::{json, Map, Value};
use crate::{
    error::RelayError,
    services::OrderRelay,
    types::{Config, ExchangeResult, OrderRequest, SignedRequest},
};

#[derive(Subcommand)]
pub enum Commands {
    /// Run the webhook server
    Serve {
        #[arg(long, default_value = "8080")]
        port: u16,
    },
    /// Send a market buy through the relay
    Buy(OrderArgs),
    /// Send a market sell through the relay
    Sell(OrderArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    pub symbol: String,
    /// Quantity as decimal text, sent with the same precision
    pub qty: String,
    #[arg(long, help = "Stop-loss trigger price")]
    pub stop_loss: Option<String>,
    #[arg(long, help = "Take-profit trigger price")]
    pub take_profit: Option<String>,
    #[arg(long, help = "Product category (spot, linear)")]
    pub category: Option<String>,
    #[arg(long, help = "Print the signed request without sending it")]
    pub dry_run: bool,
}

impl OrderArgs {
    // same shape the webhook receives, so manual orders go through the same validation
    pub fn to_alert(&self, action: &str) -> Value {
        let mut alert = Map::new();
        alert.insert("action".to_string(), json!(action));
        alert.insert("symbol".to_string(), json!(self.symbol));
        alert.insert("quantity".to_string(), json!(self.qty));
        if let Some(sl) = &self.stop_loss {
            alert.insert("stopLoss".to_string(), json!(sl));
        }
        if let Some(tp) = &self.take_profit {
            alert.insert("takeProfit".to_string(), json!(tp));
        }
        if let Some(category) = &self.category {
            alert.insert("productCategory".to_string(), json!(category));
        }
        Value::Object(alert)
    }
}

pub async fn run_cli(command: Commands) -> Result<()> {
    match command {
        Commands::Serve { .. } => anyhow::bail!("serve is handled by the binary entry point"),
        Commands::Buy(args) => place(&args, "buy").await,
        Commands::Sell(args) => place(&args, "sell").await,
    }
}

async fn place(args: &OrderArgs, action: &str) -> Result<()> {
    let config = Config::load()?;
    let relay = OrderRelay::new(config)?;

    let order = relay
        .build_order(&args.to_alert(action))
        .context("Alert rejected")?;

    if args.dry_run {
        let signed = relay.client().prepare(&order).context("Failed to sign order")?;
        print_signed_request(&order, &signed);
        return Ok(());
    }

    println!("Placing MARKET {:?} order for {} {}", order.side, order.qty, order.symbol);

    match relay.client().place_order(&order).await {
        Ok(result) => {
            print_order_result(&order, &result);
            Ok(())
        }
        Err(RelayError::Exchange { code, message }) => {
            eprintln!("Order rejected by exchange ({}): {}", code, message);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to place order: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_signed_request(order: &OrderRequest, signed: &SignedRequest) {
    println!("\n+--------------------------------------------------+");
    println!("|                DRY RUN (not sent)                |");
    println!("+--------------------------------------------------+");
    println!("| Symbol: {:<40} |", order.symbol);
    println!("| Time in force: {:<33} |", order.time_in_force);
    println!("| X-BAPI-TIMESTAMP: {:<30} |", signed.timestamp);
    println!("| X-BAPI-RECV-WINDOW: {:<28} |", signed.recv_window);
    println!("+--------------------------------------------------+");
    println!("X-BAPI-SIGN: {}", signed.signature);
    println!("Body: {}", signed.body);
}

fn print_order_result(order: &OrderRequest, result: &ExchangeResult) {
    println!("\n+--------------------------------------------------+");
    println!("|                ORDER CONFIRMATION                |");
    println!("+--------------------------------------------------+");
    println!("| Side: {:<42} |", format!("{:?}", order.side));
    println!("| Symbol: {:<40} |", order.symbol);
    println!("| Quantity: {:<38} |", order.qty);
    println!("| Order ID: {:<38} |", result.order_id().unwrap_or("-"));
    println!("| Message: {:<39} |", result.ret_msg);
    println!("+--------------------------------------------------+");
    println!("Order submitted successfully!");
}
