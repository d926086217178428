use clap::Parser;
use anyhow::{Context, Result};
use tracing::info;

use signal_relay::{
    cli::{self, Commands},
    handlers, logger,
    services::OrderRelay,
    types::Config,
};

#[derive(Parser)]
#[command(name = "signal-relay")]
#[command(about = "Relays trading alerts to the exchange as signed market orders")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(long)]
    server: bool,

    #[arg(long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::setup_logger();
    let args = Args::parse();

    match args.command {
        Some(Commands::Serve { port }) => start_server(port).await,
        Some(command) => cli::run_cli(command).await,
        None if args.server => start_server(args.port).await,
        None => {
            eprintln!("Please specify a command or use --server");
            eprintln!("Try 'signal-relay --help' for more information.");
            eprintln!();
            eprintln!("Available commands:");
            eprintln!("  serve                     - Start the webhook server");
            eprintln!("    --port <port>           - Server port (default: 8080)");
            eprintln!("  buy <symbol> <qty>        - Place a market buy");
            eprintln!("    --stop-loss <price>     - Stop-loss trigger price");
            eprintln!("    --take-profit <price>   - Take-profit trigger price");
            eprintln!("    --category <spot|linear>");
            eprintln!("    --dry-run               - Print the signed request, do not send");
            eprintln!("  sell <symbol> <qty>       - Place a market sell (same options as buy)");
            std::process::exit(1);
        }
    }
}

async fn start_server(port: u16) -> Result<()> {
    let config = Config::load()?;
    info!(
        api_url = %config.api_url,
        time_in_force = %config.time_in_force,
        timeout_ms = config.request_timeout.as_millis() as u64,
        "Configuration loaded"
    );
    let relay = OrderRelay::new(config)?;
    let app = handlers::router(relay);

    let listener = tokio::net::TcpListener::bind(&format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;

    info!("Signal relay listening on http://0.0.0.0:{}", port);
    info!("   POST /webhook  - Submit an alert");
    info!("   POST /         - Same as /webhook");
    info!("   GET  /health   - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
