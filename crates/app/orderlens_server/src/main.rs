//! OrderLens API server binary.
//!
//! Reads configuration from the environment (and `.env`), computes the order
//! summary once, then serves `/chat` and `/csv-to-json/`.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use orderlens_api::config::ApiConfig;
use orderlens_core::llm::OpenAiChat;
use orderlens_core::summary::{self, OrderSummary};
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "orderlens_server", about = "OrderLens API server")]
struct Args {
    /// Address to listen on. Overrides `BIND_ADDR`.
    #[arg(long)]
    bind_addr: Option<String>,

    /// Maximum number of database connections used while loading the summary.
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// Seconds to wait for a database connection before giving up.
    #[arg(long, default_value_t = 30)]
    acquire_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,orderlens_api=debug,orderlens_core=debug,tower_http=debug",
                )
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env()?;
    if let Some(addr) = args.bind_addr.clone() {
        config.bind_addr = addr;
    }

    info!(
        bind_addr = %config.bind_addr,
        model = %config.openai.model,
        "starting orderlens_server"
    );

    let summary = load_order_summary(&config, &args).await;
    info!(loaded = summary.loaded, summary = %summary.summary, "order summary ready");

    let state = orderlens_api::AppState {
        summary: Arc::new(summary),
        model: Arc::new(OpenAiChat::new(config.openai.clone())),
        config: config.clone(),
    };

    let app = orderlens_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Connects, aggregates the `orders` table and disconnects.
///
/// An unreachable database degrades to the "no data" summary.
async fn load_order_summary(config: &ApiConfig, args: &Args) -> OrderSummary {
    info!(max_connections = args.max_connections, "connecting to order database");
    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(Duration::from_secs(args.acquire_timeout))
        .connect(&config.database_url)
        .await;

    match pool {
        Ok(pool) => {
            let summary = summary::load_summary(&pool).await;
            pool.close().await;
            summary
        }
        Err(e) => {
            warn!(error = %e, "order database unavailable, serving without summary");
            OrderSummary::unavailable()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
