//! # FX Quotes — spread-adjusted latest-price service
//!
//! ## Architecture Overview
//!
//! ```text
//!  ┌──────────────┐  raw tick lines   ┌──────────────┐   ┌─────────────────────────┐
//!  │  Price feed  │ ────────────────▶ │ TickConsumer │──▶│ PriceService            │
//!  │  (stdin/mpsc)│                   └──────────────┘   │  parse → spread → merge │
//!  └──────────────┘                                      │            │            │
//!                    POST /price  ──────────────────────▶│            ▼            │
//!                                                        │       QuoteStore        │
//!  ┌──────────────┐  GET /price                          │  (memory | PostgreSQL)  │
//!  │   Clients    │ ◀────────────────────────────────────┤                         │
//!  └──────────────┘  GET /price/{EUR-USD}                └─────────────────────────┘
//! ```
//!
//! Configuration is documented in [`config`]; `RUST_LOG` sets the tracing
//! filter (default `fx_quotes=debug,tower_http=info`).

use std::sync::Arc;

use anyhow::Context;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod consumer;
mod engine;
mod error;
mod models;
mod routes;
mod service;
mod state;
mod store;

use config::AppConfig;
use consumer::{forward_lines, TickConsumer, FEED_CHANNEL_CAPACITY};
use engine::{SpreadAdjuster, TickParser};
use service::PriceService;
use state::build_state;
use store::{InMemoryQuoteStore, QuoteStore};

// ─── Entry Point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env (optional — CI/prod can use real env vars) ──────────────
    dotenvy::dotenv().ok();

    // ── 2. Initialise structured logging ─────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("fx_quotes=debug".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════════╗
  ║        FX QUOTES — Price Feed Service         ║
  ║        parse · spread · latest quote          ║
  ╚═══════════════════════════════════════════════╝"#
    );

    // ── 3. Configuration ─────────────────────────────────────────────────────
    let config = AppConfig::from_env().context("Invalid configuration")?;
    info!(
        spread      = %config.spread.spread(),
        scale       = config.spread.scale(),
        tick_offset = %config.tick_offset,
        "⚙️  Pricing configuration loaded"
    );

    // ── 4. Quote store ───────────────────────────────────────────────────────
    let store = build_store(&config).await?;

    // ── 5. Pipeline ──────────────────────────────────────────────────────────
    let prices = Arc::new(PriceService::new(
        TickParser::new(config.tick_offset),
        SpreadAdjuster::new(config.spread),
        store,
    ));

    // ── 6. Feed channel + consumer ───────────────────────────────────────────
    let (feed_tx, feed_rx) = mpsc::channel::<String>(FEED_CHANNEL_CAPACITY);
    tokio::spawn(TickConsumer::new(prices.clone()).run(feed_rx));

    if config.feed_stdin {
        info!("📡 Reading raw ticks from stdin");
        tokio::spawn(async move {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            if let Err(e) = forward_lines(stdin, feed_tx).await {
                error!(error = %e, "stdin feed failed");
            }
        });
    } else {
        drop(feed_tx);
    }

    // ── 7. CORS ──────────────────────────────────────────────────────────────
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // ── 8. Router ────────────────────────────────────────────────────────────
    let app = routes::router(build_state(prices))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // ── 9. Bind & Serve ──────────────────────────────────────────────────────
    let addr = config.bind_addr;
    info!(?addr, "🚀 FX Quotes server starting");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ─── Store Selection ──────────────────────────────────────────────────────────

#[cfg(feature = "postgres")]
async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn QuoteStore>> {
    match &config.database_url {
        Some(url) => {
            let pool = store::postgres::init_pool(url).await?;
            Ok(Arc::new(store::postgres::PgQuoteStore::new(pool)))
        }
        None => {
            info!("🗃️  No DATABASE_URL — using in-memory quote store");
            Ok(Arc::new(InMemoryQuoteStore::new()))
        }
    }
}

#[cfg(not(feature = "postgres"))]
async fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn QuoteStore>> {
    if config.database_url.is_some() {
        tracing::warn!("DATABASE_URL is set but the `postgres` feature is disabled — using in-memory store");
    } else {
        info!("🗃️  Using in-memory quote store");
    }
    Ok(Arc::new(InMemoryQuoteStore::new()))
}
