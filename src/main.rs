//! fare-trend: flight price-trend dashboard backend.
//!
//! Single-binary Tokio application that:
//! 1. Samples Amadeus fares for a route across booking lead times
//! 2. Falls back to a synthetic curve when the provider is absent or failing
//! 3. Caches live trends per route for an hour
//! 4. Serves the trend and a booking recommendation over HTTP

mod config;
mod server;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use amadeus_client::AmadeusClient;
use common::config::AppConfig;
use common::{QuoteSource, RoutePair};
use server::{AppState, PriceTrendResponse};
use trend::{Clock, SystemClock, TrendAnalyzer, TrendCache, TrendSampler};

/// Flight price-trend dashboard backend
#[derive(Parser)]
#[command(name = "fare-trend", about = "Flight price-trend dashboard backend")]
struct Cli {
    /// Just fetch an Amadeus access token to verify credentials, then exit.
    #[arg(long)]
    check_auth: bool,

    /// Analyze a single route (e.g. TPE-NRT), print the JSON, and exit.
    #[arg(long, value_name = "ORIGIN-DEST")]
    route: Option<RoutePair>,
}

fn log_startup(cfg: &AppConfig, live: bool) {
    if live {
        info!(
            "Provider: Amadeus {} ({})",
            cfg.amadeus.hostname,
            cfg.amadeus.resolved_base_url()
        );
    } else {
        info!("Provider: none (demo mode, synthetic data only)");
    }
    info!(
        "Sampler: offsets={:?}d, pacing={}ms, adults={}, max_results={}",
        cfg.sampler.offsets_days,
        cfg.sampler.pacing_ms,
        cfg.sampler.adults,
        cfg.sampler.max_results,
    );
    info!(
        "Cache TTL: {}s, synthetic base price: {:.0}",
        cfg.cache.ttl_secs, cfg.mock.base_price
    );
}

fn build_analyzer(cfg: &AppConfig, client: Option<Arc<AmadeusClient>>) -> TrendAnalyzer {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let source = client.map(|c| c as Arc<dyn QuoteSource>);
    let sampler = TrendSampler::new(source, clock.clone(), cfg);
    let cache = TrendCache::new(Duration::from_secs(cfg.cache.ttl_secs), clock);
    TrendAnalyzer::new(sampler, cache)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fare_trend=info,amadeus_client=info,trend=info,tower_http=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    info!("✈️  fare-trend starting up...");

    // Load configuration.
    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let id_set = !cfg.amadeus.client_id.trim().is_empty();
    let secret_set = !cfg.amadeus.client_secret.trim().is_empty();
    if id_set != secret_set {
        warn!("Only one of AMADEUS_CLIENT_ID / AMADEUS_CLIENT_SECRET is set; running in demo mode");
    }

    let client = AmadeusClient::from_config(&cfg.amadeus).map(Arc::new);
    log_startup(&cfg, client.is_some());

    // ── Check-auth mode ──────────────────────────────────────────────
    if cli.check_auth {
        let Some(client) = client.as_deref() else {
            info!("No Amadeus credentials configured; nothing to check (demo mode)");
            return Ok(());
        };
        info!("Running auth check against {}...", client.base_url());
        match client.check_auth().await {
            Ok(()) => info!("✅ Auth successful"),
            Err(e) => {
                error!("❌ Auth check failed: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let analyzer = Arc::new(build_analyzer(&cfg, client));

    // ── Single-route mode ────────────────────────────────────────────
    if let Some(route) = cli.route {
        info!("Analyzing {}...", route);
        let response = PriceTrendResponse::from(analyzer.analyze(&route).await);
        let rendered =
            serde_json::to_string_pretty(&response).context("failed to render response")?;
        println!("{rendered}");
        return Ok(());
    }

    // ── HTTP server ──────────────────────────────────────────────────
    let app = server::create_router(AppState::new(analyzer));
    let listener = TcpListener::bind(cfg.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind_addr))?;

    info!("🚀 Server running on http://{}", cfg.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutdown signal received"),
                Err(e) => {
                    error!("Failed to listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        })
        .await
        .context("server error")?;

    info!("fare-trend shut down.");
    Ok(())
}
