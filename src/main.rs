//! Contest feed — Binary Entrypoint
//! Boots the Axum HTTP server, wiring config, providers, metrics and routes.

use contest_feed::{api, ingest::config::FeedConfig, metrics::Metrics};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("contest_feed=info,warn"));

    // Shuttle may already have installed a subscriber; keep theirs if so.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = FeedConfig::from_env()?;
    tracing::info!(
        clist_credentials = cfg.clist.credentials.is_some(),
        cache_ttl_secs = cfg.cache_ttl_secs,
        tz_offset_minutes = cfg.tz_offset_minutes,
        "feed config loaded"
    );

    let metrics = Metrics::init(cfg.cache_ttl_secs)?;
    let state = api::AppState::from_config(&cfg)?;
    let router = api::router(state).merge(metrics.router());

    Ok(router.into())
}
