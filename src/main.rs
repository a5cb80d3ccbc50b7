//! Feed Service — Binary Entrypoint
//! Boots the Axum HTTP server, builds the feed engine from config, and
//! kicks off the initial load in the background.

use std::sync::Arc;

use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swipe_feed::api::{self, AppState};
use swipe_feed::config::FeedConfig;
use swipe_feed::metrics::Metrics;
use swipe_feed::FeedEngine;

/// Local log output for the feed service.
///
/// Off unless `FEED_DEV_LOG=1` is set on a debug build or a local/dev Shuttle
/// environment. `RUST_LOG` overrides the default `feed=info,warn` filter, which
/// shows load/publish/swipe events and every fetcher warning.
fn enable_dev_tracing() {
    let dev_flag = std::env::var("FEED_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feed=info,warn"));

    // Under `shuttle run` a subscriber may already be installed; keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    // Recorder first so metric descriptions registered by the engine stick.
    let metrics = Metrics::init()?;

    let cfg = FeedConfig::load_default()?;
    let engine = Arc::new(FeedEngine::from_config(&cfg).await?);

    // Initial load runs in the background; /feed reports `loading` until it lands.
    let bg = Arc::clone(&engine);
    tokio::spawn(async move {
        bg.load().await;
    });

    let router = api::router(AppState::new(engine)).merge(metrics.router());

    Ok(router.into())
}
