// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod contest;
pub mod ingest;
pub mod metrics;
pub mod resource;
pub mod views;
pub mod window;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::contest::Contest;
pub use crate::ingest::types::ContestProvider;
pub use crate::window::{MonthScope, MonthWindow};

use axum::Router;

use crate::ingest::config::FeedConfig;

/// Build the full HTTP app from environment config (no metrics recorder).
pub fn app() -> anyhow::Result<Router> {
    let cfg = FeedConfig::from_env()?;
    let state = AppState::from_config(&cfg)?;
    Ok(router(state))
}
