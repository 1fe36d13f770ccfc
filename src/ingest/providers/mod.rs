// src/ingest/providers/mod.rs
pub mod clist;
pub mod gfg;

use std::sync::Arc;

use crate::ingest::cache::HttpFetcher;
use crate::ingest::config::FeedConfig;
use crate::ingest::types::ContestProvider;

pub use clist::ClistProvider;
pub use gfg::GfgProvider;

/// Production provider set, in merge order: clist first, then GFG.
/// Both share one fetcher (and therefore one upstream cache).
pub fn default_providers(cfg: &FeedConfig, fetcher: HttpFetcher) -> Vec<Arc<dyn ContestProvider>> {
    vec![
        Arc::new(ClistProvider::new(&cfg.clist, cfg.tz(), fetcher.clone())),
        Arc::new(GfgProvider::new(&cfg.gfg, fetcher)),
    ]
}
