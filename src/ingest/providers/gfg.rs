// src/ingest/providers/gfg.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use reqwest::header::HeaderMap;
use serde::Deserialize;

use crate::contest::Contest;
use crate::ingest::cache::HttpFetcher;
use crate::ingest::config::GfgConfig;
use crate::ingest::types::ContestProvider;
use crate::window::MonthScope;

pub const GFG_RESOURCE: &str = "geeksforgeeks.org";

#[derive(Debug, Deserialize)]
struct Envelope {
    results: Option<Results>,
}

#[derive(Debug, Deserialize)]
struct Results {
    upcoming: Option<Vec<Item>>,
    past: Option<Vec<Item>>,
}

#[derive(Debug, Deserialize)]
struct Item {
    name: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    slug: Option<String>,
    status: Option<String>,
}

/// Single-platform GeeksforGeeks feed. Unauthenticated, no date parameter:
/// always returns its own upcoming + past sets.
pub struct GfgProvider {
    url: String,
    contest_url_prefix: String,
    fetcher: HttpFetcher,
}

impl GfgProvider {
    pub fn new(cfg: &GfgConfig, fetcher: HttpFetcher) -> Self {
        Self {
            url: cfg.url.clone(),
            contest_url_prefix: cfg.contest_url_prefix.clone(),
            fetcher,
        }
    }

    pub fn parse_body(&self, body: &str) -> Result<Vec<Contest>> {
        let env: Envelope = serde_json::from_str(body).context("parsing gfg json")?;
        let (upcoming, past) = env
            .results
            .map(|r| (r.upcoming.unwrap_or_default(), r.past.unwrap_or_default()))
            .unwrap_or_default();

        Ok(upcoming
            .into_iter()
            .chain(past)
            .map(|it| Contest {
                event: it.name.unwrap_or_default(),
                start: it.start_time.unwrap_or_default(),
                end: it.end_time.unwrap_or_default(),
                resource: GFG_RESOURCE.to_string(),
                href: format!(
                    "{}{}",
                    self.contest_url_prefix,
                    it.slug.as_deref().unwrap_or_default()
                ),
                status: it.status.filter(|s| !s.trim().is_empty()),
            })
            .collect())
    }
}

#[async_trait]
impl ContestProvider for GfgProvider {
    async fn fetch_contests(&self, _scope: MonthScope) -> Result<Vec<Contest>> {
        let body = self.fetcher.get_text(&self.url, HeaderMap::new()).await?;
        let out = self.parse_body(&body)?;

        tracing::info!(provider = "gfg", count = out.len(), "gfg returned contests");
        counter!("feed_provider_contests_total", "provider" => "gfg").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "gfg"
    }
}
