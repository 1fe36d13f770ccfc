// src/ingest/providers/clist.rs
//! Keyed aggregator (clist.by v4). Date-windowed, resource-filtered, ordered
//! by start. Needs a username + API key; without them nothing is requested.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::FixedOffset;
use metrics::counter;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::Deserialize;

use crate::contest::Contest;
use crate::ingest::cache::HttpFetcher;
use crate::ingest::config::{ClistConfig, ClistCredentials};
use crate::ingest::types::ContestProvider;
use crate::window::MonthScope;

/// Upstream resource ids requested via `resource__in`.
pub const CLIST_RESOURCE_IDS: &[&str] = &[
    "leetcode.com",
    "codeforces.com",
    "codechef.com",
    "atcoder.jp",
    "hackerrank.com",
    "hackerearth.com",
    "kaggle.com",
    "topcoder.com",
];

#[derive(Debug, Deserialize)]
struct Page {
    objects: Option<Vec<Item>>,
}

#[derive(Debug, Deserialize)]
struct Item {
    event: Option<String>,
    start: Option<String>,
    end: Option<String>,
    resource: Option<String>,
    href: Option<String>,
}

pub struct ClistProvider {
    credentials: Option<ClistCredentials>,
    base_url: String,
    page_size: u32,
    tz: FixedOffset,
    fetcher: HttpFetcher,
}

impl ClistProvider {
    pub fn new(cfg: &ClistConfig, tz: FixedOffset, fetcher: HttpFetcher) -> Self {
        Self {
            credentials: cfg.credentials.clone(),
            base_url: cfg.base_url.clone(),
            page_size: cfg.page_size,
            tz,
            fetcher,
        }
    }

    /// Effective request URL for a month; doubles as the cache key.
    pub fn request_url(&self, scope: MonthScope) -> Result<reqwest::Url> {
        let window = scope
            .window(self.tz)
            .ok_or_else(|| anyhow!("no month window for {}-{}", scope.year, scope.month()))?;
        let (from, to) = window.upstream_range();
        let limit = self.page_size.to_string();
        let resources = CLIST_RESOURCE_IDS.join(",");
        reqwest::Url::parse_with_params(
            &self.base_url,
            &[
                ("limit", limit.as_str()),
                ("start__gt", from.as_str()),
                ("end__lt", to.as_str()),
                ("order_by", "start"),
                ("resource__in", resources.as_str()),
            ],
        )
        .with_context(|| format!("building clist url from {}", self.base_url))
    }

    pub fn parse_page(body: &str) -> Result<Vec<Contest>> {
        let page: Page = serde_json::from_str(body).context("parsing clist json")?;
        Ok(page
            .objects
            .unwrap_or_default()
            .into_iter()
            .map(|it| Contest {
                event: it.event.unwrap_or_default(),
                start: it.start.unwrap_or_default(),
                end: it.end.unwrap_or_default(),
                resource: it.resource.unwrap_or_default(),
                href: it.href.unwrap_or_default(),
                status: None,
            })
            .collect())
    }
}

#[async_trait]
impl ContestProvider for ClistProvider {
    async fn fetch_contests(&self, scope: MonthScope) -> Result<Vec<Contest>> {
        let Some(creds) = &self.credentials else {
            tracing::warn!(provider = "clist", "CLIST API credentials are not set");
            return Ok(Vec::new());
        };

        let url = self.request_url(scope)?;
        tracing::info!(provider = "clist", %url, "fetching contests");

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&creds.header_value())
            .context("clist credentials are not a valid header value")?;
        headers.insert(AUTHORIZATION, auth);

        let body = self.fetcher.get_text(url.as_str(), headers).await?;
        let out = Self::parse_page(&body)?;

        let mut resources: Vec<&str> = out.iter().map(|c| c.resource.as_str()).collect();
        resources.sort_unstable();
        resources.dedup();
        tracing::debug!(provider = "clist", ?resources, "upstream resources");
        tracing::info!(provider = "clist", count = out.len(), "clist returned contests");

        counter!("feed_provider_contests_total", "provider" => "clist").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "clist"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::config::FeedConfig;

    fn provider(creds: Option<ClistCredentials>) -> ClistProvider {
        let mut cfg = FeedConfig::default();
        cfg.clist.credentials = creds;
        cfg.cache_ttl_secs = 0;
        let fetcher = HttpFetcher::from_config(&cfg).unwrap();
        ClistProvider::new(&cfg.clist, cfg.tz(), fetcher)
    }

    #[test]
    fn url_carries_window_and_allowlist() {
        let p = provider(None);
        let url = p.request_url(MonthScope { month0: 2, year: 2024 }).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        let get = |k: &str| pairs.iter().find(|(kk, _)| kk == k).map(|(_, v)| v.clone());
        assert_eq!(get("limit").as_deref(), Some("500"));
        assert_eq!(get("start__gt").as_deref(), Some("2024-03-01T00:00:00.000Z"));
        assert_eq!(get("end__lt").as_deref(), Some("2024-03-31T23:59:59.000Z"));
        assert_eq!(get("order_by").as_deref(), Some("start"));
        assert_eq!(get("resource__in").unwrap().split(',').count(), CLIST_RESOURCE_IDS.len());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let body = r#"{"objects":[{"event":"Round 1","resource":"codeforces.com"}]}"#;
        let out = ClistProvider::parse_page(body).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start, "");
        assert_eq!(out[0].href, "");
        assert!(out[0].status.is_none());
    }

    #[test]
    fn missing_objects_is_empty_list() {
        assert!(ClistProvider::parse_page("{}").unwrap().is_empty());
        assert!(ClistProvider::parse_page(r#"{"objects":null}"#).unwrap().is_empty());
        assert!(ClistProvider::parse_page("not json").is_err());
    }

    #[tokio::test]
    async fn no_credentials_means_no_call() {
        let p = provider(None);
        let out = p.fetch_contests(MonthScope { month0: 0, year: 2024 }).await.unwrap();
        assert!(out.is_empty());
    }
}
