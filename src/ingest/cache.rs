// src/ingest/cache.rs
//! Upstream response cache + the shared HTTP fetcher that consults it.
//!
//! Bodies of successful responses are memoized by full request URL for a
//! fixed TTL (absolute, no sliding refresh). The cache is advisory only:
//! a miss does exactly what a hit would, just with one more GET.

use anyhow::{anyhow, Context, Result};
use metrics::counter;
use reqwest::header::HeaderMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::ingest::config::FeedConfig;

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    inner: Mutex<HashMap<String, (Instant, String)>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    pub fn get(&self, url: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let fresh = map
            .get(url)
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, body)| body.clone());
        if fresh.is_none() {
            map.remove(url);
        }
        fresh
    }

    pub fn put(&self, url: &str, body: String) {
        if !self.is_enabled() {
            return;
        }
        let mut map = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        // drop stale entries so the map tracks only live URLs
        let ttl = self.ttl;
        map.retain(|_, (at, _)| at.elapsed() < ttl);
        map.insert(url.to_string(), (Instant::now(), body));
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared GET-and-read helper for all providers.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    cache: Option<Arc<ResponseCache>>,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client, cache: Option<Arc<ResponseCache>>) -> Self {
        Self { client, cache }
    }

    /// Client with the configured timeouts; cache attached unless TTL is 0.
    pub fn from_config(cfg: &FeedConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("contest-feed/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .timeout(Duration::from_secs(cfg.http_timeout_secs))
            .build()
            .context("building reqwest client")?;
        let cache = (cfg.cache_ttl_secs > 0)
            .then(|| Arc::new(ResponseCache::new(Duration::from_secs(cfg.cache_ttl_secs))));
        Ok(Self::new(client, cache))
    }

    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.cache.as_ref()
    }

    /// One GET per call (unless served from cache). Non-2xx is an error.
    pub async fn get_text(&self, url: &str, headers: HeaderMap) -> Result<String> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(url) {
                counter!("feed_upstream_cache_hits_total").increment(1);
                tracing::debug!(%url, "upstream cache hit");
                return Ok(body);
            }
            counter!("feed_upstream_cache_misses_total").increment(1);
        }

        let resp = self
            .client
            .get(url)
            .headers(headers)
            .send()
            .await
            .context("upstream http get()")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(anyhow!(
                "upstream returned {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            ));
        }
        let body = resp.text().await.context("upstream http .text()")?;

        if let Some(cache) = &self.cache {
            cache.put(url, body.clone());
        }
        Ok(body)
    }
}
