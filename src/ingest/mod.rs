// src/ingest/mod.rs
pub mod cache;
pub mod config;
pub mod providers;
pub mod types;

use anyhow::{anyhow, Result};
use chrono::FixedOffset;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::contest::Contest;
use crate::ingest::types::ContestProvider;
use crate::resource::{is_supported, normalize_resource};
use crate::window::{MonthScope, MonthWindow};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "feed_provider_contests_total",
            "Raw contests returned by providers."
        );
        describe_counter!(
            "feed_provider_errors_total",
            "Provider fetch/parse errors (soft-failed to an empty list)."
        );
        describe_counter!("feed_kept_total", "Contests kept after validation + windowing.");
        describe_counter!(
            "feed_dropped_total",
            "Contests dropped as malformed, unsupported or out of window."
        );
        describe_counter!(
            "feed_upstream_cache_hits_total",
            "Upstream responses served from the response cache."
        );
        describe_counter!(
            "feed_upstream_cache_misses_total",
            "Upstream requests that missed the response cache."
        );
        describe_histogram!("feed_pipeline_ms", "Aggregation pipeline time in milliseconds.");
        describe_gauge!(
            "feed_pipeline_last_run_ts",
            "Unix ts when the aggregation pipeline last ran."
        );
    });
}

/// Validate, normalize and window a merged batch.
///
/// Per record: required fields present, resource normalizes into the
/// allowlist (and is overwritten with the canonical key), both timestamps
/// parse, and the interval overlaps `window`. Returns (kept, dropped).
pub fn filter_and_validate(
    contests: Vec<Contest>,
    window: &MonthWindow,
    tz: FixedOffset,
) -> (Vec<Contest>, usize) {
    let total = contests.len();
    let mut kept = Vec::with_capacity(total);

    for mut c in contests {
        if c.event.is_empty() || c.start.is_empty() || c.end.is_empty() || c.resource.is_empty() {
            continue;
        }

        let resource = normalize_resource(&c.resource);
        if !is_supported(&resource) {
            continue;
        }
        c.resource = resource;

        let (Some(start), Some(end)) = (c.start_at(tz), c.end_at(tz)) else {
            tracing::debug!(event = %c.event, "unparsable contest timestamps");
            continue;
        };

        if window.overlaps(&start, &end) {
            kept.push(c);
        }
    }

    let dropped = total - kept.len();
    (kept, dropped)
}

/// Stable ascending sort by parsed start.
pub fn sort_by_start(contests: &mut [Contest], tz: FixedOffset) {
    contests.sort_by_cached_key(|c| c.start_at(tz));
}

pub fn count_by_platform(contests: &[Contest]) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for c in contests {
        *out.entry(c.resource.clone()).or_insert(0) += 1;
    }
    out
}

fn provider_failed(name: &'static str, error: &dyn std::fmt::Debug) -> Vec<Contest> {
    tracing::warn!(?error, provider = name, "provider error");
    counter!("feed_provider_errors_total", "provider" => name).increment(1);
    Vec::new()
}

/// Adapter boundary: a provider error becomes an empty list plus a log line.
async fn fetch_or_empty(provider: Arc<dyn ContestProvider>, scope: MonthScope) -> Vec<Contest> {
    match provider.fetch_contests(scope).await {
        Ok(v) => v,
        Err(e) => provider_failed(provider.name(), &e),
    }
}

/// Run the aggregation pipeline once.
///
/// All providers are fetched concurrently and joined in invocation order;
/// the merged list is then filtered to the month window and sorted by start.
/// Provider failures, panics included, never fail the run; only a month
/// with no representable window does.
pub async fn run_once(
    providers: &[Arc<dyn ContestProvider>],
    scope: MonthScope,
    tz: FixedOffset,
) -> Result<Vec<Contest>> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let window = scope
        .window(tz)
        .ok_or_else(|| anyhow!("invalid month window: {}-{:02}", scope.year, scope.month()))?;

    tracing::info!(month = scope.month(), year = scope.year, "fetching contests");

    let handles: Vec<_> = providers
        .iter()
        .map(|p| {
            let name = p.name();
            (name, tokio::spawn(fetch_or_empty(Arc::clone(p), scope)))
        })
        .collect();

    let mut merged = Vec::new();
    for (name, handle) in handles {
        // a panicking provider task is still just one failed provider
        let mut batch = match handle.await {
            Ok(v) => v,
            Err(e) => provider_failed(name, &e),
        };
        tracing::debug!(provider = name, raw = batch.len(), "provider settled");
        merged.append(&mut batch);
    }

    let (from, to) = window.upstream_range();
    tracing::debug!(total = merged.len(), %from, %to, "filtering contests");

    let (mut kept, dropped) = filter_and_validate(merged, &window, tz);
    sort_by_start(&mut kept, tz);

    // Telemetry
    let now = chrono::Utc::now().timestamp().max(0) as u64;
    counter!("feed_kept_total").increment(kept.len() as u64);
    counter!("feed_dropped_total").increment(dropped as u64);
    histogram!("feed_pipeline_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    gauge!("feed_pipeline_last_run_ts").set(now as f64);

    tracing::info!(
        kept = kept.len(),
        dropped,
        by_platform = ?count_by_platform(&kept),
        "returning contests"
    );

    Ok(kept)
}
