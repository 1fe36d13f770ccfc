use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, FixedOffset, Utc};
use tower_http::cors::CorsLayer;

use crate::contest::Contest;
use crate::ingest::{
    self, cache::HttpFetcher, config::FeedConfig, providers, types::ContestProvider,
};
use crate::resource::{platform_options, PlatformOption};
use crate::views::{FeedQuery, FeedStats};
use crate::window::MonthScope;

/// Short public lifetime, longer stale grace for intermediary caches.
pub const FEED_CACHE_CONTROL: &str = "public, s-maxage=300, stale-while-revalidate=600";

#[derive(Clone)]
pub struct AppState {
    providers: Arc<Vec<Arc<dyn ContestProvider>>>,
    tz: FixedOffset,
}

impl AppState {
    pub fn new(providers: Vec<Arc<dyn ContestProvider>>, tz: FixedOffset) -> Self {
        Self {
            providers: Arc::new(providers),
            tz,
        }
    }

    /// Production wiring: clist + GFG over one shared, cached fetcher.
    pub fn from_config(cfg: &FeedConfig) -> anyhow::Result<Self> {
        let fetcher = HttpFetcher::from_config(cfg)?;
        Ok(Self::new(providers::default_providers(cfg, fetcher), cfg.tz()))
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.tz)
    }

    fn scope(&self, q: &HashMap<String, String>) -> MonthScope {
        let month = q.get("month").and_then(|s| s.trim().parse::<u32>().ok());
        let year = q.get("year").and_then(|s| s.trim().parse::<i32>().ok());
        MonthScope::resolve(month, year, self.now())
    }

    async fn feed(&self, q: &HashMap<String, String>) -> anyhow::Result<Vec<Contest>> {
        ingest::run_once(&self.providers, self.scope(q), self.tz).await
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/contests", get(contests))
        .route("/contests/stats", get(contests_stats))
        .route("/platforms", get(platforms))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct ContestsResp {
    contests: Vec<Contest>,
}

#[derive(serde::Serialize)]
struct ErrorResp {
    error: &'static str,
    details: String,
}

fn pipeline_error(e: anyhow::Error) -> Response {
    tracing::error!(error = ?e, "contest pipeline failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResp {
            error: "Failed to fetch contests",
            details: e.to_string(),
        }),
    )
        .into_response()
}

fn with_feed_cache_headers(mut resp: Response) -> Response {
    resp.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(FEED_CACHE_CONTROL),
    );
    resp
}

async fn contests(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    let feed = match state.feed(&q).await {
        Ok(v) => v,
        Err(e) => return pipeline_error(e),
    };
    let query = FeedQuery::new(
        q.get("platform").map(String::as_str),
        q.get("q").map(String::as_str),
        q.get("upcoming").map(String::as_str),
    );
    let contests = query.apply(feed, state.now());
    with_feed_cache_headers(Json(ContestsResp { contests }).into_response())
}

async fn contests_stats(
    State(state): State<AppState>,
    Query(q): Query<HashMap<String, String>>,
) -> Response {
    match state.feed(&q).await {
        Ok(feed) => {
            with_feed_cache_headers(Json(FeedStats::compute(&feed, state.now())).into_response())
        }
        Err(e) => pipeline_error(e),
    }
}

async fn platforms() -> Json<Vec<PlatformOption>> {
    Json(platform_options())
}
