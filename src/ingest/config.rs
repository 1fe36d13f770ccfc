// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
pub const ENV_CLIST_USERNAME: &str = "CLIST_API_USERNAME";
pub const ENV_CLIST_API_KEY: &str = "CLIST_API_KEY";
pub const ENV_CACHE_TTL_SECS: &str = "FEED_CACHE_TTL_SECS";
pub const ENV_TZ_OFFSET_MINUTES: &str = "FEED_TZ_OFFSET_MINUTES";

pub const DEFAULT_CONFIG_PATH: &str = "config/feed.toml";
pub const DEFAULT_CLIST_BASE_URL: &str = "https://clist.by:443/api/v4/contest/";
pub const DEFAULT_GFG_URL: &str = "https://gfg-contests-api.vercel.app/api/gfg-contests";
pub const DEFAULT_GFG_CONTEST_PREFIX: &str = "https://practice.geeksforgeeks.org/contest/";
pub const MIN_PAGE_SIZE: u32 = 100;

#[derive(Clone, PartialEq, Eq)]
pub struct ClistCredentials {
    pub username: String,
    pub api_key: String,
}

impl ClistCredentials {
    /// Both parts must be non-blank.
    pub fn new(username: &str, api_key: &str) -> Option<Self> {
        let (u, k) = (username.trim(), api_key.trim());
        if u.is_empty() || k.is_empty() {
            return None;
        }
        Some(Self {
            username: u.to_string(),
            api_key: k.to_string(),
        })
    }

    pub fn header_value(&self) -> String {
        format!("ApiKey {}:{}", self.username, self.api_key)
    }
}

// Never print the key itself.
impl std::fmt::Debug for ClistCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClistCredentials")
            .field("username", &self.username)
            .field("key_len", &self.api_key.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClistConfig {
    pub credentials: Option<ClistCredentials>,
    pub base_url: String,
    pub page_size: u32,
}

#[derive(Debug, Clone)]
pub struct GfgConfig {
    pub url: String,
    pub contest_url_prefix: String,
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub clist: ClistConfig,
    pub gfg: GfgConfig,
    /// 0 disables the upstream cache.
    pub cache_ttl_secs: u64,
    pub tz_offset_minutes: i32,
    pub http_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            clist: ClistConfig {
                credentials: None,
                base_url: DEFAULT_CLIST_BASE_URL.to_string(),
                page_size: 500,
            },
            gfg: GfgConfig {
                url: DEFAULT_GFG_URL.to_string(),
                contest_url_prefix: DEFAULT_GFG_CONTEST_PREFIX.to_string(),
            },
            cache_ttl_secs: 300,
            tz_offset_minutes: 0,
            http_timeout_secs: 10,
            connect_timeout_secs: 4,
        }
    }
}

/// On-disk overrides; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    cache_ttl_secs: Option<u64>,
    tz_offset_minutes: Option<i32>,
    http_timeout_secs: Option<u64>,
    connect_timeout_secs: Option<u64>,
    clist: FileClist,
    gfg: FileGfg,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileClist {
    base_url: Option<String>,
    page_size: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileGfg {
    url: Option<String>,
    contest_url_prefix: Option<String>,
}

impl FeedConfig {
    pub fn tz(&self) -> FixedOffset {
        FixedOffset::east_opt(self.tz_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }

    /// Load config using file + env:
    /// 1) defaults
    /// 2) $FEED_CONFIG_PATH, else config/feed.toml when present
    /// 3) env vars (credentials, TTL, zone)
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            cfg.apply_file(&pb)?;
        } else {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default.exists() {
                cfg.apply_file(&default)?;
            }
        }

        cfg.clist.credentials = ClistCredentials::new(
            &std::env::var(ENV_CLIST_USERNAME).unwrap_or_default(),
            &std::env::var(ENV_CLIST_API_KEY).unwrap_or_default(),
        );
        if let Some(ttl) = parse_env(ENV_CACHE_TTL_SECS) {
            cfg.cache_ttl_secs = ttl;
        }
        if let Some(tz) = parse_env(ENV_TZ_OFFSET_MINUTES) {
            cfg.tz_offset_minutes = tz;
        }
        cfg.sanitize();
        Ok(cfg)
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading feed config from {}", path.display()))?;
        let file: FileConfig = toml::from_str(&content)
            .with_context(|| format!("parsing feed config {}", path.display()))?;

        if let Some(v) = file.cache_ttl_secs {
            self.cache_ttl_secs = v;
        }
        if let Some(v) = file.tz_offset_minutes {
            self.tz_offset_minutes = v;
        }
        if let Some(v) = file.http_timeout_secs {
            self.http_timeout_secs = v;
        }
        if let Some(v) = file.connect_timeout_secs {
            self.connect_timeout_secs = v;
        }
        if let Some(v) = file.clist.base_url {
            self.clist.base_url = v;
        }
        if let Some(v) = file.clist.page_size {
            self.clist.page_size = v;
        }
        if let Some(v) = file.gfg.url {
            self.gfg.url = v;
        }
        if let Some(v) = file.gfg.contest_url_prefix {
            self.gfg.contest_url_prefix = v;
        }
        self.sanitize();
        Ok(())
    }

    fn sanitize(&mut self) {
        self.clist.page_size = self.clist.page_size.max(MIN_PAGE_SIZE);
        // valid FixedOffset range is under a day
        self.tz_offset_minutes = self.tz_offset_minutes.clamp(-(24 * 60 - 1), 24 * 60 - 1);
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
