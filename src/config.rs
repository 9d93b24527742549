use std::path::PathBuf;
use std::time::Duration;

use crate::game_log::DEFAULT_WINDOW;
use crate::leaders::DEFAULT_LEADERS_LIMIT;

pub const DEFAULT_SEASON: &str = "2025-26";
pub const DEFAULT_CACHE_DIR: &str = "cached_data";
const DEFAULT_HTTP_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    /// Files written by the batch fetcher.
    Cache,
    /// Stats provider over HTTP.
    Live,
}

impl SourceMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "cache" | "cached" => Some(Self::Cache),
            "live" | "api" => Some(Self::Live),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub cache_dir: PathBuf,
    pub season: String,
    pub window: usize,
    pub source: SourceMode,
    pub http_ttl: Duration,
    pub leaders_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            season: DEFAULT_SEASON.to_string(),
            window: DEFAULT_WINDOW,
            source: SourceMode::Cache,
            http_ttl: Duration::from_secs(DEFAULT_HTTP_TTL_SECS),
            leaders_limit: DEFAULT_LEADERS_LIMIT,
        }
    }
}

impl AppConfig {
    /// Reads `.env.local` and `.env` (if present) and then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let number = |key: &str| text(key).and_then(|v| v.parse::<u64>().ok());
        Self {
            cache_dir: text("HOOPS_FORM_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            season: text("HOOPS_FORM_SEASON").unwrap_or(defaults.season),
            window: number("HOOPS_FORM_WINDOW")
                .map(|w| w as usize)
                .unwrap_or(defaults.window)
                .max(1),
            source: text("HOOPS_FORM_SOURCE")
                .and_then(|v| SourceMode::parse(&v))
                .unwrap_or(defaults.source),
            http_ttl: number("HOOPS_FORM_HTTP_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_ttl),
            leaders_limit: number("HOOPS_FORM_LEADERS_LIMIT")
                .map(|n| n as usize)
                .unwrap_or(defaults.leaders_limit)
                .max(1),
        }
    }
}
