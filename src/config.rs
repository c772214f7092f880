use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsSource {
    Http,
    Demo,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: Url,
    pub request_timeout_secs: u64,
    pub source: StatsSource,
    pub export_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|val| !val.trim().is_empty());

        let raw_url = get("API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let api_base_url = Url::parse(raw_url.trim())
            .with_context(|| format!("invalid API_BASE_URL: {raw_url}"))?;

        let request_timeout_secs = parse_timeout(get("REQUEST_TIMEOUT_SECS"));

        let source = match get("STATS_SOURCE")
            .map(|val| val.trim().to_lowercase())
            .as_deref()
        {
            Some("demo") => StatsSource::Demo,
            _ => StatsSource::Http,
        };

        let export_dir = get("EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            api_base_url,
            request_timeout_secs,
            source,
            export_dir,
        })
    }
}

fn parse_timeout(raw: Option<String>) -> u64 {
    raw.and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .max(1)
}
