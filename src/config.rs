// Application configuration with environment overrides

use crate::model::DEFAULT_PRICE_RANGE;
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::search::DEFAULT_HISTORY_LIMIT;
use anyhow::Context;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub page_size: usize,
    pub history_limit: usize,
    pub price_range: (f64, f64),
    pub store_dir: PathBuf,
    // Let a parsed search category switch the active category tab
    pub sync_category: bool,
    // Theme used on first run, before settings exist
    pub prefers_dark: bool,
    pub simulate_pushes: bool,
    pub gemini: GeminiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            price_range: DEFAULT_PRICE_RANGE,
            store_dir: PathBuf::from(".travel_hub"),
            sync_category: true,
            prefers_dark: false,
            simulate_pushes: true,
            gemini: GeminiConfig::default(),
        }
    }
}

impl AppConfig {
    // Defaults overridden by `TRAVEL_HUB_*` and `GEMINI_*` variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut cfg = Self::default();

        if let Some(v) = parse_var("TRAVEL_HUB_PAGE_SIZE")? {
            cfg.page_size = v;
        }
        if let Some(v) = parse_var("TRAVEL_HUB_HISTORY_LIMIT")? {
            cfg.history_limit = v;
        }
        if let Some(v) = parse_var::<f64>("TRAVEL_HUB_MAX_PRICE")? {
            cfg.price_range.1 = v;
        }
        if let Ok(dir) = env::var("TRAVEL_HUB_STORE_DIR") {
            cfg.store_dir = PathBuf::from(dir);
        }
        if let Some(v) = parse_var("TRAVEL_HUB_SYNC_CATEGORY")? {
            cfg.sync_category = v;
        }
        if let Some(v) = parse_var("TRAVEL_HUB_PREFERS_DARK")? {
            cfg.prefers_dark = v;
        }
        if let Some(v) = parse_var("TRAVEL_HUB_SIMULATE_PUSHES")? {
            cfg.simulate_pushes = v;
        }

        cfg.gemini.api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        if let Ok(url) = env::var("GEMINI_BASE_URL") {
            cfg.gemini.base_url = url;
        }
        if let Ok(model) = env::var("GEMINI_MODEL") {
            cfg.gemini.model = model;
        }
        if let Some(v) = parse_var("GEMINI_TIMEOUT_MS")? {
            cfg.gemini.timeout_ms = v;
        }

        info!(
            "Loaded config: page size {}, store {}, smart search {}",
            cfg.page_size,
            cfg.store_dir.display(),
            if cfg.gemini.api_key.is_some() { "on" } else { "off" }
        );
        Ok(cfg)
    }
}

fn parse_var<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid {key} value: {raw:?}")),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.page_size, 6);
        assert_eq!(cfg.history_limit, 5);
        assert_eq!(cfg.price_range, (0.0, 1000.0));
        assert!(cfg.sync_category);
        assert!(cfg.gemini.api_key.is_none());
    }

    // Single test touching the environment so parallel tests don't race on it
    #[test]
    fn test_from_env_overrides_and_errors() {
        env::set_var("TRAVEL_HUB_PAGE_SIZE", "9");
        env::set_var("TRAVEL_HUB_SYNC_CATEGORY", "false");
        env::set_var("GEMINI_API_KEY", "k-123");
        let cfg = AppConfig::from_env().unwrap();
        assert_eq!(cfg.page_size, 9);
        assert!(!cfg.sync_category);
        assert_eq!(cfg.gemini.api_key.as_deref(), Some("k-123"));

        env::set_var("TRAVEL_HUB_PAGE_SIZE", "lots");
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains("TRAVEL_HUB_PAGE_SIZE"));

        env::remove_var("TRAVEL_HUB_PAGE_SIZE");
        env::remove_var("TRAVEL_HUB_SYNC_CATEGORY");
        env::remove_var("GEMINI_API_KEY");
    }
}
