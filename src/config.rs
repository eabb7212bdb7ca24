// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_CONFIG_PATH: &str = "DASHBOARD_CONFIG_PATH";
const ENV_SEO_API_KEY: &str = "SEO_API_KEY";
const DEFAULT_CONFIG_PATH: &str = "config/dashboard.toml";

fn default_user_agent() -> String {
    "traffic-analytics-dashboard/0.1 (analytics dashboard; contact: ops@example.com)".to_string()
}

fn default_pageviews_base() -> String {
    "https://wikimedia.org/api/rest_v1/metrics/pageviews/per-article/en.wikipedia/all-access/user"
        .to_string()
}

fn default_seo_base() -> String {
    "https://api.seoreviewtools.com/website-traffic-v2".to_string()
}

/// Service configuration. Everything has a sane default so the binary boots
/// with no config file at all; the SEO key can also arrive per-request.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Wikimedia pageviews endpoint up to (not including) the article segment.
    #[serde(default = "default_pageviews_base")]
    pub pageviews_base: String,
    #[serde(default = "default_seo_base")]
    pub seo_base: String,
    /// Server-side fallback key for the SEO view. Usually supplied via the
    /// SEO_API_KEY env var rather than the file.
    #[serde(default)]
    pub seo_api_key: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            pageviews_base: default_pageviews_base(),
            seo_base: default_seo_base(),
            seo_api_key: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading dashboard config from {}", path.display()))?;
        let cfg: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("parsing dashboard config from {}", path.display()))?;
        Ok(cfg)
    }

    /// Load using env var + fallbacks:
    /// 1) $DASHBOARD_CONFIG_PATH (must exist if set)
    /// 2) config/dashboard.toml
    /// 3) built-in defaults
    /// SEO_API_KEY, when set, overrides the file's key.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            Self::from_toml_file(&pb)
                .with_context(|| format!("{ENV_CONFIG_PATH} points at {}", pb.display()))?
        } else {
            let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::from_toml_file(&default_p)?
            } else {
                Self::default()
            }
        };

        if let Ok(key) = std::env::var(ENV_SEO_API_KEY) {
            if !key.trim().is_empty() {
                cfg.seo_api_key = Some(key);
            }
        }
        Ok(cfg)
    }
}
