use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

use crate::catalog::DEFAULT_CATALOG_BASE;
use crate::landing::LandingFeatures;

const DEFAULT_ADDR: &str = "0.0.0.0:3146";
const DEFAULT_DEADLINE_MS: u64 = 3000;

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: Option<String>,
    pub catalog_base: String,
    pub addr: SocketAddr,
    pub deadline: Duration,
    /// Raw countdown target; `None` means the default enrollment window.
    pub enrollment_target: Option<String>,
    pub landing_features: LandingFeatures,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("TMDB_API_KEY");
        if api_key.is_none() {
            warn!("TMDB_API_KEY not set - every catalog request will use fallback data");
        }

        let catalog_base =
            non_empty("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_CATALOG_BASE.to_string());

        let addr = non_empty("STREAMBOARD_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("STREAMBOARD_ADDR is not a valid socket address")?;

        let deadline_ms = match non_empty("CATALOG_DEADLINE_MS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .context("CATALOG_DEADLINE_MS must be a whole number of milliseconds")?,
            None => DEFAULT_DEADLINE_MS,
        };

        let landing_features = non_empty("LANDING_FEATURES")
            .map(|raw| LandingFeatures::parse(&raw))
            .unwrap_or_default();

        let settings = Self {
            api_key,
            catalog_base,
            addr,
            deadline: Duration::from_millis(deadline_ms),
            enrollment_target: non_empty("ENROLLMENT_TARGET"),
            landing_features,
        };
        info!(
            "Catalog at {} with {} ms deadline",
            settings.catalog_base, deadline_ms
        );
        Ok(settings)
    }
}
