//! Runtime configuration.
//!
//! Values come from the environment (optionally via `.env`) and can be
//! overridden by CLI flags.
//!
//! - `BRENT_API_URL`: backend base URL (default `http://localhost:5000`)
//! - `BRENT_API_TIMEOUT_SECS`: per-request timeout (default 30)

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_URL: &str = "BRENT_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "BRENT_API_TIMEOUT_SECS";

pub const PRICES_PATH: &str = "/api/prices";
pub const CHANGE_POINT_PATH: &str = "/api/change-point";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ApiConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            let url = url.trim();
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                AppError::new(2, format!("Invalid {ENV_TIMEOUT_SECS} '{raw}': {e}"))
            })?;
            config.timeout = Duration::from_secs(secs.max(1));
        }

        Ok(config)
    }

    pub fn with_overrides(mut self, api_url: Option<&str>, timeout_secs: Option<u64>) -> Self {
        if let Some(url) = api_url {
            self.base_url = url.to_string();
        }
        if let Some(secs) = timeout_secs {
            self.timeout = Duration::from_secs(secs.max(1));
        }
        self
    }

    /// Join the base URL with an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_env_empty() {
        let config = ApiConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.endpoint(PRICES_PATH), "http://localhost:5000/api/prices");
    }

    #[test]
    fn env_values_and_overrides() {
        let config = ApiConfig::from_lookup(|key| match key {
            ENV_API_URL => Some("http://oil.internal:8080/".to_string()),
            ENV_TIMEOUT_SECS => Some("5".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.endpoint(CHANGE_POINT_PATH),
            "http://oil.internal:8080/api/change-point"
        );

        let config = config.with_overrides(Some("http://127.0.0.1:5000"), None);
        assert_eq!(config.endpoint(PRICES_PATH), "http://127.0.0.1:5000/api/prices");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ApiConfig::from_lookup(|key| {
            (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
