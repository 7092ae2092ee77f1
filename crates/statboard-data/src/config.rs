use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::state::PaginationState;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Connection settings for the statistics API. Handed to `StatsClient::new`
/// explicitly; nothing in this crate reads process-global state after
/// construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server origin, with or without a trailing slash.
    pub base_url: String,
    /// Sent as the `key` query parameter on every request.
    pub api_key: String,
    /// `None` lets the transport wait indefinitely.
    pub request_timeout: Option<Duration>,
    /// Page size new controllers start with.
    pub default_per_page: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            request_timeout: None,
            default_per_page: PaginationState::DEFAULT_PER_PAGE,
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Reads `STATBOARD_*` variables over the defaults, loading a `.env`
    /// file first when one is present.
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        load_dotenv();

        let mut config = Self::default();

        if let Some(value) = read_env("STATBOARD_API_BASE_URL") {
            config.base_url = value;
        }
        if let Some(value) = read_env("STATBOARD_API_KEY") {
            config.api_key = value;
        }
        if let Some(secs) = read_env("STATBOARD_REQUEST_TIMEOUT_SECS")
            .and_then(|value| value.parse::<u64>().ok())
        {
            config.request_timeout = Some(Duration::from_secs(secs.max(1)));
        }
        if let Some(per_page) =
            read_env("STATBOARD_PER_PAGE").and_then(|value| value.parse::<u32>().ok())
        {
            config.default_per_page = per_page.max(1);
        }

        config
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        let missing_file = matches!(
            &err,
            dotenvy::Error::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound
        );
        if !missing_file {
            tracing::warn!("failed to load .env file: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost_with_no_key() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.api_key, "");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.default_per_page, 50);
    }

    #[test]
    fn new_keeps_the_remaining_defaults() {
        let config = ApiConfig::new("https://stats.example.com/", "secret");
        assert_eq!(config.base_url, "https://stats.example.com/");
        assert_eq!(config.api_key, "secret");
        assert_eq!(config.default_per_page, 50);
    }

    // All env manipulation lives in one test; parallel tests must not race
    // on the same variables.
    #[test]
    fn from_env_overrides_and_clamps() {
        std::env::set_var("STATBOARD_API_BASE_URL", "https://stats.internal");
        std::env::set_var("STATBOARD_API_KEY", "k-123");
        std::env::set_var("STATBOARD_REQUEST_TIMEOUT_SECS", "0");
        std::env::set_var("STATBOARD_PER_PAGE", "not-a-number");

        let config = ApiConfig::from_env();
        assert_eq!(config.base_url, "https://stats.internal");
        assert_eq!(config.api_key, "k-123");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(1)));
        assert_eq!(config.default_per_page, 50);

        std::env::remove_var("STATBOARD_API_BASE_URL");
        std::env::remove_var("STATBOARD_API_KEY");
        std::env::remove_var("STATBOARD_REQUEST_TIMEOUT_SECS");
        std::env::remove_var("STATBOARD_PER_PAGE");
    }
}
