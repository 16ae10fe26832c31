//! Service configuration.
//!
//! Defaults mirror the deployed handlers: 50 places and 10 countries per
//! response unless the request asks otherwise.

use std::{str::FromStr, time::Duration};

use tracing::debug;

use crate::error::{Result, TravoteError};

pub const DEFAULT_GRAPH_API_URL: &str = "https://graph.facebook.com";

#[derive(Debug, Clone, PartialEq)]
pub struct TravoteConfig {
    /// Limit used by the places handler when the request has none
    pub places_default_limit: i64,
    /// Limit used by the countries handler when the request has none
    pub countries_default_limit: i64,
    /// Upper bound for any requested limit
    pub max_result_limit: i64,
    /// Base URL of the Facebook Graph API
    pub graph_api_url: String,
    pub http_timeout: Duration,
}

impl Default for TravoteConfig {
    fn default() -> Self {
        Self {
            places_default_limit: 50,
            countries_default_limit: 10,
            max_result_limit: 1000,
            graph_api_url: DEFAULT_GRAPH_API_URL.to_string(),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl TravoteConfig {
    pub fn builder() -> TravoteConfigBuilder {
        TravoteConfigBuilder::new()
    }

    /// Defaults overridden by `TRAVOTE_PLACES_LIMIT`, `TRAVOTE_COUNTRIES_LIMIT`,
    /// `TRAVOTE_MAX_LIMIT` and `TRAVOTE_GRAPH_API_URL` when set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut builder = TravoteConfigBuilder::new();

        if let Some(limit) = parse_var(&lookup, "TRAVOTE_PLACES_LIMIT")? {
            builder = builder.places_default_limit(limit);
        }
        if let Some(limit) = parse_var(&lookup, "TRAVOTE_COUNTRIES_LIMIT")? {
            builder = builder.countries_default_limit(limit);
        }
        if let Some(limit) = parse_var(&lookup, "TRAVOTE_MAX_LIMIT")? {
            builder = builder.max_result_limit(limit);
        }
        if let Some(url) = lookup("TRAVOTE_GRAPH_API_URL") {
            builder = builder.graph_api_url(url);
        }

        let config = builder.try_build()?;
        debug!(?config, "Loaded configuration from environment");
        Ok(config)
    }

    /// Clamp a requested limit to `max_result_limit`. Non-positive values are left
    /// for the query builder to reject.
    pub fn clamp_limit(&self, requested: i64) -> i64 {
        requested.min(self.max_result_limit)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| TravoteError::ConfigError(format!("{key}={raw:?}: {e}")))
        })
        .transpose()
}

/// Builder for [`TravoteConfig`]
#[derive(Debug, Clone, Default)]
pub struct TravoteConfigBuilder {
    config: TravoteConfig,
}

impl TravoteConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: TravoteConfig::default(),
        }
    }

    pub fn places_default_limit(mut self, limit: i64) -> Self {
        self.config.places_default_limit = limit;
        self
    }

    pub fn countries_default_limit(mut self, limit: i64) -> Self {
        self.config.countries_default_limit = limit;
        self
    }

    pub fn max_result_limit(mut self, limit: i64) -> Self {
        self.config.max_result_limit = limit;
        self
    }

    pub fn graph_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.graph_api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// Build, checking that every limit is positive and the defaults fit under the maximum.
    pub fn try_build(self) -> Result<TravoteConfig> {
        let config = self.config;
        for (name, value) in [
            ("places_default_limit", config.places_default_limit),
            ("countries_default_limit", config.countries_default_limit),
            ("max_result_limit", config.max_result_limit),
        ] {
            if value <= 0 {
                return Err(TravoteError::ConfigError(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if config.places_default_limit > config.max_result_limit
            || config.countries_default_limit > config.max_result_limit
        {
            return Err(TravoteError::ConfigError(format!(
                "default limits must not exceed max_result_limit ({})",
                config.max_result_limit
            )));
        }
        Ok(config)
    }

    /// Build without validation
    pub fn build(self) -> TravoteConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TravoteConfig::default();
        assert_eq!(config.places_default_limit, 50);
        assert_eq!(config.countries_default_limit, 10);
        assert_eq!(config.max_result_limit, 1000);
        assert_eq!(config.graph_api_url, "https://graph.facebook.com");
        assert_eq!(config.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_method_chaining() {
        let config = TravoteConfig::builder()
            .places_default_limit(20)
            .countries_default_limit(5)
            .max_result_limit(100)
            .graph_api_url("http://localhost:8080/")
            .http_timeout(Duration::from_secs(2))
            .try_build()
            .unwrap();

        assert_eq!(config.places_default_limit, 20);
        assert_eq!(config.countries_default_limit, 5);
        assert_eq!(config.max_result_limit, 100);
        assert_eq!(config.graph_api_url, "http://localhost:8080");
        assert_eq!(config.http_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_try_build_validation() {
        assert!(TravoteConfig::builder().max_result_limit(0).try_build().is_err());
        assert!(TravoteConfig::builder().places_default_limit(-5).try_build().is_err());
        assert!(
            TravoteConfig::builder()
                .places_default_limit(500)
                .max_result_limit(100)
                .try_build()
                .is_err()
        );
        // build() skips validation
        assert_eq!(TravoteConfig::builder().max_result_limit(0).build().max_result_limit, 0);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = TravoteConfig::from_lookup(lookup(&[
            ("TRAVOTE_PLACES_LIMIT", "25"),
            ("TRAVOTE_MAX_LIMIT", " 200 "),
            ("TRAVOTE_GRAPH_API_URL", "http://graph.test"),
        ]))
        .unwrap();

        assert_eq!(config.places_default_limit, 25);
        assert_eq!(config.countries_default_limit, 10);
        assert_eq!(config.max_result_limit, 200);
        assert_eq!(config.graph_api_url, "http://graph.test");
    }

    #[test]
    fn test_from_lookup_rejects_malformed_values() {
        let result = TravoteConfig::from_lookup(lookup(&[("TRAVOTE_COUNTRIES_LIMIT", "ten")]));
        assert!(matches!(result, Err(TravoteError::ConfigError(msg)) if msg.contains("TRAVOTE_COUNTRIES_LIMIT")));
    }

    #[test]
    fn test_from_lookup_empty_env_is_default() {
        let config = TravoteConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TravoteConfig::default());
    }

    #[test]
    fn test_clamp_limit() {
        let config = TravoteConfig::default();
        assert_eq!(config.clamp_limit(5), 5);
        assert_eq!(config.clamp_limit(5000), 1000);
        assert_eq!(config.clamp_limit(-1), -1);
    }
}
