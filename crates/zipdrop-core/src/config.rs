//! Configuration module
//!
//! This module provides the configuration for the HTTP server and the archive workflow.
//! Values are read from the process environment (after loading an optional `.env` file).

use std::env;
use std::time::Duration;

use crate::constants::DEFAULT_RELAY_URL;

// Common constants
const SERVER_PORT: u16 = 8080;
const FETCH_TIMEOUT_SECS: u64 = 30;
const RELAY_TIMEOUT_SECS: u64 = 60;
const FETCH_CONCURRENCY: usize = 1;
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub max_request_body_bytes: usize,
    pub log_format: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub relay_url: String,
    pub relay_enabled: bool,
    pub fetch_timeout_secs: u64,
    pub relay_timeout_secs: u64,
    pub fetch_concurrency: usize,
}

/// Settings the archive workflow needs, passed explicitly to its constructor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowConfig {
    pub relay_url: String,
    pub relay_enabled: bool,
    pub fetch_timeout: Duration,
    pub relay_timeout: Duration,
    pub fetch_concurrency: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            relay_url: DEFAULT_RELAY_URL.to_string(),
            relay_enabled: true,
            fetch_timeout: Duration::from_secs(FETCH_TIMEOUT_SECS),
            relay_timeout: Duration::from_secs(RELAY_TIMEOUT_SECS),
            fetch_concurrency: FETCH_CONCURRENCY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: match var("PORT") {
                Some(port) => port
                    .trim()
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            cors_origins,
            environment,
            max_request_body_bytes: var("MAX_REQUEST_BODY_BYTES")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(MAX_REQUEST_BODY_BYTES),
            log_format: var("LOG_FORMAT")
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_else(|| "text".to_string()),
        };

        Ok(Config {
            base,
            relay_url: var("RELAY_URL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            relay_enabled: var("RELAY_ENABLED")
                .map(|s| !matches!(s.trim().to_lowercase().as_str(), "false" | "0" | "no"))
                .unwrap_or(true),
            fetch_timeout_secs: var("FETCH_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(FETCH_TIMEOUT_SECS),
            relay_timeout_secs: var("RELAY_TIMEOUT_SECS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(RELAY_TIMEOUT_SECS),
            fetch_concurrency: var("FETCH_CONCURRENCY")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(FETCH_CONCURRENCY),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.fetch_timeout_secs == 0 {
            return Err(anyhow::anyhow!("FETCH_TIMEOUT_SECS must be greater than 0"));
        }
        if self.relay_timeout_secs == 0 {
            return Err(anyhow::anyhow!("RELAY_TIMEOUT_SECS must be greater than 0"));
        }
        if self.fetch_concurrency == 0 {
            return Err(anyhow::anyhow!("FETCH_CONCURRENCY must be at least 1"));
        }
        if !(self.relay_url.starts_with("http://") || self.relay_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "RELAY_URL must be an http or https URL, got '{}'",
                self.relay_url
            ));
        }
        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn max_request_body_bytes(&self) -> usize {
        self.base.max_request_body_bytes
    }

    pub fn json_logs(&self) -> bool {
        self.base.log_format == "json"
    }

    pub fn workflow(&self) -> WorkflowConfig {
        WorkflowConfig {
            relay_url: self.relay_url.clone(),
            relay_enabled: self.relay_enabled,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            relay_timeout: Duration::from_secs(self.relay_timeout_secs),
            fetch_concurrency: self.fetch_concurrency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.server_port(), 8080);
        assert_eq!(config.cors_origins(), ["*".to_string()]);
        assert_eq!(config.environment(), "development");
        assert!(!config.json_logs());

        let workflow = config.workflow();
        assert_eq!(workflow, WorkflowConfig::default());
        assert_eq!(workflow.fetch_timeout, Duration::from_secs(30));
        assert_eq!(workflow.relay_timeout, Duration::from_secs(60));
        assert_eq!(workflow.relay_url, "https://file.io");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("RELAY_URL", "http://relay.local/upload"),
            ("RELAY_ENABLED", "false"),
            ("FETCH_TIMEOUT_SECS", "5"),
            ("FETCH_CONCURRENCY", "4"),
            ("LOG_FORMAT", "JSON"),
        ])
        .unwrap();
        assert_eq!(config.server_port(), 9000);
        assert!(config.json_logs());

        let workflow = config.workflow();
        assert_eq!(workflow.relay_url, "http://relay.local/upload");
        assert!(!workflow.relay_enabled);
        assert_eq!(workflow.fetch_timeout, Duration::from_secs(5));
        assert_eq!(workflow.fetch_concurrency, 4);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "not-a-port")]).is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(config_from(&[("FETCH_TIMEOUT_SECS", "0")])
            .unwrap()
            .validate()
            .is_err());
        assert!(config_from(&[("FETCH_CONCURRENCY", "0")])
            .unwrap()
            .validate()
            .is_err());
        assert!(config_from(&[("RELAY_URL", "ftp://relay")])
            .unwrap()
            .validate()
            .is_err());
        assert!(config_from(&[("ENVIRONMENT", "production")])
            .unwrap()
            .validate()
            .is_err());
        assert!(config_from(&[
            ("ENVIRONMENT", "production"),
            ("CORS_ORIGINS", "https://app.example.com")
        ])
        .unwrap()
        .validate()
        .is_ok());
    }
}
