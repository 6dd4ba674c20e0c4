//! Network façade configuration.
//!
//! # Design
//! Every flag has a serde default so a config file only needs `host_url`.
//! The struct is immutable once handed to `Network::new`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

fn enabled() -> bool {
    true
}

/// Configuration for a `Network` façade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Base URL of the API, e.g. `https://api.example.com`.
    pub host_url: String,

    /// URL prefix routed to the mock resolver in demo mode.
    #[serde(default)]
    pub demo_url: Option<String>,

    #[serde(default = "enabled")]
    pub enable_demo: bool,

    #[serde(default = "enabled")]
    pub enable_logging: bool,

    /// Log the host URL once when the façade is created.
    #[serde(default = "enabled")]
    pub logging_host_info: bool,

    /// Include request bodies in log lines.
    #[serde(default = "enabled")]
    pub logging_request: bool,

    /// Include response bodies in log lines.
    #[serde(default = "enabled")]
    pub logging_response: bool,
}

impl NetworkConfig {
    pub fn new(host_url: impl Into<String>) -> Self {
        Self {
            host_url: host_url.into(),
            demo_url: None,
            enable_demo: true,
            enable_logging: true,
            logging_host_info: true,
            logging_request: true,
            logging_response: true,
        }
    }

    pub fn with_demo_url(mut self, demo_url: impl Into<String>) -> Self {
        self.demo_url = Some(demo_url.into());
        self
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: NetworkConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn host(&self) -> Result<Url, ConfigError> {
        parse_url("host_url", &self.host_url)
    }

    /// Check that the configured URLs are absolute.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_url("host_url", &self.host_url)?;
        if let Some(demo_url) = &self.demo_url {
            parse_url("demo_url", demo_url)?;
        }
        Ok(())
    }
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })
}
