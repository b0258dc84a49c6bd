//! Client configuration.
//!
//! # Design
//! `MeritConfig` is resolved once, validated, and then never mutated. All
//! defaults live here rather than in the resource clients, which only read
//! the resolved values.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://api.merit.systems/v1";
pub const DEFAULT_CHECKOUT_URL: &str = "https://terminal.merit.systems/checkout";

pub const ENV_API_KEY: &str = "MERIT_API_KEY";
pub const ENV_BASE_URL: &str = "MERIT_BASE_URL";
pub const ENV_CHECKOUT_URL: &str = "MERIT_CHECKOUT_URL";
pub const ENV_TIMEOUT_SECS: &str = "MERIT_TIMEOUT_SECS";

/// Resolved, immutable settings shared by every resource client.
#[derive(Clone, PartialEq, Eq)]
pub struct MeritConfig {
    api_key: String,
    base_url: String,
    checkout_url: Url,
    timeout: Option<Duration>,
}

impl MeritConfig {
    /// Configuration with production defaults for everything but the key.
    pub fn new(api_key: &str) -> Result<Self, ConfigError> {
        Self::builder(api_key).build()
    }

    pub fn builder(api_key: &str) -> MeritConfigBuilder {
        MeritConfigBuilder {
            api_key: api_key.to_string(),
            base_url: None,
            checkout_url: None,
            timeout: None,
        }
    }

    /// Load from `MERIT_API_KEY`, `MERIT_BASE_URL`, `MERIT_CHECKOUT_URL` and
    /// `MERIT_TIMEOUT_SECS`. Only the key is required.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_API_KEY).ok_or(ConfigError::MissingApiKey)?;
        let mut builder = Self::builder(&api_key);
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            builder = builder.base_url(&base_url);
        }
        if let Some(checkout_url) = lookup(ENV_CHECKOUT_URL) {
            builder = builder.checkout_url(&checkout_url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidTimeout(format!("{ENV_TIMEOUT_SECS}={raw:?}")))?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        builder.build()
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Data API base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn checkout_url(&self) -> &Url {
        &self.checkout_url
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for MeritConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MeritConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("checkout_url", &self.checkout_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for `MeritConfig`. Unset fields take the production defaults.
#[derive(Clone)]
pub struct MeritConfigBuilder {
    api_key: String,
    base_url: Option<String>,
    checkout_url: Option<String>,
    timeout: Option<Duration>,
}

impl MeritConfigBuilder {
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn checkout_url(mut self, checkout_url: &str) -> Self {
        self.checkout_url = Some(checkout_url.to_string());
        self
    }

    /// Overall per-request timeout. Without one, requests wait indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<MeritConfig, ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(ConfigError::InvalidTimeout("timeout must be non-zero".to_string()));
        }

        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        parse_http_url("base_url", base_url)?;
        let checkout_url = parse_http_url(
            "checkout_url",
            self.checkout_url.as_deref().unwrap_or(DEFAULT_CHECKOUT_URL),
        )?;

        Ok(MeritConfig {
            api_key: self.api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            checkout_url,
            timeout: self.timeout,
        })
    }
}

fn parse_http_url(field: &'static str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: format!("{raw:?}: {e}"),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            field,
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}
