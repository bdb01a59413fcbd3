use std::time::Duration;

use url::Url;

/// Environment variable holding the API base URL.
pub const API_URL_VAR: &str = "PREFLIGHT_API_URL";

/// Environment variable holding an optional bearer token.
pub const API_TOKEN_VAR: &str = "PREFLIGHT_API_TOKEN";

/// Environment variable holding an optional request timeout in whole seconds.
pub const API_TIMEOUT_VAR: &str = "PREFLIGHT_API_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Error type for client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid API base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("API base URL '{0}' cannot carry a path")]
    NotABase(String),

    #[error("Invalid PREFLIGHT_API_TIMEOUT_SECS '{value}': expected whole seconds")]
    InvalidTimeout { value: String },
}

/// Where the API lives and how to talk to it. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,

    /// Sent as `Authorization: Bearer <token>` when set.
    pub token: Option<String>,

    /// Per-request timeout. `None` waits as long as the transport does.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(base_url).map_err(|source| ConfigError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ConfigError::NotABase(base_url.to_string()));
        }

        Ok(Self {
            base_url: parsed,
            token: None,
            timeout: None,
        })
    }

    /// Read `PREFLIGHT_API_URL`, `PREFLIGHT_API_TOKEN` and `PREFLIGHT_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(base_url.trim())?;
        config.token = lookup(API_TOKEN_VAR).filter(|token| !token.is_empty());

        if let Some(value) = lookup(API_TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs = value
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout { value: value.clone() })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
