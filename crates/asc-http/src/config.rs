//! Configuration for [`crate::HttpTransport`].
//!
//! Values come from the environment (`ASC_TOKEN`, `ASC_BASE_URL`,
//! `ASC_TIMEOUT_SECS`) or are set programmatically. The CLI layers its own
//! flags on top of the same variables.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Production App Store Connect API root.
pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1/";

/// Whole-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

pub const TOKEN_VAR: &str = "ASC_TOKEN";
pub const BASE_URL_VAR: &str = "ASC_BASE_URL";
pub const TIMEOUT_VAR: &str = "ASC_TIMEOUT_SECS";

const USER_AGENT: &str = concat!("asc-publishing/", env!("CARGO_PKG_VERSION"));

/// Errors raised while assembling a transport.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVariable(&'static str),

    #[error("invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Connection settings for the App Store Connect API.
#[derive(Clone)]
pub struct TransportConfig {
    /// API root; request paths are joined onto it. Always ends in `/`.
    pub base_url: Url,

    /// Pre-minted bearer token sent with every request.
    pub token: String,

    pub user_agent: String,

    pub timeout: Duration,
}

impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl TransportConfig {
    /// Production defaults with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            token: token.into(),
            user_agent: USER_AGENT.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Points the transport at a different API root.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to
    /// its value. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let token = get(TOKEN_VAR).ok_or(ConfigError::MissingVariable(TOKEN_VAR))?;
        let mut config = Self::new(token);

        if let Some(raw) = get(BASE_URL_VAR) {
            config = config.with_base_url(&raw)?;
        }
        if let Some(raw) = get(TIMEOUT_VAR) {
            config.timeout = parse_timeout(&raw)?;
        }
        Ok(config)
    }
}

/// Parses an API root, appending the trailing slash `Url::join` needs to keep
/// the last path segment.
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: BASE_URL_VAR,
        value: raw.to_owned(),
        reason,
    };

    let mut normalized = raw.trim().to_owned();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidValue {
            name: TIMEOUT_VAR,
            value: raw.to_owned(),
            reason: "expected a positive number of seconds".to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn token_is_required() {
        let err = TransportConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(TOKEN_VAR)));

        let err = TransportConfig::from_lookup(lookup(&[(TOKEN_VAR, "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(TOKEN_VAR)));
    }

    #[test]
    fn defaults_apply_when_only_token_is_set() {
        let config = TransportConfig::from_lookup(lookup(&[(TOKEN_VAR, "jwt")])).unwrap();
        assert_eq!(config.token, "jwt");
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = TransportConfig::from_lookup(lookup(&[
            (TOKEN_VAR, "jwt"),
            (BASE_URL_VAR, "http://localhost:8080/v1"),
            (TIMEOUT_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/v1/");
        assert_eq!(
            config.base_url.join("appStoreVersionPhasedReleases").unwrap().path(),
            "/v1/appStoreVersionPhasedReleases"
        );
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn rejects_bad_values() {
        let err = TransportConfig::from_lookup(lookup(&[(TOKEN_VAR, "jwt"), (TIMEOUT_VAR, "0")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: TIMEOUT_VAR, .. }));

        let err = TransportConfig::new("jwt").with_base_url("ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: BASE_URL_VAR, .. }));
    }

    #[test]
    fn debug_output_hides_token() {
        let rendered = format!("{:?}", TransportConfig::new("secret-jwt"));
        assert!(!rendered.contains("secret-jwt"));
    }
}
