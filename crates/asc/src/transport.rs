//! The transport port.
//!
//! [`Transport`] is the only way this crate reaches the network. Infrastructure
//! crates implement it (see `asc-http`); tests implement it with canned
//! responses. The trait speaks `serde_json::Value` bodies and raw [`Response`]s
//! so that it stays dyn-compatible; typed encoding and decoding happen in the
//! resource services.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::TransportError;

/// Name of the header App Store Connect uses to report hourly quota usage.
pub const RATE_LIMIT_HEADER: &str = "x-rate-limit";

/// Performs exactly one HTTP exchange per call.
///
/// Implementations return `Ok` for **every** HTTP status they receive, 4xx and
/// 5xx included. Only a failure to complete the exchange (connection, TLS,
/// timeout, unbuildable URL) is an `Err`. Status interpretation is the
/// caller's job.
///
/// Paths are relative to whatever base URL the implementation is configured
/// with, e.g. `appStoreVersionPhasedReleases/abc123`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `body` as JSON with `POST`.
    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response, TransportError>;

    /// Sends `body` as JSON with `PATCH`.
    async fn patch(&self, path: &str, body: serde_json::Value)
        -> Result<Response, TransportError>;

    /// Sends a body-less `DELETE`.
    async fn delete(&self, path: &str) -> Result<Response, TransportError>;

    /// Sends a `GET` with the given query pairs, in order.
    async fn get(&self, path: &str, query: &[(String, String)])
        -> Result<Response, TransportError>;
}

// ---------------------------------------------------------------------------
// Raw response
// ---------------------------------------------------------------------------

/// The raw outcome of one HTTP exchange.
///
/// Returned to callers next to every typed result so status codes and headers
/// stay inspectable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,

    /// Response headers keyed by lower-cased name. Repeated headers keep the
    /// last value.
    pub headers: BTreeMap<String, String>,

    /// The full response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Creates a response with no headers.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// Adds a header, lower-casing its name.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Returns `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Looks up a header case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Parses the hourly quota reported by App Store Connect, if present.
    pub fn rate(&self) -> Option<Rate> {
        self.header(RATE_LIMIT_HEADER).and_then(Rate::parse)
    }
}

// ---------------------------------------------------------------------------
// Rate limit
// ---------------------------------------------------------------------------

/// Hourly request quota as reported by the `X-Rate-Limit` header.
///
/// Informational only. Nothing in this crate throttles on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rate {
    /// Requests allowed per hour.
    pub limit: u32,
    /// Requests left in the current hour.
    pub remaining: u32,
}

impl Rate {
    /// Parses `user-hour-lim:3600;user-hour-rem:3599;`. Unknown keys are
    /// ignored; both known keys must be present.
    pub fn parse(header: &str) -> Option<Self> {
        let mut limit = None;
        let mut remaining = None;

        for part in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once(':')?;
            match key.trim() {
                "user-hour-lim" => limit = value.trim().parse().ok(),
                "user-hour-rem" => remaining = value.trim().parse().ok(),
                _ => {}
            }
        }

        Some(Self {
            limit: limit?,
            remaining: remaining?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_parses_quota_header() {
        let response = Response::new(200, Vec::new())
            .with_header("X-Rate-Limit", "user-hour-lim:3600;user-hour-rem:3599;");
        assert_eq!(
            response.rate(),
            Some(Rate {
                limit: 3600,
                remaining: 3599
            })
        );
    }

    #[test]
    fn rate_requires_both_keys() {
        assert_eq!(Rate::parse("user-hour-lim:3600;"), None);
        assert_eq!(Rate::parse("garbage"), None);
    }

    #[test]
    fn rate_absent_without_header() {
        assert_eq!(Response::new(204, Vec::new()).rate(), None);
    }

    #[test]
    fn success_covers_2xx_only() {
        assert!(Response::new(201, Vec::new()).is_success());
        assert!(Response::new(204, Vec::new()).is_success());
        assert!(!Response::new(409, Vec::new()).is_success());
        assert!(!Response::new(301, Vec::new()).is_success());
    }
}
