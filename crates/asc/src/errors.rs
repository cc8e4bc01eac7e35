//! Error types for App Store Connect calls.
//!
//! There are exactly two failure kinds a caller sees from a resource service:
//!
//! - [`AscError::Transport`]: the exchange did not produce a usable 2xx
//!   response (network failure, unserialisable request, or a non-2xx status).
//! - [`AscError::Decode`]: a 2xx body did not match the expected envelope.
//!
//! Errors are passed through unchanged. Nothing here retries, recovers, or
//! translates; when a raw [`Response`] was received it travels inside the
//! error so callers can still inspect status and headers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::Response;

// ---------------------------------------------------------------------------
// Server error payload
// ---------------------------------------------------------------------------

/// The structured error document App Store Connect returns with non-2xx
/// statuses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: Vec<ApiError>,
}

/// One entry of an [`ErrorResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Machine-readable code, e.g. `ENTITY_ERROR.ATTRIBUTE.INVALID`.
    pub code: String,

    /// HTTP status as a string, e.g. `"409"`.
    pub status: String,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,
}

/// Where in the request the server found the problem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    /// JSON pointer into the request body, e.g. `/data/attributes/phasedReleaseState`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,

    /// Offending query parameter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.title, self.code)?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// The exchange did not produce a usable 2xx response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never completed: connection, TLS, timeout, or a path that
    /// could not be turned into a URL.
    #[error("request to '{path}' failed: {source}")]
    Network {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The request body could not be serialised.
    #[error("failed to encode request body for '{path}': {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The server answered with a non-2xx status.
    ///
    /// `errors` holds the decoded error document; it is empty when the body
    /// was not one.
    #[error("server returned HTTP {}{}", .response.status, summarize(.errors))]
    Status {
        response: Response,
        errors: Vec<ApiError>,
    },
}

impl TransportError {
    /// Wraps any error raised while performing the exchange.
    pub fn network(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Network {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Builds a [`TransportError::Status`] from a non-2xx response, decoding
    /// the error document when the body is one.
    pub fn from_status(response: Response) -> Self {
        let errors = serde_json::from_slice::<ErrorResponse>(&response.body)
            .map(|doc| doc.errors)
            .unwrap_or_default();
        Self::Status { response, errors }
    }
}

fn summarize(errors: &[ApiError]) -> String {
    match errors.first() {
        Some(first) if errors.len() > 1 => format!(": {first} (+{} more)", errors.len() - 1),
        Some(first) => format!(": {first}"),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Service errors
// ---------------------------------------------------------------------------

/// Errors returned by every resource service method.
#[derive(Debug, Error)]
pub enum AscError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A 2xx response body did not conform to the expected envelope.
    #[error("failed to decode response from '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
        response: Response,
    },
}

impl AscError {
    /// Returns the raw response, when the server answered at all.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Transport(TransportError::Status { response, .. }) => Some(response),
            Self::Decode { response, .. } => Some(response),
            Self::Transport(_) => None,
        }
    }

    /// Returns the server's structured errors; empty unless this is a
    /// non-2xx status with an error document.
    pub fn api_errors(&self) -> &[ApiError] {
        match self {
            Self::Transport(TransportError::Status { errors, .. }) => errors.as_slice(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFLICT: &str = r#"{
        "errors": [{
            "id": "b2c4e6",
            "status": "409",
            "code": "ENTITY_ERROR.RELATIONSHIP.INVALID",
            "title": "The provided entity includes a relationship with an invalid value",
            "detail": "The version is already in a final state.",
            "source": { "pointer": "/data/relationships/appStoreVersion" }
        }]
    }"#;

    #[test]
    fn status_error_decodes_error_document() {
        let err = TransportError::from_status(Response::new(409, CONFLICT));
        let TransportError::Status { response, errors } = &err else {
            panic!("expected status error, got {err:?}");
        };
        assert_eq!(response.status, 409);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, "ENTITY_ERROR.RELATIONSHIP.INVALID");
        assert_eq!(
            errors[0].source.as_ref().and_then(|s| s.pointer.as_deref()),
            Some("/data/relationships/appStoreVersion")
        );
        assert!(err.to_string().starts_with("server returned HTTP 409: "));
    }

    #[test]
    fn status_error_tolerates_non_json_body() {
        let err = TransportError::from_status(Response::new(502, "Bad Gateway"));
        assert_eq!(err.to_string(), "server returned HTTP 502");
        let err = AscError::from(err);
        assert!(err.api_errors().is_empty());
        assert_eq!(err.response().map(|r| r.status), Some(502));
    }

    #[test]
    fn network_error_has_no_response() {
        let err = AscError::from(TransportError::network("appStoreVersions/1", "connection reset"));
        assert!(err.response().is_none());
        assert_eq!(
            err.to_string(),
            "request to 'appStoreVersions/1' failed: connection reset"
        );
    }
}
