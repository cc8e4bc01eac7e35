//! App Store Connect HTTP infrastructure adapter.
//!
//! Implements the [`asc::Transport`] port over `reqwest`. URL joining, bearer
//! authentication headers, JSON bodies and query encoding live here; the
//! [`asc`] crate sees only [`asc::Transport`] and [`asc::Response`].
//!
//! Token minting is out of scope: callers supply an already-signed bearer
//! token through [`TransportConfig`].

pub mod config;
pub mod transport;

pub use config::{ConfigError, TransportConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use transport::HttpTransport;
