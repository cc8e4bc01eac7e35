//! `reqwest`-backed implementation of [`asc::Transport`].

use std::collections::BTreeMap;

use asc::{Response, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Method;
use tracing::debug;
use url::Url;

use crate::config::{ConfigError, TransportConfig};

/// HTTP transport for the App Store Connect API.
///
/// Wraps a pooled [`reqwest::Client`]; clones share the pool, and one instance
/// can serve any number of concurrent calls.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
            token: config.token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::network(path, e))
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        query: &[(String, String)],
    ) -> Result<Response, TransportError> {
        let url = self.endpoint(path)?;
        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        debug!(%method, path, "sending request");
        let response = request
            .send()
            .await
            .map_err(|e| TransportError::network(path, e))?;

        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_owned(), v.to_owned()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::network(path, e))?
            .to_vec();
        debug!(%method, path, status, bytes = body.len(), "response received");

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response, TransportError> {
        self.execute(Method::POST, path, Some(body), &[]).await
    }

    async fn patch(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<Response, TransportError> {
        self.execute(Method::PATCH, path, Some(body), &[]).await
    }

    async fn delete(&self, path: &str) -> Result<Response, TransportError> {
        self.execute(Method::DELETE, path, None, &[]).await
    }

    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Response, TransportError> {
        self.execute(Method::GET, path, None, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let config = TransportConfig::new("jwt")
            .with_base_url("http://127.0.0.1:9/v1")
            .unwrap();
        let transport = HttpTransport::new(config).unwrap();

        let url = transport
            .endpoint("appStoreVersions/v-1/appStoreVersionPhasedRelease")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9/v1/appStoreVersions/v-1/appStoreVersionPhasedRelease"
        );
        assert_eq!(
            transport.endpoint("/appStoreVersionPhasedReleases").unwrap().path(),
            "/v1/appStoreVersionPhasedReleases"
        );
    }
}
