//! Publishing endpoints: App Store version phased releases.
//!
//! Every method performs exactly one round trip through the shared
//! [`Transport`] and returns the raw [`Response`] next to the typed document.
//! The service keeps no state beyond the transport handle, so it can be cloned
//! freely and used from many tasks at once.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::phased_release::{
    AppStoreVersionPhasedRelease, PhasedReleaseCreateRequest, PhasedReleaseForVersionQuery,
    PhasedReleaseState, PhasedReleaseUpdateAttributes, PhasedReleaseUpdateRequest,
    APP_STORE_VERSION_TYPE, PHASED_RELEASE_TYPE,
};
use crate::transport::{Response, Transport};
use crate::types::{Document, RequestBody};
use crate::{AppStoreVersionId, AscError, PhasedReleaseId, TransportError};

/// Response document for a single phased release.
pub type AppStoreVersionPhasedReleaseResponse = Document<AppStoreVersionPhasedRelease>;

/// Client for the publishing-related App Store Connect endpoints.
#[derive(Clone)]
pub struct PublishingService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for PublishingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishingService").finish_non_exhaustive()
    }
}

impl PublishingService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Enables phased release for an App Store version.
    ///
    /// With `initial_state` absent the request carries no `attributes` and the
    /// server picks the starting state.
    #[instrument(skip_all, fields(version = %app_store_version_id))]
    pub async fn create_phased_release(
        &self,
        app_store_version_id: &AppStoreVersionId,
        initial_state: Option<PhasedReleaseState>,
    ) -> Result<(AppStoreVersionPhasedReleaseResponse, Response), AscError> {
        let path = PHASED_RELEASE_TYPE;
        let body = encode(
            path,
            RequestBody::new(PhasedReleaseCreateRequest::new(
                app_store_version_id,
                initial_state,
            )),
        )?;
        let response = self.transport.post(path, body).await?;
        decode(path, response)
    }

    /// Pauses or resumes a phased release, or releases to everyone at once.
    ///
    /// Only the fields set on `changes` are sent.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn update_phased_release(
        &self,
        id: &PhasedReleaseId,
        changes: PhasedReleaseUpdateAttributes,
    ) -> Result<(AppStoreVersionPhasedReleaseResponse, Response), AscError> {
        let path = format!("{PHASED_RELEASE_TYPE}/{id}");
        let body = encode(&path, RequestBody::new(PhasedReleaseUpdateRequest::new(id, changes)))?;
        let response = self.transport.patch(&path, body).await?;
        decode(&path, response)
    }

    /// Cancels a planned phased release that has not started.
    ///
    /// Each call issues a fresh `DELETE`; whether repeating it is harmless is
    /// up to the server.
    #[instrument(skip_all, fields(id = %id))]
    pub async fn delete_phased_release(&self, id: &PhasedReleaseId) -> Result<Response, AscError> {
        let path = format!("{PHASED_RELEASE_TYPE}/{id}");
        let response = self.transport.delete(&path).await?;
        debug!(status = response.status, "phased release delete answered");
        if !response.is_success() {
            return Err(TransportError::from_status(response).into());
        }
        Ok(response)
    }

    /// Reads the phased release status and configuration of an App Store
    /// version.
    #[instrument(skip_all, fields(version = %app_store_version_id))]
    pub async fn get_phased_release_for_app_store_version(
        &self,
        app_store_version_id: &AppStoreVersionId,
        query: Option<&PhasedReleaseForVersionQuery>,
    ) -> Result<(AppStoreVersionPhasedReleaseResponse, Response), AscError> {
        let path = format!(
            "{APP_STORE_VERSION_TYPE}/{app_store_version_id}/appStoreVersionPhasedRelease"
        );
        let pairs = query.map(PhasedReleaseForVersionQuery::to_pairs).unwrap_or_default();
        let response = self.transport.get(&path, &pairs).await?;
        decode(&path, response)
    }
}

fn encode<T: Serialize>(path: &str, body: T) -> Result<serde_json::Value, TransportError> {
    serde_json::to_value(body).map_err(|source| TransportError::Encode {
        path: path.to_owned(),
        source,
    })
}

fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<(T, Response), AscError> {
    debug!(status = response.status, path, "response received");
    if !response.is_success() {
        return Err(TransportError::from_status(response).into());
    }
    match serde_json::from_slice(&response.body) {
        Ok(value) => Ok((value, response)),
        Err(source) => Err(AscError::Decode {
            path: path.to_owned(),
            source,
            response,
        }),
    }
}
