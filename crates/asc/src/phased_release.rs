//! App Store version phased release resources.
//!
//! A phased release rolls an App Store version out to users with automatic
//! updates enabled over seven days. The lifecycle states are owned by the
//! server; this module only carries them.

use serde::{Deserialize, Serialize};

use crate::types::{RelationshipData, RelationshipDeclaration, ResourceLinks, Timestamp};
use crate::{AppStoreVersionId, PhasedReleaseId};

/// Type discriminator of phased release resources.
pub const PHASED_RELEASE_TYPE: &str = "appStoreVersionPhasedReleases";

/// Type discriminator of the parent App Store version resources.
pub const APP_STORE_VERSION_TYPE: &str = "appStoreVersions";

/// Sparse fieldset key for phased release attributes.
pub const PHASED_RELEASE_FIELDS_PARAM: &str = "fields[appStoreVersionPhasedReleases]";

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Server-owned lifecycle state of a phased release.
///
/// Values outside the documented set are preserved in [`PhasedReleaseState::Other`]
/// and serialised back unchanged; the client never validates or transitions
/// states itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PhasedReleaseState {
    Inactive,
    Active,
    Paused,
    Complete,
    Other(String),
}

impl PhasedReleaseState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Inactive => "INACTIVE",
            Self::Active => "ACTIVE",
            Self::Paused => "PAUSED",
            Self::Complete => "COMPLETE",
            Self::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for PhasedReleaseState {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "INACTIVE" => Self::Inactive,
            "ACTIVE" => Self::Active,
            "PAUSED" => Self::Paused,
            "COMPLETE" => Self::Complete,
            _ => Self::Other(raw),
        }
    }
}

impl From<&str> for PhasedReleaseState {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_owned())
    }
}

impl From<PhasedReleaseState> for String {
    fn from(state: PhasedReleaseState) -> Self {
        match state {
            PhasedReleaseState::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for PhasedReleaseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Resource
// ---------------------------------------------------------------------------

/// A phased release as returned by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStoreVersionPhasedRelease {
    pub id: PhasedReleaseId,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<AppStoreVersionPhasedReleaseAttributes>,

    #[serde(default)]
    pub links: ResourceLinks,
}

/// Attributes of a phased release.
///
/// Every field is independently optional. On reads, `None` means the server
/// did not send the field (for example because a sparse fieldset excluded it).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStoreVersionPhasedReleaseAttributes {
    /// Day of the seven-day rollout the release is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_day_number: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phased_release_state: Option<PhasedReleaseState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Timestamp>,

    /// Total number of days the rollout has been paused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pause_duration: Option<i64>,
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// `data` member of a phased release creation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasedReleaseCreateRequest {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<PhasedReleaseCreateAttributes>,

    pub relationships: PhasedReleaseCreateRelationships,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasedReleaseCreateAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phased_release_state: Option<PhasedReleaseState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasedReleaseCreateRelationships {
    pub app_store_version: RelationshipDeclaration,
}

impl PhasedReleaseCreateRequest {
    /// Links a new phased release to `app_store_version_id`. `attributes` is
    /// only present when an initial state is supplied.
    pub fn new(
        app_store_version_id: &AppStoreVersionId,
        initial_state: Option<PhasedReleaseState>,
    ) -> Self {
        Self {
            kind: PHASED_RELEASE_TYPE.to_owned(),
            attributes: initial_state.map(|state| PhasedReleaseCreateAttributes {
                phased_release_state: Some(state),
            }),
            relationships: PhasedReleaseCreateRelationships {
                app_store_version: RelationshipDeclaration::to(RelationshipData::new(
                    app_store_version_id.as_str(),
                    APP_STORE_VERSION_TYPE,
                )),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// `data` member of a phased release update request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasedReleaseUpdateRequest {
    #[serde(rename = "type")]
    pub kind: String,

    pub id: PhasedReleaseId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<PhasedReleaseUpdateAttributes>,
}

/// Fields that may be changed on an existing phased release.
///
/// Only fields set to `Some` are sent; everything else is left untouched
/// server-side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhasedReleaseUpdateAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phased_release_state: Option<PhasedReleaseState>,
}

impl PhasedReleaseUpdateAttributes {
    /// Changes only the release state.
    pub fn state(state: PhasedReleaseState) -> Self {
        Self {
            phased_release_state: Some(state),
        }
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.phased_release_state.is_none()
    }
}

impl PhasedReleaseUpdateRequest {
    /// Builds an update for `id`. An empty change set omits `attributes`.
    pub fn new(id: &PhasedReleaseId, changes: PhasedReleaseUpdateAttributes) -> Self {
        Self {
            kind: PHASED_RELEASE_TYPE.to_owned(),
            id: id.clone(),
            attributes: (!changes.is_empty()).then_some(changes),
        }
    }
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

/// Query options for reading the phased release of an App Store version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhasedReleaseForVersionQuery {
    /// Attribute names to include (sparse fieldset), in request order.
    pub fields: Vec<String>,
}

impl PhasedReleaseForVersionQuery {
    pub fn with_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Renders the query as ordered key/value pairs. An empty field list
    /// produces no pairs.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        if self.fields.is_empty() {
            return Vec::new();
        }
        vec![(
            PHASED_RELEASE_FIELDS_PARAM.to_owned(),
            self.fields.join(","),
        )]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn known_states_round_trip() {
        for raw in ["INACTIVE", "ACTIVE", "PAUSED", "COMPLETE"] {
            let state: PhasedReleaseState = serde_json::from_value(json!(raw)).unwrap();
            assert!(!matches!(state, PhasedReleaseState::Other(_)));
            assert_eq!(serde_json::to_value(&state).unwrap(), json!(raw));
        }
    }

    #[test]
    fn unknown_state_is_preserved() {
        let state: PhasedReleaseState = serde_json::from_value(json!("CANCELLED")).unwrap();
        assert_eq!(state, PhasedReleaseState::Other("CANCELLED".into()));
        assert_eq!(serde_json::to_value(&state).unwrap(), json!("CANCELLED"));
    }

    #[test]
    fn attributes_omit_unset_fields() {
        let attrs = AppStoreVersionPhasedReleaseAttributes {
            current_day_number: Some(0),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&attrs).unwrap(),
            json!({ "currentDayNumber": 0 })
        );
    }

    #[test]
    fn create_request_links_parent_version() {
        let version = AppStoreVersionId::new("v-42");
        let body = serde_json::to_value(PhasedReleaseCreateRequest::new(&version, None)).unwrap();
        assert_eq!(
            body,
            json!({
                "type": "appStoreVersionPhasedReleases",
                "relationships": {
                    "appStoreVersion": { "data": { "id": "v-42", "type": "appStoreVersions" } }
                }
            })
        );
    }

    #[test]
    fn empty_update_omits_attributes() {
        let id = PhasedReleaseId::new("pr-1");
        let body =
            serde_json::to_value(PhasedReleaseUpdateRequest::new(&id, Default::default())).unwrap();
        assert_eq!(
            body,
            json!({ "type": "appStoreVersionPhasedReleases", "id": "pr-1" })
        );
    }

    #[test]
    fn query_joins_fields_in_order() {
        let query = PhasedReleaseForVersionQuery::with_fields(["startDate", "phasedReleaseState"]);
        assert_eq!(
            query.to_pairs(),
            vec![(
                "fields[appStoreVersionPhasedReleases]".to_owned(),
                "startDate,phasedReleaseState".to_owned()
            )]
        );
        assert!(PhasedReleaseForVersionQuery::default().to_pairs().is_empty());
    }
}
