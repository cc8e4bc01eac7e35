//! Shared wire types for App Store Connect resource documents.
//!
//! App Store Connect speaks a JSON:API dialect: every request and response body
//! is an envelope with a `data` member, resources carry `id`/`type`/`attributes`,
//! and relationships point at other resources by `id` + `type`. The types in
//! this module are the resource-agnostic parts of that shape; the resource
//! specific structures live in [`crate::phased_release`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// A response document: one primary resource plus document-level links.
///
/// This is the literal wire shape of every single-resource response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    /// The primary resource.
    pub data: T,

    /// Links describing the document itself. Absent links decode as empty.
    #[serde(default)]
    pub links: DocumentLinks,
}

/// A request document. Request bodies carry only `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody<T> {
    pub data: T,
}

impl<T> RequestBody<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

// ---------------------------------------------------------------------------
// Links
// ---------------------------------------------------------------------------

/// Self-links for a resource document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentLinks {
    #[serde(rename = "self", default)]
    pub this: String,
}

/// Self-links for a single resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub this: Option<String>,
}

/// Links attached to a relationship declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipLinks {
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub this: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

/// An `id` + `type` pointer at another resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipData {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,
}

impl RelationshipData {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
        }
    }
}

/// A named relationship on a resource.
///
/// In creation requests only `data` is populated; responses may carry `links`
/// instead of (or as well as) `data`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDeclaration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RelationshipData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
}

impl RelationshipDeclaration {
    /// Declares a relationship to the resource identified by `data`.
    pub fn to(data: RelationshipData) -> Self {
        Self {
            data: Some(data),
            links: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp as used in resource attributes.
///
/// App Store Connect does not always emit strict RFC 3339: offsets frequently
/// arrive without a colon (`2020-04-18T01:17:42.000+0000`). Both forms are
/// accepted on input; output is always RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Parses either RFC 3339 or the colon-less offset variant.
    pub fn parse(value: &str) -> Result<Self, chrono::ParseError> {
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn timestamp_accepts_colonless_offset() {
        let parsed = Timestamp::parse("2020-04-18T01:17:42.000+0000").unwrap();
        let expected = Utc.with_ymd_and_hms(2020, 4, 18, 1, 17, 42).unwrap();
        assert_eq!(parsed.as_datetime(), expected);
    }

    #[test]
    fn timestamp_normalises_offset_to_utc() {
        let parsed: Timestamp = serde_json::from_str("\"2021-03-15T09:00:00+02:00\"").unwrap();
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"2021-03-15T07:00:00Z\"");
    }

    #[test]
    fn timestamp_rejects_garbage() {
        assert!(serde_json::from_str::<Timestamp>("\"next tuesday\"").is_err());
    }

    #[test]
    fn relationship_declaration_omits_absent_members() {
        let decl = RelationshipDeclaration::to(RelationshipData::new("v1", "appStoreVersions"));
        let json = serde_json::to_value(&decl).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "data": { "id": "v1", "type": "appStoreVersions" } })
        );
    }

    #[test]
    fn document_without_links_decodes() {
        let doc: Document<RelationshipData> =
            serde_json::from_str(r#"{"data":{"id":"a","type":"b"}}"#).unwrap();
        assert_eq!(doc.links, DocumentLinks::default());
        assert_eq!(doc.data.kind, "b");
    }
}
