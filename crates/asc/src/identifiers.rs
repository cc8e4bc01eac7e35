//! Newtype resource identifiers.
//!
//! Every App Store Connect resource is addressed by an opaque, server-assigned
//! string. Each resource family gets a distinct newtype so that, for example,
//! an [`AppStoreVersionId`] cannot be passed where a [`PhasedReleaseId`] is
//! expected even though both are strings on the wire.
//!
//! Identifiers are **not** validated. The server is the only authority on what
//! a well-formed identifier looks like; an empty or malformed value is sent as
//! given and rejected (or not) by the service.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new(), as_str(), Display, From<&str>, From<String>.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wraps a server-assigned identifier.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id! {
    /// Identifies an App Store version (the parent of a phased release).
    AppStoreVersionId
}

string_id! {
    /// Identifies an App Store version phased release.
    PhasedReleaseId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_accepted_verbatim() {
        let id = PhasedReleaseId::new("");
        assert_eq!(id.as_str(), "");
    }

    #[test]
    fn identifier_serializes_as_bare_string() {
        let id = AppStoreVersionId::from("6443210987");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"6443210987\"");
        assert_eq!(id.to_string(), "6443210987");
    }
}
