//! Typed client binding for the App Store Connect publishing endpoints.
//!
//! This crate contains the resource shapes, identifier newtypes, error types,
//! and the [`Transport`] port used by the resource services. It performs no I/O
//! itself: an infrastructure crate (`asc-http`) implements [`Transport`] and the
//! caller injects it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype resource identifiers (`AppStoreVersionId`, `PhasedReleaseId`) |
//! | [`types`] | Envelope, link, relationship and timestamp wire types |
//! | [`phased_release`] | Phased release resource, attributes, and request bodies |
//! | [`transport`] | The [`Transport`] port and raw [`Response`] |
//! | [`publishing`] | [`PublishingService`]: one method per phased release endpoint |
//! | [`errors`] | [`AscError`] and [`TransportError`] |
//!
//! ## Example
//!
//! ```no_run
//! # async fn run(transport: std::sync::Arc<dyn asc::Transport>) -> Result<(), asc::AscError> {
//! use asc::{AppStoreVersionId, Client, PhasedReleaseState};
//!
//! let client = Client::new(transport);
//! let version = AppStoreVersionId::new("6443210987");
//! let (doc, response) = client
//!     .publishing()
//!     .create_phased_release(&version, Some(PhasedReleaseState::Active))
//!     .await?;
//! println!("{} -> HTTP {}", doc.data.id, response.status);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod errors;
pub mod identifiers;
pub mod phased_release;
pub mod publishing;
pub mod transport;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use client::Client;
pub use errors::{ApiError, AscError, ErrorResponse, ErrorSource, TransportError};
pub use identifiers::{AppStoreVersionId, PhasedReleaseId};
pub use phased_release::{
    AppStoreVersionPhasedRelease, AppStoreVersionPhasedReleaseAttributes,
    PhasedReleaseCreateRequest, PhasedReleaseForVersionQuery, PhasedReleaseState,
    PhasedReleaseUpdateAttributes, PhasedReleaseUpdateRequest,
};
pub use publishing::{AppStoreVersionPhasedReleaseResponse, PublishingService};
pub use transport::{Rate, Response, Transport};
pub use types::{
    Document, DocumentLinks, RelationshipData, RelationshipDeclaration, RelationshipLinks,
    RequestBody, ResourceLinks, Timestamp,
};
