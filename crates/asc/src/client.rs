//! Entry point grouping the resource services over one transport.

use std::sync::Arc;

use crate::publishing::PublishingService;
use crate::transport::Transport;

/// App Store Connect client.
///
/// Holds a single transport handle shared by every service it hands out.
#[derive(Clone, Debug)]
pub struct Client {
    publishing: PublishingService,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            publishing: PublishingService::new(transport),
        }
    }

    /// Phased release endpoints.
    pub fn publishing(&self) -> &PublishingService {
        &self.publishing
    }
}
