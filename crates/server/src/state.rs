use std::sync::Arc;

use service::cache::ReadThroughCache;
use service::{OfferingService, ProviderService};

/// Shared handler state. The cache handle is the same one both services use,
/// so the admin listener can clear it.
#[derive(Clone)]
pub struct AppState {
    pub providers: Arc<ProviderService>,
    pub offerings: Arc<OfferingService>,
    pub cache: ReadThroughCache,
}
