//! Zone id → client lookup used by the engine

use std::sync::Arc;

use super::ZoneClient;

/// Resolves a zone id to its zone-scoped client
///
/// Implemented by [`crate::ZoneClientRegistry`]; tests may supply their
/// own. Implementations must be safe for concurrent lookups.
pub trait ZoneResolver: Send + Sync {
    /// Return the client for `zone_id`, or `None` if the zone is unknown
    fn resolve(&self, zone_id: &str) -> Option<Arc<dyn ZoneClient>>;
}
