//! Zone client registry
//!
//! Maps each configured zone id to a client scoped to that zone. The
//! provider API is zone-scoped, so every list/create/update/delete call is
//! bound to exactly one zone.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dnssync_core::{ProviderConfig, ZoneClientRegistry};
//!
//! let config = ProviderConfig::new(api_key, crn, ["zone-a", "zone-b"]);
//! let registry = ZoneClientRegistry::build(&config, &CisFactory::new()?)?;
//!
//! // Optional: check every zone is reachable before serving requests
//! registry.verify().await?;
//! ```
//!
//! ## Immutability
//!
//! The registry is built once and never changes afterwards. There is no
//! runtime zone addition or removal, so lookups need no locking and the
//! registry can be shared freely behind an `Arc`.

use crate::config::ProviderConfig;
use crate::error::{AggregateError, Error, Result};
use crate::traits::{ZoneClient, ZoneClientFactory, ZoneResolver};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Immutable zone id → zone client map
#[derive(Default, Clone)]
pub struct ZoneClientRegistry {
    clients: HashMap<String, Arc<dyn ZoneClient>>,
}

impl std::fmt::Debug for ZoneClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneClientRegistry")
            .field("zones", &self.zone_ids())
            .finish()
    }
}

impl ZoneClientRegistry {
    /// Build one client per configured zone
    ///
    /// # Parameters
    ///
    /// - `config`: Shared provider configuration, validated first
    /// - `factory`: Creates the zone-scoped clients
    ///
    /// # Returns
    ///
    /// - `Ok(ZoneClientRegistry)`: One client per zone
    /// - `Err(Error)`: If the configuration is invalid or any client fails to build
    pub fn build(config: &ProviderConfig, factory: &dyn ZoneClientFactory) -> Result<Self> {
        config.validate()?;

        let mut clients: HashMap<String, Arc<dyn ZoneClient>> = HashMap::new();
        for zone in &config.zones {
            let client = factory.create(zone, config).map_err(|e| {
                Error::config(format!("failed to create a DNS client for zone {}: {}", zone, e))
            })?;
            debug!("Registered DNS client for zone {}", zone);
            clients.insert(zone.clone(), Arc::from(client));
        }

        Ok(Self { clients })
    }

    /// Build a registry from already-constructed clients
    ///
    /// Each client is keyed by its own [`ZoneClient::zone_id`].
    pub fn from_clients(clients: impl IntoIterator<Item = Arc<dyn ZoneClient>>) -> Result<Self> {
        let clients: HashMap<String, Arc<dyn ZoneClient>> = clients
            .into_iter()
            .map(|client| (client.zone_id().to_string(), client))
            .collect();

        if clients.is_empty() {
            return Err(Error::config("missing zone data"));
        }

        Ok(Self { clients })
    }

    /// Probe every zone client once
    ///
    /// All zones are probed even when some fail; the failures are
    /// returned together.
    pub async fn verify(&self) -> Result<()> {
        let mut errs = AggregateError::new();
        for zone in self.zone_ids() {
            let Some(client) = self.clients.get(&zone) else {
                continue;
            };
            if let Err(e) = client.probe().await {
                errs.push(Error::zone(zone, e));
            }
        }
        errs.into_result().map_err(Error::Aggregate)
    }

    /// Look up the client for a zone
    pub fn get(&self, zone_id: &str) -> Option<Arc<dyn ZoneClient>> {
        self.clients.get(zone_id).cloned()
    }

    /// Check if a zone is registered
    pub fn has_zone(&self, zone_id: &str) -> bool {
        self.clients.contains_key(zone_id)
    }

    /// List all registered zone ids
    pub fn zone_ids(&self) -> Vec<String> {
        let mut zones: Vec<String> = self.clients.keys().cloned().collect();
        zones.sort();
        zones
    }

    /// Number of registered zones
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// True when no zone is registered
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl ZoneResolver for ZoneClientRegistry {
    fn resolve(&self, zone_id: &str) -> Option<Arc<dyn ZoneClient>> {
        self.get(zone_id)
    }
}
