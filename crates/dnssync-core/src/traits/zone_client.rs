// # Zone Client Trait
//
// Defines the port through which the engine talks to a hosted DNS service.
// One client instance is bound to exactly one zone.
//
// ## Implementations
//
// - IBM Cloud Internet Services: `dnssync-provider-cis` crate
// - In-memory: [`crate::client::MemoryZoneClient`]
//
// ## Usage
//
// ```rust,ignore
// use dnssync_core::traits::ZoneClient;
// use dnssync_core::record::RecordFilter;
//
// #[tokio::main]
// async fn main() -> dnssync_core::Result<()> {
//     let client = /* ZoneClient implementation */;
//
//     let entries = client
//         .list_records(&RecordFilter::new("www.example.com", "A", "1.2.3.4"))
//         .await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::record::{RecordFilter, RecordSpec, RemoteRecordEntry};

/// Trait for zone-scoped DNS record clients
///
/// Each method is one logical round trip to the provider. Implementations
/// decide nothing about convergence; the engine owns that.
///
/// # Errors
///
/// A 404-class response must be reported as [`crate::Error::NotFound`] so
/// the engine can tell "nothing there" apart from real failures. A success
/// status carrying no result must be reported as
/// [`crate::Error::MalformedResult`].
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait ZoneClient: Send + Sync {
    /// List every entry matching the filter exactly
    ///
    /// Providers that page their results must collect all pages.
    async fn list_records(
        &self,
        filter: &RecordFilter,
    ) -> Result<Vec<RemoteRecordEntry>, crate::Error>;

    /// Create a new entry
    async fn create_record(&self, spec: &RecordSpec) -> Result<RemoteRecordEntry, crate::Error>;

    /// Replace the entry with the given id
    async fn update_record(
        &self,
        id: &str,
        spec: &RecordSpec,
    ) -> Result<RemoteRecordEntry, crate::Error>;

    /// Delete the entry with the given id
    async fn delete_record(&self, id: &str) -> Result<(), crate::Error>;

    /// Check that the zone is reachable with the configured credentials
    ///
    /// The default lists with an empty filter; providers that can limit
    /// the page size should override it.
    async fn probe(&self) -> Result<(), crate::Error> {
        self.list_records(&RecordFilter::new("", "", ""))
            .await
            .map(|_| ())
    }

    /// The zone this client is bound to
    fn zone_id(&self) -> &str;
}

/// Helper trait for constructing zone clients from configuration
pub trait ZoneClientFactory: Send + Sync {
    /// Create a client bound to `zone_id`
    ///
    /// # Parameters
    ///
    /// - `zone_id`: The zone the client will be scoped to
    /// - `config`: Shared provider configuration (credentials, endpoints)
    fn create(
        &self,
        zone_id: &str,
        config: &crate::config::ProviderConfig,
    ) -> Result<Box<dyn ZoneClient>, crate::Error>;
}
