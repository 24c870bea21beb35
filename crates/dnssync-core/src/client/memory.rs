// # Memory Zone Client
//
// In-memory implementation of ZoneClient.
//
// ## Purpose
//
// Behaves like a hosted zone without any network: entries get
// provider-style ids, lists filter exactly, unknown ids answer "not found".
// Useful for testing reconciliation logic and for embedding the engine
// where no real provider is available.
//
// ## Name Canonicalization
//
// Hosted zones store names without the root-zone dot, so a record created
// as `*.apps.example.com.` is listed back as `*.apps.example.com`. This
// client does the same for stored names and for name filters.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::record::{RecordFilter, RecordSpec, RemoteRecordEntry};
use crate::traits::ZoneClient;
use crate::Error;

/// In-memory zone client implementation
///
/// Entries are kept in creation order, which is also the order lists
/// return them in.
///
/// # Example
///
/// ```rust,no_run
/// use dnssync_core::client::MemoryZoneClient;
/// use dnssync_core::record::{RecordFilter, RecordSpec};
/// use dnssync_core::traits::ZoneClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let zone = MemoryZoneClient::new("zone-1");
///
///     zone.create_record(&RecordSpec {
///         name: "www.example.com".into(),
///         record_type: "A".into(),
///         content: "1.2.3.4".into(),
///         ttl: 120,
///     })
///     .await?;
///
///     let found = zone
///         .list_records(&RecordFilter::new("www.example.com", "A", "1.2.3.4"))
///         .await?;
///     assert_eq!(found.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryZoneClient {
    zone_id: String,
    entries: Arc<RwLock<Vec<RemoteRecordEntry>>>,
    next_id: Arc<AtomicU64>,
}

impl MemoryZoneClient {
    /// Create a new empty zone
    pub fn new(zone_id: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            entries: Arc::new(RwLock::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Insert an entry as-is, bypassing id assignment
    ///
    /// Lets callers seed duplicates or entries without an id.
    pub async fn insert(&self, entry: RemoteRecordEntry) {
        self.entries.write().await.push(entry);
    }

    /// Snapshot of every stored entry
    pub async fn entries(&self) -> Vec<RemoteRecordEntry> {
        self.entries.read().await.clone()
    }

    /// Get the number of entries in the zone
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if the zone is empty
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Remove every entry
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    fn allocate_id(&self) -> String {
        format!("{}-{:08}", self.zone_id, self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

fn canonical_name(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Empty filter fields match anything
fn matches(entry: &RemoteRecordEntry, filter: &RecordFilter) -> bool {
    (filter.name.is_empty() || canonical_name(&entry.name) == canonical_name(&filter.name))
        && (filter.record_type.is_empty() || entry.record_type == filter.record_type)
        && (filter.content.is_empty() || entry.content == filter.content)
}

fn to_entry(id: String, spec: &RecordSpec) -> RemoteRecordEntry {
    RemoteRecordEntry {
        id: Some(id),
        name: canonical_name(&spec.name).to_string(),
        record_type: spec.record_type.clone(),
        content: spec.content.clone(),
        ttl: spec.ttl,
    }
}

#[async_trait]
impl ZoneClient for MemoryZoneClient {
    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RemoteRecordEntry>, Error> {
        let guard = self.entries.read().await;
        Ok(guard.iter().filter(|e| matches(e, filter)).cloned().collect())
    }

    async fn create_record(&self, spec: &RecordSpec) -> Result<RemoteRecordEntry, Error> {
        let entry = to_entry(self.allocate_id(), spec);
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn update_record(&self, id: &str, spec: &RecordSpec) -> Result<RemoteRecordEntry, Error> {
        let mut guard = self.entries.write().await;
        let slot = guard
            .iter_mut()
            .find(|e| e.id.as_deref() == Some(id))
            .ok_or_else(|| Error::not_found(format!("dns record {} in zone {}", id, self.zone_id)))?;
        *slot = to_entry(id.to_string(), spec);
        Ok(slot.clone())
    }

    async fn delete_record(&self, id: &str) -> Result<(), Error> {
        let mut guard = self.entries.write().await;
        let before = guard.len();
        guard.retain(|e| e.id.as_deref() != Some(id));
        if guard.len() == before {
            return Err(Error::not_found(format!("dns record {} in zone {}", id, self.zone_id)));
        }
        Ok(())
    }

    fn zone_id(&self) -> &str {
        &self.zone_id
    }
}
