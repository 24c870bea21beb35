//! Core sync engine
//!
//! The SyncEngine is responsible for:
//! - Validating the desired record and zone
//! - Resolving the zone's client
//! - Normalizing the TTL (upsert only)
//! - Reconciling every target against the provider, one at a time
//!
//! ## Architecture
//!
//! ```text
//!   ensure / replace / delete
//!              │
//!              ▼
//!    ┌───────────────────┐     ┌──────────────┐
//!    │ validate_input    │────▶│ ZoneResolver │
//!    └───────────────────┘     └──────────────┘
//!                                     │
//!                                     ▼
//!                              ┌──────────────┐
//!                              │  ZoneClient  │
//!                              │ list, create │
//!                              │update, delete│
//!                              └──────────────┘
//! ```
//!
//! ## Per-Target Flow
//!
//! Upsert: list → (none: create | some: update first) for each target.
//! Delete: list → delete every match for each target.
//!
//! Failures are collected across all targets and returned together;
//! one bad target never stops the others.

use crate::error::{AggregateError, Error, Operation, Result};
use crate::policy::{normalize_ttl, validate_input};
use crate::record::{DesiredRecord, RecordFilter, RecordSpec, ZoneDescriptor};
use crate::traits::{ZoneClient, ZoneResolver};
use std::sync::Arc;
use tracing::info;

/// Core DNS sync engine
///
/// Holds no state besides the zone resolver, so it is cheap to share and
/// safe to call from many tasks. Calls on the same record are not
/// coordinated; callers needing at most one reconcile per record must
/// serialize them.
///
/// ## Duplicate Entries
///
/// When several remote entries match one target, an upsert updates only
/// the first entry the provider lists. The rest are left as they are.
#[derive(Clone)]
pub struct SyncEngine {
    zones: Arc<dyn ZoneResolver>,
}

impl SyncEngine {
    /// Create a new engine over a zone resolver
    pub fn new(zones: Arc<dyn ZoneResolver>) -> Self {
        Self { zones }
    }

    /// Converge the zone so every target of `record` exists with its TTL
    pub async fn ensure(&self, record: &DesiredRecord, zone: &ZoneDescriptor) -> Result<()> {
        self.create_or_update(record, zone).await
    }

    /// Same contract as [`SyncEngine::ensure`]
    pub async fn replace(&self, record: &DesiredRecord, zone: &ZoneDescriptor) -> Result<()> {
        self.create_or_update(record, zone).await
    }

    /// Remove every entry matching `record`'s name, type and targets
    ///
    /// Entries that are already gone count as deleted.
    pub async fn delete(&self, record: &DesiredRecord, zone: &ZoneDescriptor) -> Result<()> {
        let client = self.preflight(record, zone)?;

        let mut errs = AggregateError::new();
        for target in &record.targets {
            self.delete_target(client.as_ref(), record, zone, target, &mut errs)
                .await;
        }

        errs.into_result().map_err(Error::Aggregate)
    }

    /// Validate input and resolve the zone client; no remote call happens here
    fn preflight(
        &self,
        record: &DesiredRecord,
        zone: &ZoneDescriptor,
    ) -> Result<Arc<dyn ZoneClient>> {
        validate_input(Some(record), zone).map_err(Error::Validation)?;

        self.zones
            .resolve(&zone.id)
            .ok_or_else(|| Error::unknown_zone(zone.id.clone()))
    }

    async fn create_or_update(&self, record: &DesiredRecord, zone: &ZoneDescriptor) -> Result<()> {
        let client = self.preflight(record, zone)?;
        let ttl = normalize_ttl(record.ttl);

        let mut errs = AggregateError::new();
        for target in &record.targets {
            if let Err(e) = self
                .upsert_target(client.as_ref(), record, zone, target, ttl)
                .await
            {
                errs.push(e);
            }
        }

        errs.into_result().map_err(Error::Aggregate)
    }

    /// Create or update the single entry for one target
    async fn upsert_target(
        &self,
        client: &dyn ZoneClient,
        record: &DesiredRecord,
        zone: &ZoneDescriptor,
        target: &str,
        ttl: i64,
    ) -> Result<()> {
        let filter = RecordFilter::new(record.search_name(), &record.record_type, target);

        let existing = match client.list_records(&filter).await {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => return Ok(()),
            Err(e) => return Err(Error::target(Operation::List, target, e)),
        };

        let spec = RecordSpec::for_target(record, target, ttl);

        match existing.first() {
            None => {
                client
                    .create_record(&spec)
                    .await
                    .map_err(|e| Error::target(Operation::Create, target, e))?;
                info!(
                    record = %record.name,
                    record_type = %record.record_type,
                    zone = %zone.id,
                    content = %target,
                    ttl,
                    "created DNS record"
                );
            }
            Some(entry) => {
                let id = entry.id.as_deref().ok_or_else(|| {
                    Error::target(
                        Operation::Update,
                        target,
                        Error::malformed("record id is nil"),
                    )
                })?;
                client
                    .update_record(id, &spec)
                    .await
                    .map_err(|e| Error::target(Operation::Update, target, e))?;
                info!(
                    record = %record.name,
                    record_type = %record.record_type,
                    zone = %zone.id,
                    content = %target,
                    ttl,
                    id,
                    "updated DNS record"
                );
            }
        }

        Ok(())
    }

    /// Delete every entry matching one target, recording failures in `errs`
    async fn delete_target(
        &self,
        client: &dyn ZoneClient,
        record: &DesiredRecord,
        zone: &ZoneDescriptor,
        target: &str,
        errs: &mut AggregateError,
    ) {
        let filter = RecordFilter::new(&record.name, &record.record_type, target);

        let entries = match client.list_records(&filter).await {
            Ok(entries) => entries,
            Err(e) if e.is_not_found() => return,
            Err(e) => {
                errs.push(Error::target(Operation::List, target, e));
                return;
            }
        };

        for entry in entries {
            let Some(id) = entry.id.as_deref() else {
                errs.push(Error::target(
                    Operation::Delete,
                    target,
                    Error::malformed("record id is nil"),
                ));
                continue;
            };

            match client.delete_record(id).await {
                Ok(()) => {
                    info!(
                        record = %record.name,
                        record_type = %record.record_type,
                        zone = %zone.id,
                        content = %target,
                        id,
                        "deleted DNS record"
                    );
                }
                Err(e) if e.is_not_found() => {}
                Err(e) => errs.push(Error::target(Operation::Delete, target, e)),
            }
        }
    }
}

impl std::fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncEngine").finish_non_exhaustive()
    }
}
