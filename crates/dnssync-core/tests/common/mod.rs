//! Test doubles and common utilities for reconciliation contract tests
//!
//! [`RecordingZoneClient`] wraps a [`MemoryZoneClient`], records every call
//! the engine makes, and can be told to fail specific calls.

#![allow(dead_code)]

use async_trait::async_trait;
use dnssync_core::error::Result;
use dnssync_core::record::{RecordFilter, RecordSpec, RemoteRecordEntry};
use dnssync_core::traits::{ZoneClient, ZoneResolver};
use dnssync_core::{DesiredRecord, Error, MemoryZoneClient, SyncEngine, ZoneDescriptor};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

pub const ZONE_ID: &str = "zone-1";

/// One call observed by the recording client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(RecordFilter),
    Create(RecordSpec),
    Update(String, RecordSpec),
    Delete(String),
}

/// Faults to inject, keyed by target content or entry id
#[derive(Debug, Default)]
struct Faults {
    list_not_found: HashSet<String>,
    list_fail: HashSet<String>,
    create_fail: HashSet<String>,
    update_fail: HashSet<String>,
    delete_fail_ids: HashSet<String>,
    delete_vanished_ids: HashSet<String>,
}

/// A zone client that tracks calls and injects failures
#[derive(Clone)]
pub struct RecordingZoneClient {
    inner: MemoryZoneClient,
    calls: Arc<Mutex<Vec<Call>>>,
    faults: Arc<Mutex<Faults>>,
}

impl RecordingZoneClient {
    pub fn new(zone_id: &str) -> Self {
        Self {
            inner: MemoryZoneClient::new(zone_id),
            calls: Arc::new(Mutex::new(Vec::new())),
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    /// The backing in-memory zone
    pub fn zone(&self) -> &MemoryZoneClient {
        &self.inner
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the number of calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn create_calls(&self) -> Vec<RecordSpec> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Create(spec) => Some(spec),
                _ => None,
            })
            .collect()
    }

    pub fn update_calls(&self) -> Vec<(String, RecordSpec)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(id, spec) => Some((id, spec)),
                _ => None,
            })
            .collect()
    }

    pub fn list_calls(&self) -> Vec<RecordFilter> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::List(filter) => Some(filter),
                _ => None,
            })
            .collect()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// List for this content answers 404
    pub fn list_not_found_for(&self, content: &str) {
        self.faults.lock().unwrap().list_not_found.insert(content.to_string());
    }

    /// List for this content fails with a server error
    pub fn fail_list_for(&self, content: &str) {
        self.faults.lock().unwrap().list_fail.insert(content.to_string());
    }

    /// Create for this content fails with a server error
    pub fn fail_create_for(&self, content: &str) {
        self.faults.lock().unwrap().create_fail.insert(content.to_string());
    }

    /// Update for this content fails with a server error
    pub fn fail_update_for(&self, content: &str) {
        self.faults.lock().unwrap().update_fail.insert(content.to_string());
    }

    /// Delete of this id fails with a server error
    pub fn fail_delete_for_id(&self, id: &str) {
        self.faults.lock().unwrap().delete_fail_ids.insert(id.to_string());
    }

    /// Another actor removes this id just before our delete lands
    pub fn vanish_before_delete(&self, id: &str) {
        self.faults.lock().unwrap().delete_vanished_ids.insert(id.to_string());
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn server_error(what: &str) -> Error {
    Error::provider("test", format!("injected 500 on {}", what))
}

#[async_trait]
impl ZoneClient for RecordingZoneClient {
    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RemoteRecordEntry>> {
        self.record(Call::List(filter.clone()));
        {
            let faults = self.faults.lock().unwrap();
            if faults.list_not_found.contains(&filter.content) {
                return Err(Error::not_found(format!("no records for {}", filter.content)));
            }
            if faults.list_fail.contains(&filter.content) {
                return Err(server_error("list"));
            }
        }
        self.inner.list_records(filter).await
    }

    async fn create_record(&self, spec: &RecordSpec) -> Result<RemoteRecordEntry> {
        self.record(Call::Create(spec.clone()));
        if self.faults.lock().unwrap().create_fail.contains(&spec.content) {
            return Err(server_error("create"));
        }
        self.inner.create_record(spec).await
    }

    async fn update_record(&self, id: &str, spec: &RecordSpec) -> Result<RemoteRecordEntry> {
        self.record(Call::Update(id.to_string(), spec.clone()));
        if self.faults.lock().unwrap().update_fail.contains(&spec.content) {
            return Err(server_error("update"));
        }
        self.inner.update_record(id, spec).await
    }

    async fn delete_record(&self, id: &str) -> Result<()> {
        self.record(Call::Delete(id.to_string()));
        let (fail, vanished) = {
            let faults = self.faults.lock().unwrap();
            (
                faults.delete_fail_ids.contains(id),
                faults.delete_vanished_ids.contains(id),
            )
        };
        if fail {
            return Err(server_error("delete"));
        }
        if vanished {
            // The concurrent actor wins; our delete then finds nothing
            let _ = self.inner.delete_record(id).await;
        }
        self.inner.delete_record(id).await
    }

    fn zone_id(&self) -> &str {
        self.inner.zone_id()
    }
}

/// A resolver that knows exactly one zone and counts lookups
pub struct SingleZoneResolver {
    client: Arc<RecordingZoneClient>,
    lookups: Mutex<usize>,
}

impl SingleZoneResolver {
    pub fn new(client: Arc<RecordingZoneClient>) -> Self {
        Self {
            client,
            lookups: Mutex::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }
}

impl ZoneResolver for SingleZoneResolver {
    fn resolve(&self, zone_id: &str) -> Option<Arc<dyn ZoneClient>> {
        *self.lookups.lock().unwrap() += 1;
        if zone_id == self.client.zone_id() {
            Some(self.client.clone() as Arc<dyn ZoneClient>)
        } else {
            None
        }
    }
}

/// Engine wired to a fresh recording client for [`ZONE_ID`]
pub fn engine() -> (SyncEngine, Arc<RecordingZoneClient>, Arc<SingleZoneResolver>) {
    let client = Arc::new(RecordingZoneClient::new(ZONE_ID));
    let resolver = Arc::new(SingleZoneResolver::new(client.clone()));
    let engine = SyncEngine::new(resolver.clone());
    (engine, client, resolver)
}

pub fn zone() -> ZoneDescriptor {
    ZoneDescriptor::new(ZONE_ID)
}

pub fn a_record(name: &str, targets: &[&str], ttl: i64) -> DesiredRecord {
    DesiredRecord::new(name, "A", targets.iter().copied(), ttl)
}

/// Seed an entry directly into the backing zone
pub async fn seed(client: &RecordingZoneClient, id: Option<&str>, name: &str, content: &str) {
    client
        .zone()
        .insert(RemoteRecordEntry {
            id: id.map(str::to_string),
            name: name.to_string(),
            record_type: "A".to_string(),
            content: content.to_string(),
            ttl: 120,
        })
        .await;
}
