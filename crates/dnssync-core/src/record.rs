//! Record and zone data model
//!
//! - [`DesiredRecord`]: the logical record a caller wants to exist
//! - [`ZoneDescriptor`]: which remote zone to act on
//! - [`RemoteRecordEntry`]: one entry as the provider stores it
//! - [`RecordFilter`] / [`RecordSpec`]: list query and create/update body

use serde::{Deserialize, Serialize};

/// A desired DNS record with one or more target values
///
/// Each target maps onto exactly one remote entry with the same name,
/// type and TTL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredRecord {
    /// Record name, possibly ending with the root-zone dot
    pub name: String,

    /// Record type (e.g. "A", "CNAME", "TXT")
    pub record_type: String,

    /// Content values, one remote entry per target
    pub targets: Vec<String>,

    /// Requested TTL in seconds (normalized before use)
    #[serde(default)]
    pub ttl: i64,
}

impl DesiredRecord {
    /// Create a new desired record
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        targets: impl IntoIterator<Item = impl Into<String>>,
        ttl: i64,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            targets: targets.into_iter().map(Into::into).collect(),
            ttl,
        }
    }

    /// The name used for list filters: one trailing `.` removed
    ///
    /// Wildcard and apex records often carry the root-zone suffix, which
    /// the provider does not store. Create and update keep [`Self::name`].
    pub fn search_name(&self) -> &str {
        self.name.strip_suffix('.').unwrap_or(&self.name)
    }
}

/// Identifies the remote zone an operation applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneDescriptor {
    /// Zone identifier, must be registered with the zone client registry
    pub id: String,
}

impl ZoneDescriptor {
    /// Create a zone descriptor
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// One record entry as stored by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecordEntry {
    /// Provider-assigned id, required for update and delete
    pub id: Option<String>,
    /// Record name
    pub name: String,
    /// Record type
    pub record_type: String,
    /// Single content value
    pub content: String,
    /// TTL in seconds
    pub ttl: i64,
}

/// Filter for listing entries in a zone
///
/// Every field is an exact-match constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    pub name: String,
    pub record_type: String,
    pub content: String,
}

impl RecordFilter {
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            content: content.into(),
        }
    }
}

/// Body of a create or update call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    pub ttl: i64,
}

impl RecordSpec {
    /// Build the entry body for one target of a desired record
    pub fn for_target(record: &DesiredRecord, target: &str, ttl: i64) -> Self {
        Self {
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            content: target.to_string(),
            ttl,
        }
    }
}
