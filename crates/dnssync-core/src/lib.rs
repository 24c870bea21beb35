// # dnssync-core
//
// Core library for reconciling desired DNS records against a hosted,
// zone-scoped DNS provider.
//
// ## Architecture Overview
//
// - **ZoneClient**: Trait for listing/creating/updating/deleting entries in one zone
// - **ZoneClientRegistry**: Immutable zone id → client map, built once
// - **SyncEngine**: Validates, resolves the zone, and reconciles each target
// - **policy**: Input validation and TTL normalization
// - **AggregateError**: Collects per-target failures instead of stopping early
//
// ## Design Principles
//
// 1. **One entry per target**: A record with N targets maps onto N remote entries
// 2. **Idempotent**: Ensure twice updates the same entry, never duplicates it
// 3. **Isolated failures**: One failing target never stops the others
// 4. **No cached remote state**: Every operation lists fresh from the provider
// 5. **Library-First**: The provider is a trait; the engine never sees HTTP

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod record;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use traits::{ZoneClient, ZoneClientFactory, ZoneResolver};
pub use engine::SyncEngine;
pub use registry::ZoneClientRegistry;
pub use config::{ProviderConfig, RetryConfig, ServiceEndpoint};
pub use error::{AggregateError, Error, Operation, Result};
pub use record::{DesiredRecord, RecordFilter, RecordSpec, RemoteRecordEntry, ZoneDescriptor};
pub use client::MemoryZoneClient;
