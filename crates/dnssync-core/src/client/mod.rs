//! Zone client implementations shipped with the core
//!
//! - [`MemoryZoneClient`]: In-memory zone for tests and embedding

pub mod memory;

pub use memory::MemoryZoneClient;
