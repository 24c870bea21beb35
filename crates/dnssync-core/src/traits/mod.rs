//! Core traits for the DNS sync system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`ZoneClient`]: List/create/update/delete record entries in one zone
//! - [`ZoneClientFactory`]: Build a zone client from shared provider configuration
//! - [`ZoneResolver`]: Look up the client for a zone id

pub mod zone_client;
pub mod zone_resolver;

pub use zone_client::{ZoneClient, ZoneClientFactory};
pub use zone_resolver::ZoneResolver;
