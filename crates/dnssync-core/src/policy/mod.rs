//! Pre-flight policies applied before any remote call
//!
//! - [`validate_input`]: required-field checks on a record/zone pair
//! - [`normalize_ttl`]: TTL clamping into the provider's accepted range

pub mod ttl;
pub mod validate;

pub use ttl::{normalize_ttl, AUTOMATIC_TTL, DEFAULT_TTL, MAX_TTL, MIN_TTL};
pub use validate::validate_input;
