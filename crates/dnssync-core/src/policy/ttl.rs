// # TTL Policy
//
// The provider accepts a TTL between 120 and 2,147,483,647 seconds, or 1
// for "automatic". Anything else is replaced by the default before use.
// The substitution is a policy decision and is logged, never an error.

use tracing::warn;

/// Sentinel TTL meaning "let the provider choose"
pub const AUTOMATIC_TTL: i64 = 1;

/// Smallest explicit TTL the provider accepts
pub const MIN_TTL: i64 = 120;

/// Largest TTL the provider accepts
pub const MAX_TTL: i64 = 2_147_483_647;

/// TTL substituted for out-of-range requests
pub const DEFAULT_TTL: i64 = 120;

/// Normalize a requested TTL into the accepted range
///
/// # Examples
///
/// ```
/// use dnssync_core::policy::normalize_ttl;
///
/// assert_eq!(normalize_ttl(0), 120);
/// assert_eq!(normalize_ttl(1), 1);
/// assert_eq!(normalize_ttl(300), 300);
/// ```
pub fn normalize_ttl(requested: i64) -> i64 {
    if requested == AUTOMATIC_TTL || (MIN_TTL..=MAX_TTL).contains(&requested) {
        return requested;
    }

    warn!(
        "TTL must be between {} and {} seconds, or {} for automatic; requested {} replaced by default {}",
        MIN_TTL, MAX_TTL, AUTOMATIC_TTL, requested, DEFAULT_TTL
    );
    DEFAULT_TTL
}
