//! Error types for the DNS sync system
//!
//! This module defines all error types used throughout the crate, plus the
//! [`AggregateError`] collector used by the validator and both reconcilers.

use std::fmt;
use thiserror::Error;

/// Result type alias for DNS sync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Remote operation a per-target failure is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Listing entries for a target
    List,
    /// Creating a missing entry
    Create,
    /// Updating an existing entry
    Update,
    /// Deleting a matching entry
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Core error type for the DNS sync system
#[derive(Error, Debug)]
pub enum Error {
    /// A single violated input rule
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input validation failed; holds one cause per violated rule
    #[error("invalid dns input data: {0}")]
    Validation(AggregateError),

    /// Zone id has no client in the registry
    #[error("unknown zone: {0}")]
    UnknownZone(String),

    /// Provider reported the queried or targeted entry does not exist
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Provider returned success without a usable result
    #[error("Malformed result: {0}")]
    MalformedResult(String),

    /// A list/create/update/delete call failed for one target
    #[error("failed to {operation} the dns record for target {target}: {source}")]
    Target {
        /// The remote operation that failed
        operation: Operation,
        /// The target content value being reconciled
        target: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// A zone failed its startup check
    #[error("failed to get dns records for zone {zone}: {source}")]
    Zone {
        /// The zone id that was checked
        zone: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// One or more per-target failures collected during a reconcile loop
    #[error("{0}")]
    Aggregate(AggregateError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an unknown zone error
    pub fn unknown_zone(zone_id: impl Into<String>) -> Self {
        Self::UnknownZone(zone_id.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a malformed result error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResult(msg.into())
    }

    /// Attribute a failure to one target and operation
    pub fn target(operation: Operation, target: impl Into<String>, source: Error) -> Self {
        Self::Target {
            operation,
            target: target.into(),
            source: Box::new(source),
        }
    }

    /// Attribute a failure to one zone
    pub fn zone(zone: impl Into<String>, source: Error) -> Self {
        Self::Zone {
            zone: zone.into(),
            source: Box::new(source),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the provider reported a 404-class "not found" status
    ///
    /// Only a direct [`Error::NotFound`] counts; a not-found wrapped in a
    /// target attribution has already been surfaced as a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Whether this error came from input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::InvalidInput(_))
    }
}

/// An ordered collection of zero or more failures
///
/// Loops that must visit every target push failures here instead of
/// returning early. An empty aggregate means success.
#[derive(Debug, Default)]
pub struct AggregateError {
    errors: Vec<Error>,
}

impl AggregateError {
    /// Create an empty aggregate
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one failure
    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    /// Number of collected failures
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// True when nothing failed
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The collected failures, in the order they occurred
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Iterate over the collected failures
    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.errors.iter()
    }

    /// Consume the aggregate, returning its failures
    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    /// `Ok(())` if empty, otherwise the aggregate itself
    pub fn into_result(self) -> std::result::Result<(), AggregateError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => Ok(()),
            [only] => write!(f, "{}", only),
            many => {
                f.write_str("[")?;
                for (i, err) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl std::error::Error for AggregateError {}

impl FromIterator<Error> for AggregateError {
    fn from_iter<I: IntoIterator<Item = Error>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for AggregateError {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a AggregateError {
    type Item = &'a Error;
    type IntoIter = std::slice::Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
