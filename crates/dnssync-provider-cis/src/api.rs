//! Wire types and status mapping for the CIS DNS records API v1
//!
//! Every response uses the same envelope:
//!
//! ```json
//! {
//!   "success": true,
//!   "errors": [],
//!   "messages": [],
//!   "result": { ... } | [ ... ],
//!   "result_info": { "page": 1, "per_page": 100, "count": 2, "total_count": 2 }
//! }
//! ```

use dnssync_core::{Error, RemoteRecordEntry};
use reqwest::StatusCode;
use serde::Deserialize;

/// Provider name used in error messages
pub(crate) const PROVIDER: &str = "cis";

/// Response envelope shared by every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    pub result: Option<T>,
    pub result_info: Option<ResultInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Pagination details of a list response
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct ResultInfo {
    /// Absent on some responses; paging then runs until a short page
    pub total_count: Option<u32>,
}

/// A DNS record as returned by the API
///
/// All fields are optional on the wire; a record without an id is kept so
/// the engine can report it as malformed.
#[derive(Debug, Deserialize)]
pub(crate) struct DnsRecordResource {
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub record_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ttl: i64,
}

impl From<DnsRecordResource> for RemoteRecordEntry {
    fn from(r: DnsRecordResource) -> Self {
        RemoteRecordEntry {
            id: r.id,
            name: r.name,
            record_type: r.record_type,
            content: r.content,
            ttl: r.ttl,
        }
    }
}

/// IAM token exchange response
#[derive(Debug, Deserialize)]
pub(crate) struct IamToken {
    pub access_token: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

impl<T> Envelope<T> {
    /// Unwrap the result, treating a missing one as malformed
    pub fn into_result(self, context: &str) -> Result<(T, Option<ResultInfo>), Error> {
        if !self.success && !self.errors.is_empty() {
            return Err(Error::provider(PROVIDER, format!("{}: {}", context, join_messages(&self.errors))));
        }
        match self.result {
            Some(result) => Ok((result, self.result_info)),
            None => Err(Error::malformed(format!("{}: invalid result", context))),
        }
    }
}

fn join_messages(messages: &[ApiMessage]) -> String {
    messages
        .iter()
        .map(|m| format!("{} (code {})", m.message, m.code))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Extract a readable message from an error body, falling back to the raw text
fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Envelope<serde_json::Value>>(body) {
        Ok(envelope) if !envelope.errors.is_empty() => join_messages(&envelope.errors),
        _ if body.is_empty() => "no response body".to_string(),
        _ => body.to_string(),
    }
}

/// Map a non-success HTTP status to an error
///
/// 404 becomes [`Error::NotFound`], which the engine treats as benign on
/// list and delete.
pub(crate) fn status_error(status: StatusCode, body: &str, context: &str) -> Error {
    let detail = error_detail(body);
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{}: invalid API key or insufficient permissions. Status: {} - {}",
            context, status, detail
        )),
        404 => Error::not_found(format!("{}: {}", context, detail)),
        409 => Error::provider(PROVIDER, format!(
            "{}: conflict with the current state of the record. Status: {} - {}",
            context, status, detail
        )),
        429 => Error::rate_limited(format!("{}: Status: {} - {}", context, status, detail)),
        500..=599 => Error::provider(PROVIDER, format!(
            "{}: CIS server error (transient): {} - {}",
            context, status, detail
        )),
        _ => Error::provider(PROVIDER, format!("{}: {} - {}", context, status, detail)),
    }
}

/// Whether a status is worth retrying
pub(crate) fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
