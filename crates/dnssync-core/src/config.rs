//! Configuration types for the DNS sync system
//!
//! Everything here is resolved once when the zone client registry is
//! built; nothing is consulted per call.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the service endpoint that overrides the CIS API base URL
pub const CIS_CUSTOM_ENDPOINT_NAME: &str = "cis";

/// CIS API base URL used when no override is configured
pub const DEFAULT_CIS_URL: &str = "https://api.cis.cloud.ibm.com/";

/// IAM token endpoint used when no override is configured
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com/identity/token";

/// Shared provider configuration
///
/// One set of credentials covers every zone; a client is built per zone.
///
/// The Debug implementation does NOT expose the API key.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// IAM API key
    /// ⚠️ NEVER log this value
    pub api_key: String,

    /// CRN of the CIS instance hosting the zones
    pub crn: String,

    /// User agent sent with every API request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Zone identifiers to build clients for
    pub zones: Vec<String>,

    /// Custom API endpoints overriding the defaults
    #[serde(default)]
    pub service_endpoints: Vec<ServiceEndpoint>,

    /// IAM token endpoint
    #[serde(default = "default_iam_url")]
    pub iam_url: String,

    /// Client-side retry settings
    #[serde(default)]
    pub retry: RetryConfig,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<REDACTED>")
            .field("crn", &self.crn)
            .field("user_agent", &self.user_agent)
            .field("zones", &self.zones)
            .field("service_endpoints", &self.service_endpoints)
            .field("iam_url", &self.iam_url)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ProviderConfig {
    /// Create a configuration with default endpoints and retry settings
    pub fn new(
        api_key: impl Into<String>,
        crn: impl Into<String>,
        zones: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            crn: crn.into(),
            user_agent: default_user_agent(),
            zones: zones.into_iter().map(Into::into).collect(),
            service_endpoints: Vec::new(),
            iam_url: default_iam_url(),
            retry: RetryConfig::default(),
        }
    }

    /// Add a custom service endpoint
    pub fn with_service_endpoint(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.service_endpoints.push(ServiceEndpoint {
            name: name.into(),
            url: url.into(),
        });
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry settings
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zones.is_empty() {
            return Err(crate::Error::config("missing zone data"));
        }
        if self.zones.iter().any(|z| z.is_empty()) {
            return Err(crate::Error::config("zone identifiers cannot be empty"));
        }
        if self.api_key.is_empty() {
            return Err(crate::Error::config("API key cannot be empty"));
        }
        if self.crn.is_empty() {
            return Err(crate::Error::config("CIS instance CRN cannot be empty"));
        }
        for endpoint in &self.service_endpoints {
            if !endpoint.url.starts_with("https://") && !endpoint.url.starts_with("http://") {
                return Err(crate::Error::config(format!(
                    "service endpoint '{}' must use an HTTP or HTTPS URL, got: {}",
                    endpoint.name, endpoint.url
                )));
            }
        }
        self.retry.validate()?;

        Ok(())
    }

    /// The CIS base URL: the `cis` service endpoint if present, else the default
    pub fn endpoint_url(&self) -> &str {
        self.service_endpoints
            .iter()
            .find(|ep| ep.name == CIS_CUSTOM_ENDPOINT_NAME)
            .map(|ep| ep.url.as_str())
            .unwrap_or(DEFAULT_CIS_URL)
    }
}

/// A custom URL overriding the default for a named service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Service name (e.g. "cis")
    pub name: String,
    /// Fully qualified URL, scheme included
    pub url: String,
}

/// Fixed-count, fixed-interval retry settings for the remote client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Delay between attempts (in seconds)
    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,
}

impl RetryConfig {
    /// Validate the retry settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_retries > 10 {
            return Err(crate::Error::config(format!(
                "max_retries must be at most 10, got: {}",
                self.max_retries
            )));
        }
        if self.retry_interval_secs > 300 {
            return Err(crate::Error::config(format!(
                "retry_interval_secs must be at most 300, got: {}",
                self.retry_interval_secs
            )));
        }
        Ok(())
    }

    /// Delay between attempts
    pub fn interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.retry_interval_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_interval_secs: default_retry_interval_secs(),
        }
    }
}

fn default_user_agent() -> String {
    format!("dnssync/{}", env!("CARGO_PKG_VERSION"))
}

fn default_iam_url() -> String {
    DEFAULT_IAM_URL.to_string()
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_interval_secs() -> u64 {
    5
}
