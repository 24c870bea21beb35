// # IBM Cloud Internet Services DNS Provider
//
// This crate implements the dnssync `ZoneClient` port against the CIS
// "DNS records v1" API.
//
// - ✅ One client per zone, all sharing one HTTP pool and IAM token cache
// - ✅ List with exact name/type/content filters, collecting every page
// - ✅ Create (POST), update (PUT) and delete (DELETE) by record id
// - ✅ 404 reported as `Error::NotFound`; missing results as `Error::MalformedResult`
// - ✅ Fixed-count retries with a fixed interval for network errors, 429 and 5xx
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Endpoint override via the `cis` service endpoint
// - ❌ NO convergence decisions (owned by `SyncEngine`)
// - ❌ NO caching of records between calls
//
// ## Security Requirements
//
// - API key and IAM token NEVER appear in logs or Debug output
// - Construction fails fast if the API key is empty
//
// ## API Reference
//
// - List:   GET    `/v1/:crn/zones/:zone_id/dns_records?type=&name=&content=&page=&per_page=`
// - Create: POST   `/v1/:crn/zones/:zone_id/dns_records`
// - Update: PUT    `/v1/:crn/zones/:zone_id/dns_records/:record_id`
// - Delete: DELETE `/v1/:crn/zones/:zone_id/dns_records/:record_id`
// - IAM:    POST   `https://iam.cloud.ibm.com/identity/token`

mod api;
pub mod auth;
pub mod client;

pub use auth::IamAuthenticator;
pub use client::CisZoneClient;

use dnssync_core::config::ProviderConfig;
use dnssync_core::traits::{ZoneClient, ZoneClientFactory};
use dnssync_core::{Error, Result, ZoneClientRegistry};
use std::sync::Arc;
use std::time::Duration;

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Factory for CIS zone clients
///
/// Built once from the shared configuration; every client it creates
/// reuses the same HTTP client and IAM authenticator.
#[derive(Debug)]
pub struct CisFactory {
    http: reqwest::Client,
    auth: Arc<IamAuthenticator>,
}

impl CisFactory {
    /// Create a factory from the shared provider configuration
    ///
    /// # Errors
    ///
    /// Fails if the API key is empty or the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        let auth = Arc::new(IamAuthenticator::new(
            config.api_key.clone(),
            config.iam_url.clone(),
            http.clone(),
        )?);

        Ok(Self { http, auth })
    }
}

impl ZoneClientFactory for CisFactory {
    fn create(&self, zone_id: &str, config: &ProviderConfig) -> Result<Box<dyn ZoneClient>> {
        if config.crn.is_empty() {
            return Err(Error::config("CIS instance CRN is required"));
        }

        let client = CisZoneClient::new(
            self.http.clone(),
            self.auth.clone(),
            config.endpoint_url(),
            config.crn.clone(),
            zone_id,
            config.retry.clone(),
        )?;

        Ok(Box::new(client))
    }
}

/// Build a zone client registry with one CIS client per configured zone
///
/// # Example
///
/// ```rust,no_run
/// use dnssync_core::{ProviderConfig, SyncEngine};
/// use std::sync::Arc;
///
/// # async fn run() -> dnssync_core::Result<()> {
/// let config = ProviderConfig::new("api-key", "crn:v1:...", ["zone-id"]);
/// let registry = dnssync_provider_cis::build_registry(&config)?;
/// registry.verify().await?;
///
/// let engine = SyncEngine::new(Arc::new(registry));
/// # Ok(())
/// # }
/// ```
pub fn build_registry(config: &ProviderConfig) -> Result<ZoneClientRegistry> {
    let factory = CisFactory::new(config)?;
    ZoneClientRegistry::build(config, &factory)
}
