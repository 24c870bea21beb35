//! CIS zone client
//!
//! One [`CisZoneClient`] per zone. Clients built by the same factory share
//! the HTTP connection pool and the IAM token cache.

use crate::api::{is_retryable, status_error, DnsRecordResource, Envelope, PROVIDER};
use crate::auth::IamAuthenticator;
use async_trait::async_trait;
use dnssync_core::config::RetryConfig;
use dnssync_core::record::{RecordFilter, RecordSpec, RemoteRecordEntry};
use dnssync_core::traits::ZoneClient;
use dnssync_core::{Error, Result};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, warn};

/// Page size for list requests
const LIST_PAGE_SIZE: u32 = 100;

/// DNS records client bound to one CIS zone
pub struct CisZoneClient {
    http: reqwest::Client,
    auth: Arc<IamAuthenticator>,
    base: Url,
    crn: String,
    zone_id: String,
    retry: RetryConfig,
}

impl std::fmt::Debug for CisZoneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CisZoneClient")
            .field("base", &self.base.as_str())
            .field("crn", &self.crn)
            .field("zone_id", &self.zone_id)
            .field("retry", &self.retry)
            .finish()
    }
}

impl CisZoneClient {
    /// Create a client for one zone
    ///
    /// # Parameters
    ///
    /// - `http`: Shared HTTP client (timeouts and user agent already set)
    /// - `auth`: Shared IAM authenticator
    /// - `base_url`: CIS API base URL
    /// - `crn`: CRN of the CIS instance
    /// - `zone_id`: Zone identifier
    /// - `retry`: Retry settings for every request
    pub fn new(
        http: reqwest::Client,
        auth: Arc<IamAuthenticator>,
        base_url: &str,
        crn: impl Into<String>,
        zone_id: impl Into<String>,
        retry: RetryConfig,
    ) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| Error::config(format!("Invalid CIS endpoint URL {}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::config(format!("Invalid CIS endpoint URL: {}", base_url)));
        }

        Ok(Self {
            http,
            auth,
            base,
            crn: crn.into(),
            zone_id: zone_id.into(),
            retry,
        })
    }

    /// `{base}/v1/{crn}/zones/{zone}/dns_records[/{id}]`
    fn records_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["v1", self.crn.as_str(), "zones", self.zone_id.as_str(), "dns_records"]);
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    /// Send a request, retrying network errors, 429 and 5xx a fixed number of times
    ///
    /// `build` is called once per attempt since request builders are
    /// consumed by `send`.
    async fn send(
        &self,
        context: &str,
        build: impl Fn() -> reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            let token = self.auth.token().await?;
            let result = build()
                .bearer_auth(token)
                .header("Accept", "application/json")
                .send()
                .await;

            if let Ok(response) = &result
                && matches!(response.status().as_u16(), 401 | 403)
            {
                self.auth.invalidate().await;
            }

            let retries_left = attempt < self.retry.max_retries;
            match result {
                Ok(response) if retries_left && is_retryable(response.status()) => {
                    warn!(
                        "{} attempt {} for zone {} returned {}, retrying in {:?}",
                        context,
                        attempt + 1,
                        self.zone_id,
                        response.status(),
                        self.retry.interval()
                    );
                }
                Ok(response) => return Ok(response),
                Err(e) if retries_left => {
                    warn!(
                        "{} attempt {} for zone {} failed: {}, retrying in {:?}",
                        context,
                        attempt + 1,
                        self.zone_id,
                        e,
                        self.retry.interval()
                    );
                }
                Err(e) => {
                    return Err(Error::http(format!("{}: HTTP request failed: {}", context, e)));
                }
            }

            attempt += 1;
            tokio::time::sleep(self.retry.interval()).await;
        }
    }

    /// Read a response body as an envelope, mapping failure statuses
    async fn read<T: DeserializeOwned>(
        response: reqwest::Response,
        context: &str,
    ) -> Result<Envelope<T>> {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        if !status.is_success() {
            return Err(status_error(status, &body, context));
        }
        if body.trim().is_empty() {
            return Err(Error::malformed(format!("{}: invalid result", context)));
        }

        serde_json::from_str(&body).map_err(|e| {
            Error::provider(PROVIDER, format!("{}: Failed to parse response: {}", context, e))
        })
    }

    async fn list_page(
        &self,
        filter: &RecordFilter,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<RemoteRecordEntry>, Option<u32>)> {
        let url = self.records_url(None);
        let mut query: Vec<(&str, String)> = vec![
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if !filter.record_type.is_empty() {
            query.push(("type", filter.record_type.clone()));
        }
        if !filter.name.is_empty() {
            query.push(("name", filter.name.clone()));
        }
        if !filter.content.is_empty() {
            query.push(("content", filter.content.clone()));
        }

        let response = self
            .send("list dns records", || self.http.get(url.clone()).query(&query))
            .await?;
        let envelope: Envelope<Vec<DnsRecordResource>> =
            Self::read(response, "list dns records").await?;
        let (records, info) = envelope.into_result("list dns records")?;

        let total = info.and_then(|i| i.total_count);
        Ok((records.into_iter().map(Into::into).collect(), total))
    }

    async fn write(
        &self,
        method: Method,
        id: Option<&str>,
        spec: &RecordSpec,
        context: &str,
    ) -> Result<RemoteRecordEntry> {
        let url = self.records_url(id);
        let response = self
            .send(context, || self.http.request(method.clone(), url.clone()).json(spec))
            .await?;
        let envelope: Envelope<DnsRecordResource> = Self::read(response, context).await?;
        let (record, _) = envelope.into_result(context)?;
        Ok(record.into())
    }
}

#[async_trait]
impl ZoneClient for CisZoneClient {
    async fn list_records(&self, filter: &RecordFilter) -> Result<Vec<RemoteRecordEntry>> {
        let mut entries = Vec::new();
        let mut page = 1;
        loop {
            let (batch, total) = self.list_page(filter, page, LIST_PAGE_SIZE).await?;
            let batch_len = batch.len();
            entries.extend(batch);

            let reached_total = total.is_some_and(|t| entries.len() >= t as usize);
            if batch_len < LIST_PAGE_SIZE as usize || reached_total {
                break;
            }
            page += 1;
        }

        debug!(
            "Listed {} dns record(s) in zone {} (name: {}, type: {}, content: {})",
            entries.len(),
            self.zone_id,
            filter.name,
            filter.record_type,
            filter.content
        );
        Ok(entries)
    }

    async fn create_record(&self, spec: &RecordSpec) -> Result<RemoteRecordEntry> {
        self.write(Method::POST, None, spec, "create dns record").await
    }

    async fn update_record(&self, id: &str, spec: &RecordSpec) -> Result<RemoteRecordEntry> {
        self.write(Method::PUT, Some(id), spec, "update dns record").await
    }

    async fn delete_record(&self, id: &str) -> Result<()> {
        let url = self.records_url(Some(id));
        let response = self
            .send("delete dns record", || self.http.delete(url.clone()))
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body, "delete dns record"));
        }
        Ok(())
    }

    /// Lists a single entry to confirm the zone and credentials work
    async fn probe(&self) -> Result<()> {
        self.list_page(&RecordFilter::new("", "", ""), 1, 1).await.map(|_| ())
    }

    fn zone_id(&self) -> &str {
        &self.zone_id
    }
}
