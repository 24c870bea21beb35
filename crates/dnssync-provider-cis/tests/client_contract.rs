//! Contract tests for the CIS zone client
//!
//! A local mock server stands in for both the IAM token endpoint and the
//! DNS records API. Retry intervals are zero so retry paths run instantly.

use dnssync_core::config::RetryConfig;
use dnssync_core::record::{RecordFilter, RecordSpec};
use dnssync_core::traits::ZoneClient;
use dnssync_core::Error;
use dnssync_provider_cis::{CisZoneClient, IamAuthenticator};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RECORDS_PATH: &str = "/v1/crn:v1:test/zones/zone-1/dns_records";

async fn mount_iam(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/identity/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn client_for(server: &MockServer, base: &str, max_retries: usize) -> CisZoneClient {
    let http = reqwest::Client::new();
    let auth = Arc::new(
        IamAuthenticator::new("key", format!("{}/identity/token", server.uri()), http.clone())
            .unwrap(),
    );
    CisZoneClient::new(
        http,
        auth,
        base,
        "crn:v1:test",
        "zone-1",
        RetryConfig {
            max_retries,
            retry_interval_secs: 0,
        },
    )
    .unwrap()
}

fn record(i: usize) -> Value {
    json!({
        "id": format!("rec-{}", i),
        "name": "www.example.com",
        "type": "A",
        "content": format!("10.0.0.{}", i % 250),
        "ttl": 120
    })
}

fn page(range: std::ops::Range<usize>, total_count: Option<usize>) -> Value {
    let result: Vec<Value> = range.map(record).collect();
    let mut info = json!({ "count": result.len() });
    if let Some(total) = total_count {
        info["total_count"] = json!(total);
    }
    json!({ "success": true, "errors": [], "messages": [], "result": result, "result_info": info })
}

fn all() -> RecordFilter {
    RecordFilter::new("", "", "")
}

#[tokio::test]
async fn test_server_errors_retried_fixed_count() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 2);
    let err = client.list_records(&all()).await.unwrap_err();

    assert!(matches!(err, Error::Provider { .. }));
}

#[tokio::test]
async fn test_rate_limit_retried_then_reported() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 1);
    let err = client.list_records(&all()).await.unwrap_err();

    assert!(matches!(err, Error::RateLimited(_)));
}

#[tokio::test]
async fn test_network_errors_reported_after_retries() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;

    // Nothing listens on the discard port
    let client = client_for(&server, "http://127.0.0.1:9/", 1);
    let err = client.list_records(&all()).await.unwrap_err();

    assert!(matches!(err, Error::Http(_)));
}

#[tokio::test]
async fn test_list_collects_pages_without_total_count() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..100, None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(100..105, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 0);
    let entries = client.list_records(&all()).await.unwrap();

    assert_eq!(entries.len(), 105);
    assert_eq!(entries[104].id.as_deref(), Some("rec-104"));
}

#[tokio::test]
async fn test_list_stops_at_total_count() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..100, Some(100))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..0, Some(100))))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 0);
    let entries = client.list_records(&all()).await.unwrap();

    assert_eq!(entries.len(), 100);
}

#[tokio::test]
async fn test_list_sends_exact_filter() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .and(query_param("name", "www.example.com"))
        .and(query_param("type", "A"))
        .and(query_param("content", "10.0.0.1"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(1..2, Some(1))))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 0);
    let entries = client
        .list_records(&RecordFilter::new("www.example.com", "A", "10.0.0.1"))
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].content, "10.0.0.1");
}

#[tokio::test]
async fn test_not_found_on_list_and_delete() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"/dns_records/rec-9$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "errors": [{"code": 1002, "message": "Record not found"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 3);

    assert!(client.list_records(&all()).await.unwrap_err().is_not_found());
    assert!(client.delete_record("rec-9").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_create_posts_record_body() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .and(body_json(json!({
            "name": "www.example.com",
            "type": "A",
            "content": "10.0.0.1",
            "ttl": 120
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": record(1)
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 0);
    let spec = RecordSpec {
        name: "www.example.com".to_string(),
        record_type: "A".to_string(),
        content: "10.0.0.1".to_string(),
        ttl: 120,
    };
    let entry = client.create_record(&spec).await.unwrap();

    assert_eq!(entry.id.as_deref(), Some("rec-1"));
}

#[tokio::test]
async fn test_success_without_result_is_malformed() {
    let server = MockServer::start().await;
    mount_iam(&server, 1).await;
    Mock::given(method("POST"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"/dns_records/rec-1$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": null
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 0);
    let spec = RecordSpec {
        name: "www.example.com".to_string(),
        record_type: "A".to_string(),
        content: "10.0.0.1".to_string(),
        ttl: 120,
    };

    let err = client.create_record(&spec).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResult(_)));

    let err = client.update_record("rec-1", &spec).await.unwrap_err();
    assert!(matches!(err, Error::MalformedResult(_)));
}

#[tokio::test]
async fn test_rejected_token_is_refreshed() {
    let server = MockServer::start().await;
    mount_iam(&server, 2).await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(401))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(RECORDS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0..1, Some(1))))
        .mount(&server)
        .await;

    let client = client_for(&server, &server.uri(), 0);

    let err = client.list_records(&all()).await.unwrap_err();
    assert!(matches!(err, Error::Authentication(_)));

    let entries = client.list_records(&all()).await.unwrap();
    assert_eq!(entries.len(), 1);
}
