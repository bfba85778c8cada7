//! Integration tests for the fetch wrapper, pager and aggregator
//!
//! These tests use wiremock to stand in for the content backend and exercise
//! the full request/response cycle and error classification.

use orbita_client::{
    fetch_all, Aggregator, CancellationToken, ClientConfig, CursorPager, EnvelopeLayout,
    ErrorKind, FetchError, FetchRequest, HttpFetcher, HttpPager, Page, RecordingTelemetry,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize, PartialEq, Clone)]
struct Item {
    id: String,
}

fn item(id: &str) -> Item {
    Item { id: id.to_string() }
}

fn envelope(ids: &[&str], next_cursor: u64, has_more: bool) -> Value {
    let items: Vec<Value> = ids.iter().map(|id| json!({ "id": id })).collect();
    json!({
        "status": 200,
        "data": {"data": {"data": items, "nextCursor": next_cursor, "hasMore": has_more}},
        "errors": null,
        "timestamp": "2024-05-01T12:00:00Z"
    })
}

fn pager_for(server: &MockServer) -> HttpPager<Item> {
    let fetcher = HttpFetcher::new(ClientConfig::new(server.uri())).unwrap();
    HttpPager::new(fetcher, "education-content", EnvelopeLayout::nested(2))
}

async fn mount_page(server: &MockServer, cursor: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", cursor))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// =============================================================================
// Pager Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_page_fixture() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", "0"))
        .and(query_param("limit", "10"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&["a", "b"], 10, true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let pager = pager_for(&mock_server);
    let page = pager.fetch_page(0, 10).await.unwrap();

    assert_eq!(
        page,
        Page {
            items: vec![item("a"), item("b")],
            next_cursor: 10,
            has_more: true,
        }
    );
}

#[tokio::test]
async fn test_fetch_page_http_404() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&mock_server)
        .await;

    let err = pager_for(&mock_server).fetch_page(0, 10).await.unwrap_err();

    assert_eq!(
        err,
        FetchError::Http {
            status: 404,
            body: "not here".to_string()
        }
    );
}

#[tokio::test]
async fn test_http_error_body_not_parsed() {
    let mock_server = MockServer::start().await;

    // A valid envelope in an error response still counts as an HTTP failure
    Mock::given(method("GET"))
        .and(path("/education-content"))
        .respond_with(ResponseTemplate::new(503).set_body_json(envelope(&["a"], 1, false)))
        .mount(&mock_server)
        .await;

    let err = pager_for(&mock_server).fetch_page(0, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn test_fetch_page_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = pager_for(&mock_server).fetch_page(0, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedResponse);
}

#[tokio::test]
async fn test_fetch_page_invalid_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 200,
            "data": {"data": {"data": "not-an-array", "nextCursor": 0, "hasMore": false}}
        })))
        .mount(&mock_server)
        .await;

    let err = pager_for(&mock_server).fetch_page(0, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidShape);
}

#[tokio::test]
async fn test_fetch_page_envelope_status_not_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 500,
            "data": null,
            "errors": "backend exploded"
        })))
        .mount(&mock_server)
        .await;

    let err = pager_for(&mock_server).fetch_page(0, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidShape);
    assert!(err.to_string().contains("backend exploded"));
}

#[tokio::test]
async fn test_network_error() {
    // Nothing listens on port 9 (discard) in the test environment
    let fetcher = HttpFetcher::new(ClientConfig::new("http://127.0.0.1:9/api")).unwrap();
    let pager: HttpPager<Item> = HttpPager::new(fetcher, "education-content", EnvelopeLayout::nested(2));

    let err = pager.fetch_page(0, 10).await.unwrap_err();
    assert!(err.is_network_error());
}

#[tokio::test]
async fn test_per_request_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": 200}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new(ClientConfig::new(mock_server.uri())).unwrap();
    let request = FetchRequest::get("slow").timeout(Duration::from_millis(100));

    let err = fetcher.get_json(&request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_network_error());
}

#[tokio::test]
async fn test_default_timeout_from_config() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": 200}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(mock_server.uri()).with_timeout(Duration::from_millis(100));
    let fetcher = HttpFetcher::new(config).unwrap();

    let err = fetcher.get_json(&FetchRequest::get("slow")).await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)));
}

#[tokio::test]
async fn test_default_headers_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/planets"))
        .and(header("x-client", "orbita-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 200})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(mock_server.uri()).with_header("X-Client", "orbita-tests");
    let fetcher = HttpFetcher::new(config).unwrap();

    let value = fetcher.get_json(&FetchRequest::get("planets")).await.unwrap();
    assert_eq!(value["status"], 200);
}

#[tokio::test]
async fn test_failure_reported_to_telemetry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&mock_server)
        .await;

    let telemetry = Arc::new(RecordingTelemetry::new());
    let fetcher = HttpFetcher::new(ClientConfig::new(mock_server.uri()))
        .unwrap()
        .with_telemetry(telemetry.clone());
    let pager: HttpPager<Item> = HttpPager::new(fetcher, "education-content", EnvelopeLayout::nested(2));

    let _ = pager.fetch_page(0, 5).await;

    let failures = telemetry.events_named("request_failed");
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].field("kind"), Some("Http"));
}

// =============================================================================
// Aggregator Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_all_three_pages() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "0", envelope(&["a", "b"], 2, true)).await;
    mount_page(&mock_server, "2", envelope(&["c", "d"], 4, true)).await;
    mount_page(&mock_server, "4", envelope(&["e"], 5, false)).await;

    let pager = pager_for(&mock_server);
    let items = fetch_all(&pager, 2).await.unwrap();

    let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_fetch_all_page_two_fails() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "0", envelope(&["a", "b"], 2, true)).await;
    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", "2"))
        .respond_with(ResponseTemplate::new(500).set_body_string("page two broke"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "4", envelope(&["e"], 5, false)).await;

    let pager = pager_for(&mock_server);
    let err = fetch_all(&pager, 2).await.unwrap_err();

    assert_eq!(
        err,
        FetchError::Http {
            status: 500,
            body: "page two broke".to_string()
        }
    );
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_fetch_all_stalled_cursor() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "0", envelope(&["a", "b"], 2, true)).await;
    mount_page(&mock_server, "2", envelope(&["c"], 2, true)).await;

    let pager = pager_for(&mock_server);
    let items = fetch_all(&pager, 2).await.unwrap();

    assert_eq!(items.len(), 3);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_fetch_all_cancel_in_flight() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "0", envelope(&["a", "b"], 2, true)).await;
    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(envelope(&["c"], 3, false))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let pager = pager_for(&mock_server);
    let token = CancellationToken::new();
    let canceller = token.clone();

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        canceller.cancel();
    });

    let err = Aggregator::new(&pager)
        .with_cancellation(token)
        .fetch_all(2)
        .await
        .unwrap_err();

    assert_eq!(err, FetchError::Cancelled);
}
