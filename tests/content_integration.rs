//! Content Integration Tests
//!
//! End-to-end tests from the content client down to a mock backend: paging,
//! aggregation over several resources, error propagation and cancellation.

use app_core::filters::filter_by;
use app_core::{ContentClient, EducationContent};
use orbita_client::{CancellationToken, ClientConfig, ErrorKind, FetchError, RecordingTelemetry};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn education_entry(id: usize, planet: &str) -> Value {
    json!({
        "id": format!("edu-{}", id),
        "planet_code": planet,
        "type": if id % 2 == 0 { "guide" } else { "interactive" },
        "title": format!("Entry {}", id),
        "difficulty": "beginner",
        "duration_minutes": 10,
        "topics": [],
        "description": ""
    })
}

fn education_page(entries: Vec<Value>, next_cursor: u64, has_more: bool) -> Value {
    json!({
        "status": 200,
        "data": {"data": {"data": entries, "nextCursor": next_cursor, "hasMore": has_more}},
        "errors": null,
        "timestamp": "2024-05-01T12:00:00Z"
    })
}

/// Serve `total` education entries in pages of `limit`, cursors being offsets
async fn serve_education(server: &MockServer, total: usize, limit: usize) {
    let mut offset = 0;
    loop {
        let end = (offset + limit).min(total);
        let entries = (offset..end).map(|i| education_entry(i, "499")).collect();
        let has_more = end < total;

        Mock::given(method("GET"))
            .and(path("/education-content"))
            .and(query_param("cursor", offset.to_string()))
            .and(query_param("limit", limit.to_string()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(education_page(
                    entries,
                    end as u64,
                    has_more,
                )),
            )
            .expect(1)
            .mount(server)
            .await;

        if !has_more {
            break;
        }
        offset = end;
    }
}

fn client_for(server: &MockServer) -> ContentClient {
    ContentClient::new(ClientConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Aggregation
// =============================================================================

#[tokio::test]
async fn test_aggregation_sizes_against_backend() {
    for (total, limit) in [(0, 5), (5, 5), (6, 5), (12, 5), (1, 10)] {
        let mock_server = MockServer::start().await;
        serve_education(&mock_server, total, limit).await;

        let entries = client_for(&mock_server)
            .education()
            .all(limit as u32)
            .await
            .unwrap();

        let ids: Vec<String> = entries.iter().map(|e| e.id.clone()).collect();
        let expected: Vec<String> = (0..total).map(|i| format!("edu-{}", i)).collect();
        assert_eq!(ids, expected, "total={} limit={}", total, limit);

        let requests = mock_server.received_requests().await.unwrap();
        let expected_requests = std::cmp::max(1, total.div_ceil(limit));
        assert_eq!(requests.len(), expected_requests, "total={} limit={}", total, limit);
    }
}

#[tokio::test]
async fn test_stalled_backend_stops_after_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(education_page(
            vec![education_entry(0, "199"), education_entry(1, "199")],
            2,
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Claims more, hands back the same cursor
    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(education_page(
            vec![education_entry(2, "199")],
            2,
            true,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let telemetry = Arc::new(RecordingTelemetry::new());
    let entries = client_for(&mock_server)
        .with_telemetry(telemetry.clone())
        .education()
        .all(2)
        .await
        .unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(telemetry.events_named("pagination_stalled").len(), 1);
}

#[tokio::test]
async fn test_failure_on_second_page_discards_partial_results() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(education_page(
            vec![education_entry(0, "299")],
            1,
            true,
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", "1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database down"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .and(query_param("cursor", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(education_page(vec![], 2, false)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .education()
        .by_planet("299", 1)
        .await
        .unwrap_err();

    assert_eq!(
        err,
        FetchError::Http {
            status: 500,
            body: "database down".to_string()
        }
    );
}

#[tokio::test]
async fn test_cancel_during_slow_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/space_missions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "status": 200,
                    "data": {"data": [], "nextCursor": 0, "hasMore": false},
                    "errors": null,
                    "timestamp": "2024-05-01T12:00:00Z"
                }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let client = client_for(&mock_server);
    let started = std::time::Instant::now();
    let err = client.missions().all_with_cancel(6, token).await.unwrap_err();

    assert_eq!(err, FetchError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(5));
}

// =============================================================================
// Errors
// =============================================================================

#[tokio::test]
async fn test_not_found_before_shape_validation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/education-content"))
        .respond_with(ResponseTemplate::new(404).set_body_json(education_page(vec![], 0, false)))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server).education().page(0, 10).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Http);
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let client = ContentClient::new(ClientConfig::new("http://127.0.0.1:9/api/v1")).unwrap();

    let err = client.planets().all().await.unwrap_err();
    assert!(err.is_network_error());
}

#[tokio::test]
async fn test_config_timeout_applies_to_services() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/planets"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": 200, "data": {"data": []}}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(mock_server.uri()).with_timeout(Duration::from_millis(100));
    let err = ContentClient::new(config).unwrap().planets().all().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_network_error());
}

// =============================================================================
// Filters over aggregated data
// =============================================================================

#[tokio::test]
async fn test_filter_non_matching_is_empty() {
    let mock_server = MockServer::start().await;
    serve_education(&mock_server, 5, 5).await;

    let entries = client_for(&mock_server).education().all(5).await.unwrap();
    assert_eq!(entries.len(), 5);

    let none: Vec<EducationContent> = filter_by(&entries, |e| e.planet_code.as_str(), "999");
    assert!(none.is_empty());
}
