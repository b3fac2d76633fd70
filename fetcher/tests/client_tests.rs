//! Tests for the HTTP fetcher against a local mock server.

use fetcher::client::HttpFetcher;
use fetcher::config::FetcherConfig;
use fetcher::errors::FetchError;
use fetcher::traits::Fetcher;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

#[tokio::test]
async fn fetch_success_returns_bytes_and_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/image.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(PNG_HEADER),
        )
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new();
    let url = format!("{}/image.png", mock_server.uri());
    let fetched = fetcher.fetch(&url).await.unwrap();

    assert_eq!(fetched.bytes, PNG_HEADER);
    assert_eq!(
        fetched.content_type.as_ref().and_then(|v| v.to_str().ok()),
        Some("image/png")
    );
}

#[tokio::test]
async fn fetch_without_content_type_yields_none() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_HEADER))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new();
    let url = format!("{}/raw", mock_server.uri());
    let fetched = fetcher.fetch(&url).await.unwrap();

    assert!(fetched.content_type.is_none());
}

#[tokio::test]
async fn fetch_404_returns_unexpected_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::new();
    let url = format!("{}/missing.png", mock_server.uri());
    let result = fetcher.fetch(&url).await;

    match result {
        Err(FetchError::UnexpectedStatus { status }) => {
            assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
        }
        other => panic!("Expected FetchError::UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_rejects_body_over_limit() {
    let mock_server = MockServer::start().await;

    let payload = vec![0u8; 64];

    Mock::given(method("GET"))
        .and(path("/huge.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig::builder().set_max_response_bytes(16).build();
    let fetcher = HttpFetcher::with_config(config);
    let url = format!("{}/huge.png", mock_server.uri());
    let result = fetcher.fetch(&url).await;

    match result {
        Err(FetchError::ResponseTooLarge { limit }) => assert_eq!(limit, 16),
        other => panic!("Expected FetchError::ResponseTooLarge, got: {other:?}"),
    }
}

#[tokio::test]
async fn zero_response_limit_means_unbounded() {
    let mock_server = MockServer::start().await;

    let payload = vec![0u8; 64];

    Mock::given(method("GET"))
        .and(path("/any-size.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .mount(&mock_server)
        .await;

    let config = FetcherConfig::builder().set_max_response_bytes(0).build();
    let fetcher = HttpFetcher::with_config(config);
    let url = format!("{}/any-size.png", mock_server.uri());
    let fetched = fetcher.fetch(&url).await.unwrap();

    assert_eq!(fetched.bytes, payload);
}

#[tokio::test]
async fn fetch_retries_transient_server_errors() {
    let mock_server = MockServer::start().await;

    // First attempt hits the one-shot 500, the retry falls through to 200.
    Mock::given(method("GET"))
        .and(path("/flaky.png"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/flaky.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(PNG_HEADER),
        )
        .mount(&mock_server)
        .await;

    let config = FetcherConfig::builder().set_max_retries(2).build();
    let fetcher = HttpFetcher::with_config(config);
    let url = format!("{}/flaky.png", mock_server.uri());
    let fetched = fetcher.fetch(&url).await.unwrap();

    assert_eq!(fetched.bytes, PNG_HEADER);
}

#[tokio::test]
async fn fetch_sends_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agent.png"))
        .and(header("user-agent", "test-agent/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(PNG_HEADER))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = FetcherConfig::builder()
        .set_user_agent("test-agent/1.0")
        .build();
    let fetcher = HttpFetcher::with_config(config);
    let url = format!("{}/agent.png", mock_server.uri());
    let fetched = fetcher.fetch(&url).await.unwrap();

    assert_eq!(fetched.bytes, PNG_HEADER);
}
