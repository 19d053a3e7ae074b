//! HTTP fetcher and image download tests against a mock server

use crate::site::test_config;
use shelf_crawler::config::UserAgentConfig;
use shelf_crawler::crawler::{HttpFetcher, ImageDownloader, PageFetcher};
use shelf_crawler::model::Product;
use shelf_crawler::FetchError;
use rust_decimal::Decimal;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_transient_error_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let fetcher = HttpFetcher::new(&test_config(&server, out.path())).unwrap();

    let body = fetcher
        .fetch_page(&format!("{}/flaky.html", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "<html>ok</html>");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing.html"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let fetcher = HttpFetcher::new(&test_config(&server, out.path())).unwrap();

    let result = fetcher
        .fetch_page(&format!("{}/missing.html", server.uri()))
        .await;
    match result {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, 404),
        other => panic!("expected 404, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_retries_exhausted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let fetcher = HttpFetcher::new(&test_config(&server, out.path())).unwrap();

    let error = fetcher
        .fetch_page(&format!("{}/down.html", server.uri()))
        .await
        .unwrap_err();
    assert!(error.is_transient());
    assert_eq!(error.url(), format!("{}/down.html", server.uri()));
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let server = MockServer::start().await;
    let expected = UserAgentConfig::default().header_value();
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .and(header("user-agent", expected.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .expect(1)
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let fetcher = HttpFetcher::new(&test_config(&server, out.path())).unwrap();

    let body = fetcher
        .fetch_page(&format!("{}/index.html", server.uri()))
        .await
        .unwrap();
    assert_eq!(body, "hello");
}

#[tokio::test]
async fn test_image_download_is_idempotent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/cache/2c/da/cover.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x89PNG-bytes".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let out = tempfile::tempdir().unwrap();
    let config = test_config(&server, out.path());
    let fetcher = Arc::new(HttpFetcher::new(&config).unwrap());
    let downloader = ImageDownloader::new(fetcher, &config.output.images_dir);

    let product = Product {
        product_page_url: format!("{}/catalogue/a-light-in-the-attic_1000/index.html", server.uri()),
        upc: "a897fe39b1053632".to_string(),
        title: "A Light in the Attic".to_string(),
        price_including_tax: Decimal::new(5177, 2),
        price_excluding_tax: Decimal::new(5177, 2),
        quantity_available: 22,
        description: String::new(),
        category: "Poetry".to_string(),
        review_rating: None,
        image_url: format!("{}/media/cache/2c/da/cover.png", server.uri()),
        image_local_path: None,
    };

    let first = downloader.download(&product).await.unwrap();
    let second = downloader.download(&product).await.unwrap();

    assert_eq!(first, second);
    assert!(first.ends_with("Poetry/a897fe39b1053632.png"));
    assert_eq!(std::fs::read(&first).unwrap(), b"\x89PNG-bytes");
    let stored = std::fs::read_dir(out.path().join("images").join("Poetry"))
        .unwrap()
        .count();
    assert_eq!(stored, 1);
}
