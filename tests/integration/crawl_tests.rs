//! End-to-end crawl tests against the fixture bookshop

use crate::site::{book_path, mount_site, root_html, listing_html, product_html, test_config, upc_for, FixtureCategory};
use rust_decimal::Decimal;
use shelf_crawler::crawler::Crawler;
use shelf_crawler::model::StarRating;
use shelf_crawler::output::read_products;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn two_categories() -> Vec<FixtureCategory> {
    vec![
        FixtureCategory::new("Travel", "travel_2", 25),
        FixtureCategory::new("Sequential Art", "sequential-art_5", 3),
    ]
}

fn csv_file(out: &Path, stem: &str) -> std::path::PathBuf {
    out.join("csv").join(format!("{}.csv", stem))
}

#[tokio::test]
async fn test_full_crawl_two_categories() {
    let server = MockServer::start().await;
    mount_site(&server, &two_categories()).await;
    let out = tempfile::tempdir().unwrap();

    let crawler = Crawler::new(test_config(&server, out.path())).unwrap();
    let summary = crawler.run().await.unwrap();

    assert_eq!(summary.categories_discovered, 2);
    assert_eq!(summary.categories_processed, 2);
    assert_eq!(summary.categories_failed, 0);
    assert_eq!(summary.products_written, 28);
    assert_eq!(summary.failures(), 0);
    assert_eq!(summary.image_failures, 0);

    let travel = read_products(&csv_file(out.path(), "Travel")).unwrap();
    let comics = read_products(&csv_file(out.path(), "Sequential_Art")).unwrap();
    assert_eq!(travel.len(), 25);
    assert_eq!(comics.len(), 3);

    // Listing order, across both pages
    assert_eq!(travel[0].upc, upc_for("travel_2-book-1_1"));
    assert_eq!(travel[20].upc, upc_for("travel_2-book-21_21"));
    assert_eq!(travel[24].upc, upc_for("travel_2-book-25_25"));

    let images = out.path().join("images").join("Travel");
    assert_eq!(std::fs::read_dir(&images).unwrap().count(), 25);
    assert_eq!(
        std::fs::read(images.join(format!("{}.jpg", upc_for("travel_2-book-1_1")))).unwrap(),
        b"jpeg:travel_2-book-1_1"
    );
}

#[tokio::test]
async fn test_csv_rows_carry_extracted_fields() {
    let server = MockServer::start().await;
    mount_site(&server, &[FixtureCategory::new("Poetry", "poetry_23", 1)]).await;
    let out = tempfile::tempdir().unwrap();

    let summary = Crawler::new(test_config(&server, out.path()))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(summary.products_written, 1);

    let rows = read_products(&csv_file(out.path(), "Poetry")).unwrap();
    let product = &rows[0];
    assert_eq!(
        product.product_page_url,
        format!("{}{}", server.uri(), book_path("poetry_23-book-1_1"))
    );
    assert_eq!(product.upc, "upc-poetry_23-book-1_1");
    assert_eq!(product.title, "poetry_23-book-1_1");
    assert_eq!(product.price_including_tax, Decimal::new(5177, 2));
    assert_eq!(product.price_excluding_tax, Decimal::new(5177, 2));
    assert_eq!(product.quantity_available, 22);
    assert_eq!(
        product.description,
        "A story about poetry_23-book-1_1, with \"quotes\", commas, and more."
    );
    assert_eq!(product.category, "Poetry");
    assert_eq!(product.review_rating, Some(StarRating::Three));
    assert_eq!(
        product.image_url,
        format!("{}/media/upc-poetry_23-book-1_1.jpg", server.uri())
    );
    let local = product.image_local_path.as_deref().unwrap();
    assert!(Path::new(local).exists());
}

#[tokio::test]
async fn test_product_failure_is_isolated() {
    let server = MockServer::start().await;
    // Registered first, so it wins over the fixture page for the same path
    Mock::given(method("GET"))
        .and(path(book_path("travel_2-book-7_7")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_site(&server, &two_categories()).await;
    let out = tempfile::tempdir().unwrap();

    let summary = Crawler::new(test_config(&server, out.path()))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.categories_processed, 2);
    assert_eq!(summary.product_failures, 1);
    assert_eq!(summary.failures(), 1);
    assert_eq!(summary.products_written, 27);

    let travel = read_products(&csv_file(out.path(), "Travel")).unwrap();
    assert_eq!(travel.len(), 24);
    assert!(travel.iter().all(|p| p.upc != upc_for("travel_2-book-7_7")));
}

#[tokio::test]
async fn test_cyclic_next_link_terminates() {
    let server = MockServer::start().await;
    let category = FixtureCategory::new("Mystery", "mystery_3", 4);
    Mock::given(method("GET"))
        .and(path("/index.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(root_html(std::slice::from_ref(&category))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(category.listing_path(1)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(
            "Mystery",
            &category.books[..2],
            Some("page-2.html"),
        )))
        .mount(&server)
        .await;
    // Page two links back to page one
    Mock::given(method("GET"))
        .and(path(category.listing_path(2)))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(
            "Mystery",
            &category.books[2..],
            Some("index.html"),
        )))
        .mount(&server)
        .await;
    for book in &category.books {
        Mock::given(method("GET"))
            .and(path(book_path(book)))
            .respond_with(ResponseTemplate::new(200).set_body_string(product_html(book, "Mystery")))
            .mount(&server)
            .await;
    }
    let out = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, out.path());
    config.output.download_images = false;

    let summary = Crawler::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.categories_processed, 1);
    assert_eq!(summary.products_written, 4);
    assert_eq!(read_products(&csv_file(out.path(), "Mystery")).unwrap().len(), 4);
}

#[tokio::test]
async fn test_empty_category_gets_header_only_csv() {
    let server = MockServer::start().await;
    mount_site(&server, &[FixtureCategory::new("Crime", "crime_51", 0)]).await;
    let out = tempfile::tempdir().unwrap();

    let summary = Crawler::new(test_config(&server, out.path()))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.categories_processed, 1);
    assert_eq!(summary.products_written, 0);
    let content = std::fs::read_to_string(csv_file(out.path(), "Crime")).unwrap();
    assert_eq!(content.lines().count(), 1);
    assert!(content.starts_with("product_page_url,upc,book_title,"));
}

#[tokio::test]
async fn test_category_filter_and_rerun_truncates() {
    let server = MockServer::start().await;
    mount_site(&server, &two_categories()).await;
    let out = tempfile::tempdir().unwrap();
    let mut config = test_config(&server, out.path());
    config.output.download_images = false;

    let crawler = Crawler::new(config).unwrap();
    let only = vec!["sequential art".to_string()];

    let first = crawler.run_filtered(&only).await.unwrap();
    let second = crawler.run_filtered(&only).await.unwrap();

    assert_eq!(first.categories_discovered, 2);
    assert_eq!(first.categories_processed, 1);
    assert_eq!(second.products_written, 3);
    assert!(!csv_file(out.path(), "Travel").exists());
    assert_eq!(read_products(&csv_file(out.path(), "Sequential_Art")).unwrap().len(), 3);
}

#[tokio::test]
async fn test_run_report_written() {
    let server = MockServer::start().await;
    mount_site(&server, &[FixtureCategory::new("Poetry", "poetry_23", 2)]).await;
    let out = tempfile::tempdir().unwrap();
    let report_path = out.path().join("summary.md");
    let mut config = test_config(&server, out.path());
    config.output.download_images = false;
    config.output.summary_path = Some(report_path.display().to_string());

    Crawler::new(config)
        .unwrap()
        .with_config_hash("abc123")
        .run()
        .await
        .unwrap();

    let report = std::fs::read_to_string(&report_path).unwrap();
    assert!(report.contains("- **Config Hash**: abc123"));
    assert!(report.contains("- **Products Written**: 2"));
    assert!(report.contains("| Poetry | 2 | 0 | 0 |"));
}

#[tokio::test]
async fn test_unreachable_root_is_fatal() {
    let server = MockServer::start().await;
    let out = tempfile::tempdir().unwrap();

    let result = Crawler::new(test_config(&server, out.path()))
        .unwrap()
        .run()
        .await;

    assert!(matches!(result, Err(shelf_crawler::CrawlError::Fetch(_))));
}
