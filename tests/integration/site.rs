//! Fixture bookshop served by a wiremock server
//!
//! Layout mirrors the real site:
//! - `/index.html` holds the category sidebar
//! - `/catalogue/category/books/<category>/index.html` and `page-N.html` are listings
//! - `/catalogue/<book>/index.html` are product pages
//! - `/media/<upc>.jpg` are cover images

use shelf_crawler::config::Config;
use std::path::Path;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PRODUCTS_PER_PAGE: usize = 20;

/// One category of the fixture site
pub struct FixtureCategory {
    pub name: &'static str,
    pub dir: &'static str,
    pub books: Vec<String>,
}

impl FixtureCategory {
    pub fn new(name: &'static str, dir: &'static str, count: usize) -> Self {
        let books = (1..=count).map(|i| format!("{}-book-{}_{}", dir, i, i)).collect();
        Self { name, dir, books }
    }

    pub fn listing_path(&self, page: usize) -> String {
        if page == 1 {
            format!("/catalogue/category/books/{}/index.html", self.dir)
        } else {
            format!("/catalogue/category/books/{}/page-{}.html", self.dir, page)
        }
    }
}

pub fn book_path(book: &str) -> String {
    format!("/catalogue/{}/index.html", book)
}

pub fn upc_for(book: &str) -> String {
    format!("upc-{}", book)
}

pub fn root_html(categories: &[FixtureCategory]) -> String {
    let items: String = categories
        .iter()
        .map(|c| {
            format!(
                r#"<li><a href="catalogue/category/books/{}/index.html">
                    {}
                </a></li>"#,
                c.dir, c.name
            )
        })
        .collect();
    format!(
        r#"<html><body>
<div class="side_categories"><ul class="nav nav-list">
<li><a href="catalogue/category/books_1/index.html">Books</a><ul>{}</ul></li>
</ul></div>
</body></html>"#,
        items
    )
}

pub fn listing_html(heading: &str, books: &[String], next: Option<&str>) -> String {
    let cards: String = books
        .iter()
        .map(|book| {
            format!(
                r#"<li><article class="product_pod"><h3><a href="../../../{}/index.html" title="{}">{}</a></h3></article></li>"#,
                book, book, book
            )
        })
        .collect();
    let pager = next
        .map(|href| format!(r#"<ul class="pager"><li class="next"><a href="{}">next</a></li></ul>"#, href))
        .unwrap_or_default();
    format!(
        r#"<html><body><div class="page-header action"><h1>{}</h1></div><section><ol class="row">{}</ol>{}</section></body></html>"#,
        heading, cards, pager
    )
}

pub fn product_html(book: &str, category: &str) -> String {
    let upc = upc_for(book);
    format!(
        r#"<html><body>
<ul class="breadcrumb">
  <li><a href="../../index.html">Home</a></li>
  <li><a href="../category/books_1/index.html">Books</a></li>
  <li><a href="../category/books/x/index.html">{category}</a></li>
  <li class="active">{book}</li>
</ul>
<div class="product_gallery"><div class="item active"><img src="../../media/{upc}.jpg" alt="{book}" /></div></div>
<div class="product_main">
  <h1>{book}</h1>
  <p class="price_color">£51.77</p>
  <p class="instock availability"><i class="icon-ok"></i> In stock (22 available)</p>
  <p class="star-rating Three"><i class="icon-star"></i></p>
</div>
<div id="product_description" class="sub-header"><h2>Product Description</h2></div>
<p>A story about {book}, with "quotes", commas, and more.</p>
<table class="table table-striped">
  <tr><th>UPC</th><td>{upc}</td></tr>
  <tr><th>Product Type</th><td>Books</td></tr>
  <tr><th>Price (excl. tax)</th><td>£51.77</td></tr>
  <tr><th>Price (incl. tax)</th><td>£51.77</td></tr>
  <tr><th>Tax</th><td>£0.00</td></tr>
  <tr><th>Availability</th><td>In stock (22 available)</td></tr>
</table>
</body></html>"#
    )
}

async fn serve_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Mounts the root page, every listing page, product page and image
pub async fn mount_site(server: &MockServer, categories: &[FixtureCategory]) {
    serve_html(server, "/index.html", root_html(categories)).await;

    for category in categories {
        let empty: &[String] = &[];
        let pages: Vec<&[String]> = if category.books.is_empty() {
            vec![empty]
        } else {
            category.books.chunks(PRODUCTS_PER_PAGE).collect()
        };
        for (index, books) in pages.iter().enumerate() {
            let page = index + 1;
            let next = (page < pages.len()).then(|| format!("page-{}.html", page + 1));
            serve_html(
                server,
                &category.listing_path(page),
                listing_html(category.name, books, next.as_deref()),
            )
            .await;
        }

        for book in &category.books {
            serve_html(server, &book_path(book), product_html(book, category.name)).await;
            Mock::given(method("GET"))
                .and(path(format!("/media/{}.jpg", upc_for(book))))
                .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("jpeg:{}", book).into_bytes()))
                .mount(server)
                .await;
        }
    }
}

/// Configuration pointing at `server` and writing below `out`
pub fn test_config(server: &MockServer, out: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.root_url = format!("{}/index.html", server.uri());
    config.crawler.max_retries = 1;
    config.crawler.retry_delay_ms = 10;
    config.crawler.request_timeout_secs = 5;
    config.output.csv_dir = out.join("csv").display().to_string();
    config.output.images_dir = out.join("images").display().to_string();
    config
}
