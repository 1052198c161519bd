//! Integration tests for the mirror
//!
//! These tests use wiremock to stand up a fake shop and run the full
//! crawl, entry-point scan and download cycle end-to-end.

use media_mirror::config::{Config, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use media_mirror::crawler::{Crawler, Orchestrator};
use media_mirror::url::PathFilter;
use std::path::Path;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(
    origin: &str,
    mirror_root: &Path,
    entry_points: &[&str],
    max_pages: usize,
) -> Config {
    Config {
        site: SiteConfig {
            origin: origin.to_string(),
            media_prefix: "/media/product_images/".to_string(),
            allow_prefixes: vec!["/".to_string(), "/products".to_string()],
            deny_prefixes: vec![
                "/admin".to_string(),
                "/static".to_string(),
                "/media".to_string(),
                "/accounts/logout".to_string(),
            ],
            entry_points: entry_points.iter().map(|e| e.to_string()).collect(),
        },
        crawler: CrawlerConfig {
            max_pages,
            request_timeout: 5,
            crawl_delay: 0, // No politeness pause against a local mock
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            mirror_root: mirror_root.to_path_buf(),
        },
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/html")
        .set_body_string(format!("<html><body>{}</body></html>", body))
}

fn image(bytes: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "image/jpeg")
        .set_body_bytes(bytes.to_vec())
}

async fn mount_page(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, image_path: &str, bytes: &[u8], expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(image_path))
        .respond_with(image(bytes))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn origin_filter(server: &MockServer) -> PathFilter {
    let origin = Url::parse(&server.uri()).expect("Failed to parse mock server URI");
    PathFilter::new(
        &origin,
        vec!["/".to_string(), "/products".to_string()],
        vec!["/admin".to_string(), "/static".to_string(), "/media".to_string()],
        "/media/product_images/",
    )
}

/// Serves `/products/page/N` linking to `/products/page/N+1`, forever
struct EndlessChain;

impl Respond for EndlessChain {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let n: u64 = request
            .url
            .path()
            .trim_start_matches("/products/page/")
            .parse()
            .unwrap_or(0);
        html(&format!(
            r#"<a href="/products/page/{}">next</a><a href="/products/page/{}">back</a>"#,
            n + 1,
            n.saturating_sub(1)
        ))
    }
}

#[tokio::test]
async fn test_seed_page_yields_media_and_enqueues_link() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<img src="/media/product_images/shoe.jpg"><a href="/products/x">X</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/products/x"))
        .respond_with(html("<p>no images here</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), Path::new("."), &[], 100);
    let mut crawler = Crawler::new(reqwest::Client::new(), origin_filter(&mock_server), config.crawler);

    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let media = crawler.crawl(seed).await;

    let expected = Url::parse(&format!("{}/media/product_images/shoe.jpg", mock_server.uri())).unwrap();
    assert_eq!(media.into_iter().collect::<Vec<_>>(), vec![expected]);
    assert_eq!(crawler.pages_crawled(), 2);
}

#[tokio::test]
async fn test_page_cap_on_endless_chain() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/products/page/1">start</a>"#).await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/products/page/\d+$"))
        .respond_with(EndlessChain)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), Path::new("."), &[], 7);
    let mut crawler = Crawler::new(reqwest::Client::new(), origin_filter(&mock_server), config.crawler);

    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    crawler.crawl(seed).await;

    assert_eq!(crawler.pages_crawled(), 7);
    assert!(crawler.frontier().cap_reached());

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording is enabled");
    assert_eq!(requests.len(), 7);
}

#[tokio::test]
async fn test_full_mirror_run() {
    let mock_server = MockServer::start().await;
    let mirror = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/",
        r##"
        <a href="/products/department/mens">Mens</a>
        <a href="/admin/">Admin</a>
        <a href="/static/site.css">Styles</a>
        <a href="https://elsewhere.example.com/products">Elsewhere</a>
        <a href="#top">Top</a>
        <img src="/static/logo.png">
        "##,
    )
    .await;

    mount_page(
        &mock_server,
        "/products/department/mens",
        r#"
        <img src="/media/product_images/runner.jpg"
             srcset="/media/product_images/runner.jpg 1x, /media/product_images/runner@2x.jpg 2x">
        <picture>
            <source srcset="/media/product_images/trail.webp 800w">
            <img src="/media/product_images/trail.jpg">
        </picture>
        <a href="/">Home</a>
        "#,
    )
    .await;

    // Reachable only through an entry point
    mount_page(
        &mock_server,
        "/products/department/kids",
        r#"<img src="/media/product_images/kids/mini.jpg">"#,
    )
    .await;

    for name in ["runner.jpg", "runner@2x.jpg", "trail.webp", "trail.jpg", "kids/mini.jpg"] {
        let image_path = format!("/media/product_images/{}", name);
        mount_image(&mock_server, &image_path, name.as_bytes(), 1).await;
    }

    for forbidden in ["/admin/", "/static/site.css", "/static/logo.png"] {
        Mock::given(method("GET"))
            .and(path(forbidden))
            .respond_with(html("forbidden"))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(
        &mock_server.uri(),
        mirror.path(),
        &["/products/department/kids", "/products/department/missing"],
        100,
    );

    let mut orchestrator = Orchestrator::new(config).expect("Failed to create orchestrator");
    let summary = orchestrator.run().await.expect("Mirror run failed");

    assert_eq!(summary.pages_crawled, 2);
    assert_eq!(summary.entry_points_failed, 1);
    assert_eq!(summary.media_found, 5);
    assert_eq!(summary.media_downloaded, 5);
    assert_eq!(summary.media_failed, 0);

    let media_dir = mirror.path().join("media/product_images");
    assert_eq!(
        std::fs::read(media_dir.join("runner@2x.jpg")).unwrap(),
        b"runner@2x.jpg"
    );
    assert_eq!(
        std::fs::read(media_dir.join("kids/mini.jpg")).unwrap(),
        b"kids/mini.jpg"
    );
    assert!(media_dir.join("trail.webp").is_file());
}

#[tokio::test]
async fn test_second_run_downloads_nothing() {
    let mock_server = MockServer::start().await;
    let mirror = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/",
        r#"<img src="/media/product_images/a.jpg"><img src="/media/product_images/b.jpg">"#,
    )
    .await;
    mount_image(&mock_server, "/media/product_images/a.jpg", b"a", 1).await;
    mount_image(&mock_server, "/media/product_images/b.jpg", b"b", 1).await;

    let first = {
        let config = create_test_config(&mock_server.uri(), mirror.path(), &[], 10);
        Orchestrator::new(config).unwrap().run().await.unwrap()
    };
    assert_eq!(first.media_downloaded, 2);

    let second = {
        let config = create_test_config(&mock_server.uri(), mirror.path(), &[], 10);
        Orchestrator::new(config).unwrap().run().await.unwrap()
    };
    assert_eq!(second.media_found, 2);
    assert_eq!(second.media_downloaded, 0);
    assert_eq!(second.media_skipped, 2);
}

#[tokio::test]
async fn test_failed_media_does_not_abort_run() {
    let mock_server = MockServer::start().await;
    let mirror = TempDir::new().expect("Failed to create temp dir");

    mount_page(
        &mock_server,
        "/",
        r#"<img src="/media/product_images/broken.jpg"><img src="/media/product_images/fine.jpg">"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/media/product_images/broken.jpg"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    mount_image(&mock_server, "/media/product_images/fine.jpg", b"ok", 1).await;

    let config = create_test_config(&mock_server.uri(), mirror.path(), &[], 10);
    let summary = Orchestrator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.media_found, 2);
    assert_eq!(summary.media_downloaded, 1);
    assert_eq!(summary.media_failed, 1);

    let media_dir = mirror.path().join("media/product_images");
    assert!(!media_dir.join("broken.jpg").exists());
    assert!(media_dir.join("fine.jpg").exists());
}

#[tokio::test]
async fn test_unreachable_seed_finishes_cleanly() {
    let mock_server = MockServer::start().await;
    let mirror = TempDir::new().expect("Failed to create temp dir");

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), mirror.path(), &[], 10);
    let summary = Orchestrator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.pages_crawled, 0);
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.media_found, 0);
    // The media directory exists even when nothing was downloaded
    assert!(mirror.path().join("media/product_images").is_dir());
}
