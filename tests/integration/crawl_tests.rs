//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full mirror cycle end-to-end.

use reqwest::Client;
use std::path::Path;
use sumi_mirror::config::{parse_config, Config};
use sumi_mirror::crawler::{run_mirror, Coordinator};
use sumi_mirror::url::Seed;
use sumi_mirror::MirrorError;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts an HTML page expected to be requested exactly `hits` times
async fn mount_page(server: &MockServer, route: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(hits)
        .mount(server)
        .await;
}

fn create_coordinator(base_url: &str, out_dir: &Path, parallelism: usize) -> Coordinator {
    Coordinator::new(
        Seed::parse(&format!("{}/", base_url)).expect("Failed to parse seed"),
        out_dir,
        Client::new(),
        parallelism,
        CancellationToken::new(),
    )
}

#[tokio::test]
async fn test_single_page_with_internal_and_external_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{}/about">About</a>
            <a href="https://other.com/">Elsewhere</a>
            </body></html>"#,
            base_url
        ),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "/about",
        r#"<html><head><title>About</title></head><body>About us</body></html>"#.to_string(),
        1,
    )
    .await;

    let out = TempDir::new().expect("Failed to create output dir");
    let coordinator = create_coordinator(&base_url, out.path(), 1);

    let summary = coordinator.run().await.expect("Mirror failed");

    assert!(out.path().join("index.html").is_file());
    assert!(out.path().join("about").is_file());
    assert!(!out.path().join("other.com").exists());

    let visited = coordinator.visited();
    assert_eq!(visited.len(), 3);
    assert!(visited.has(&format!("{}/", base_url)));
    assert!(visited.has(&format!("{}/about", base_url)));
    assert!(visited.has("https://other.com/"));

    assert!(coordinator.frontier().is_empty());

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.pages_written, 2);
    assert_eq!(summary.links_out_of_scope, 1);

    let about = std::fs::read_to_string(out.path().join("about")).unwrap();
    assert!(about.contains("About us"));
}

#[tokio::test]
async fn test_rerun_performs_no_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().expect("Failed to create output dir");

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<a href="{0}/docs/">Docs</a><a href="{0}/search?q=a/b">Search</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/docs/", "docs".to_string(), 1).await;
    mount_page(&mock_server, "/search", "results".to_string(), 1).await;

    let first = create_coordinator(&base_url, out.path(), 2);
    let summary = first.run().await.expect("First run failed");
    assert_eq!(summary.pages_fetched, 3);

    mock_server.verify().await;
    mock_server.reset().await;

    assert!(out.path().join("docs").join("index.html").is_file());
    assert!(out.path().join("search?q=a%2Fb").is_file());

    // Any request now would violate the expectation
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let second = create_coordinator(&base_url, out.path(), 2);
    let summary = second.run().await.expect("Second run failed");

    assert_eq!(summary.pages_fetched, 0);
    assert_eq!(summary.pages_from_disk, 3);
    assert_eq!(summary.pages_written, 0);
    assert_eq!(second.visited().len(), 3);
}

#[tokio::test]
async fn test_partial_mirror_resumes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let out = TempDir::new().expect("Failed to create output dir");

    // The seed was mirrored by an interrupted run; its link target was not
    std::fs::write(
        out.path().join("index.html"),
        format!(r#"<a href="{}/next">Next</a>"#, base_url),
    )
    .unwrap();

    mount_page(&mock_server, "/", "should not be fetched".to_string(), 0).await;
    mount_page(&mock_server, "/next", "next page".to_string(), 1).await;

    let coordinator = create_coordinator(&base_url, out.path(), 1);
    let summary = coordinator.run().await.expect("Mirror failed");

    assert_eq!(summary.pages_from_disk, 1);
    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(
        std::fs::read_to_string(out.path().join("next")).unwrap(),
        "next page"
    );
}

#[tokio::test]
async fn test_links_outside_prefix_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/docs/",
        format!(
            r#"<a href="{0}/docs/guide">Guide</a>
               <a href="{0}/blog">Blog</a>
               <a href="guide#install">Guide again</a>"#,
            base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/docs/guide", "guide".to_string(), 1).await;
    mount_page(&mock_server, "/blog", "blog".to_string(), 0).await;

    let out = TempDir::new().expect("Failed to create output dir");
    let coordinator = Coordinator::new(
        Seed::parse(&format!("{}/docs/", base_url)).unwrap(),
        out.path(),
        Client::new(),
        1,
        CancellationToken::new(),
    );

    coordinator.run().await.expect("Mirror failed");

    assert!(out.path().join("index.html").is_file());
    assert!(out.path().join("guide").is_file());
    assert!(!out.path().join("blog").exists());
    assert!(coordinator.visited().has(&format!("{}/blog", base_url)));
}

#[tokio::test]
async fn test_transport_failure_aborts_and_keeps_written_pages() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        format!(r#"<a href="{}/broken">Broken</a>"#, base_url),
        1,
    )
    .await;

    // Answers long after the client's deadline
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(200).set_delay(std::time::Duration::from_secs(5)))
        .mount(&mock_server)
        .await;

    let out = TempDir::new().expect("Failed to create output dir");
    let client = Client::builder()
        .timeout(std::time::Duration::from_millis(200))
        .build()
        .unwrap();
    let coordinator = Coordinator::new(
        Seed::parse(&format!("{}/", base_url)).unwrap(),
        out.path(),
        client,
        1,
        CancellationToken::new(),
    );

    let result = coordinator.run().await;

    assert!(matches!(result.unwrap_err(), MirrorError::Transport { .. }));
    assert!(out.path().join("index.html").is_file());
    assert!(!out.path().join("broken").exists());
}

#[tokio::test]
async fn test_run_mirror_with_config() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="{}/item?id={}">{}</a>"#, base_url, i, i))
        .collect();
    mount_page(&mock_server, "/", links, 1).await;

    Mock::given(method("GET"))
        .and(path("/item"))
        .respond_with(ResponseTemplate::new(200).set_body_string("item"))
        .expect(10)
        .mount(&mock_server)
        .await;

    let config: Config = parse_config(
        r#"
[crawler]
max-parallelism = 4

[http]
timeout-secs = 10
"#,
    )
    .expect("Failed to parse config");

    let out = TempDir::new().expect("Failed to create output dir");
    let summary = run_mirror(
        &format!("{}/", base_url),
        out.path(),
        &config,
        CancellationToken::new(),
    )
    .await
    .expect("Mirror failed");

    assert_eq!(summary.pages_fetched, 11);
    for i in 0..10 {
        assert!(out.path().join(format!("item?id={}", i)).is_file());
    }
}
