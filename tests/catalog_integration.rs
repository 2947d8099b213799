//! Integration tests for catalog metadata resolution.
//!
//! These tests run the resolver against a mock catalog through the real HTTP
//! fetcher.

use std::sync::Arc;

use library_core::{
    Config, Fetch, FetchError, HttpFetcher, Identifier, LibraryError, MetadataResolver,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MD5: &str = "1065812d567369000ccc1e985e4cadc2";

fn resolver_for(server: &MockServer) -> MetadataResolver {
    let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::new().expect("client builds"));
    MetadataResolver::new(Config::new(Some(server.uri().as_str()), None), fetcher)
}

async fn mount_page(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/md5/{MD5}")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "text/html; charset=utf-8")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_full_page_returns_metadata_and_mirrors() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        r#"<html><head><title>The Porn Trap - Library</title></head><body>
        <div data-content='{"title":"The Porn Trap","author":"Wendy Maltz; Larry Maltz","year":"2008","extension":"pdf"}'></div>
        <a class="js-download-link download-fast" href="/fast_download/1065812d/0/0">Fast Partner Server #1</a>
        <a class="js-download-link download-fast" href="/fast_download/1065812d/0/1">Fast Partner Server #2</a>
        <a class="js-download-link download-slow" href="/slow_download/1065812d/0/0">Slow Partner Server #1</a>
        </body></html>"#,
    )
    .await;

    let id = Identifier::parse(MD5).expect("valid identifier");
    let details = resolver_for(&server).resolve(&id).await.expect("resolve succeeds");

    assert_eq!(details.title, "The Porn Trap");
    assert_eq!(details.author.as_deref(), Some("Wendy Maltz; Larry Maltz"));
    assert_eq!(details.format.as_deref(), Some("pdf"));
    assert_eq!(
        details.download_options.fast,
        vec![
            format!("{}/fast_download/1065812d/0/0", server.uri()),
            format!("{}/fast_download/1065812d/0/1", server.uri()),
        ]
    );
    assert_eq!(
        details.download_options.slow,
        vec![format!("{}/slow_download/1065812d/0/0", server.uri())]
    );
}

#[tokio::test]
async fn test_resolve_falls_back_to_page_title_when_data_content_missing() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "<html><head><title>Example Book - Library</title></head><body></body></html>",
    )
    .await;

    let id = Identifier::parse(MD5).expect("valid identifier");
    let details = resolver_for(&server).resolve(&id).await.expect("resolve succeeds");

    assert_eq!(details.title, "Example Book");
    assert!(details.download_options.fast.is_empty());
    assert!(details.download_options.slow.is_empty());
}

#[tokio::test]
async fn test_resolve_uppercase_identifier_hits_lowercase_path() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "<html><head><title>Example Book - Library</title></head></html>",
    )
    .await;

    let id = Identifier::parse(&MD5.to_ascii_uppercase()).expect("valid identifier");
    let details = resolver_for(&server).resolve(&id).await.expect("resolve succeeds");
    assert_eq!(details.title, "Example Book");
}

#[tokio::test]
async fn test_resolve_page_without_title_is_parse_error() {
    let server = MockServer::start().await;
    mount_page(&server, "<html><body><p>maintenance</p></body></html>").await;

    let id = Identifier::parse(MD5).expect("valid identifier");
    let result = resolver_for(&server).resolve(&id).await;

    match result {
        Err(LibraryError::Parse { url, .. }) => assert!(url.ends_with(&format!("/md5/{MD5}"))),
        other => panic!("Expected Parse error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_resolve_http_error_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/md5/{MD5}")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let id = Identifier::parse(MD5).expect("valid identifier");
    let result = resolver_for(&server).resolve(&id).await;

    assert!(
        matches!(
            result,
            Err(LibraryError::Fetch(FetchError::HttpStatus { status: 404, .. }))
        ),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_resolve_unreachable_host_is_fetch_error() {
    let fetcher: Arc<dyn Fetch> = Arc::new(HttpFetcher::with_timeouts(2, 5).expect("client builds"));
    // Port 1 on loopback is not listening.
    let resolver = MetadataResolver::new(Config::new(Some("http://127.0.0.1:1"), None), fetcher);

    let id = Identifier::parse(MD5).expect("valid identifier");
    let result = resolver.resolve(&id).await;

    assert!(
        matches!(
            result,
            Err(LibraryError::Fetch(
                FetchError::Network { .. } | FetchError::Timeout { .. }
            ))
        ),
        "got: {result:?}"
    );
}
