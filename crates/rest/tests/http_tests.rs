//! HTTP behavior tests.
//!
//! Covers the response contract of the page handler:
//! - Status codes (200, 301, 302, 403, 404, 405, 410, 503)
//! - Response headers (Content-Type, Last-Modified, Content-Language, Location)
//! - Content negotiation (HTML and JSON)
//! - Preview access to unpublished records
//! - Health probes

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use lectern_persistence::backends::memory::MemoryStore;
use lectern_persistence::backends::sqlite::SqliteStore;
use lectern_persistence::seed::SeedDocument;
use lectern_persistence::types::{
    CanonicalPolicy, ContentRecord, RecordId, RedirectDisposition, RedirectRule,
};
use lectern_rest::{AppState, ServerConfig, create_app_with_config};
use regex::Regex;
use serde_json::Value;

const X_PREVIEW_TOKEN: HeaderName = HeaderName::from_static("x-preview-token");
const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

fn record(id: i64, key: &str, title: &str, content: &str) -> ContentRecord {
    ContentRecord::new(RecordId::new(id), key, title, content)
}

fn site() -> MemoryStore {
    MemoryStore::new()
        .with_record(record(1, "/", "Home", "Welcome home"))
        .with_record(
            record(2, "/about", "About", "We write things.\n\nAnd read them.")
                .with_parent(RecordId::new(1))
                .with_author("ada")
                .with_last_modified(Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap()),
        )
        .with_record(
            record(3, "/draft", "Draft", "Not yet")
                .with_parent(RecordId::new(1))
                .with_published(false),
        )
        .with_record(
            record(4, "/layout", "Layout", "%%%slot text%%%Main%%%slot sidebar%%%Side")
                .with_parent(RecordId::new(1)),
        )
        .with_record(record(5, "/go", "Go", "%%%redirect /about/%%%"))
        .with_redirect(RedirectRule::new("/old/*", "/new/*", RedirectDisposition::Permanent))
        .with_redirect(RedirectRule::new("/private", "", RedirectDisposition::Forbidden))
        .with_redirect(RedirectRule::new("/removed", "", RedirectDisposition::Gone))
}

fn config() -> ServerConfig {
    ServerConfig {
        base_url: "https://example.org".to_string(),
        preview_token: Some("s3cret".to_string()),
        ..ServerConfig::for_testing()
    }
}

fn create_test_server_with(store: MemoryStore, config: ServerConfig) -> TestServer {
    let app = create_app_with_config(store, config);
    TestServer::new(app).expect("Failed to create test server")
}

fn create_test_server() -> TestServer {
    create_test_server_with(site(), config())
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_page_returns_html_document() {
    let server = create_test_server();

    let response = server.get("/about/").await;

    response.assert_status_ok();
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    let body = response.text();
    assert!(body.contains("<title>About | Lectern</title>"));
    assert!(body.contains("<p>We write things.</p>\n<p>And read them.</p>"));
    assert!(body.contains("<a href=\"/\">Home</a>"));
    assert!(body.contains("ada"));
}

#[tokio::test]
async fn test_page_last_modified_header() {
    let server = create_test_server();

    let response = server.get("/about/").await;

    assert_eq!(
        response.headers()[header::LAST_MODIFIED],
        "Tue, 05 Mar 2024 14:07:09 GMT"
    );
    let pattern = Regex::new(r"^[A-Z][a-z]{2}, \d{2} [A-Z][a-z]{2} \d{4} \d{2}:\d{2}:\d{2} GMT$")
        .unwrap();
    let home = server.get("/").await;
    let value = home.headers()[header::LAST_MODIFIED].to_str().unwrap().to_string();
    assert!(pattern.is_match(&value), "bad Last-Modified: {}", value);
}

#[tokio::test]
async fn test_language_suffix_sets_content_language() {
    let server = create_test_server();

    let response = server.get("/about.html.de").await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);

    let store = site().with_record(
        record(6, "/faq", "FAQ", "Fragen").with_canonical(CanonicalPolicy::RequireExtension),
    );
    let server = create_test_server_with(store, config());
    let response = server.get("/faq.html.de").await;
    response.assert_status_ok();
    assert_eq!(response.headers()[header::CONTENT_LANGUAGE], "de");
    assert!(response.text().contains("<html lang=\"de\">"));
}

#[tokio::test]
async fn test_json_representation() {
    let server = create_test_server();

    let response = server
        .get("/layout/")
        .add_header(header::ACCEPT, HeaderValue::from_static("application/json"))
        .await;

    response.assert_status_ok();
    let page: Value = response.json();
    assert_eq!(page["title"], "Layout");
    assert_eq!(page["browser_title"], "Layout | Lectern");
    assert_eq!(page["text"]["text"], "<p>Main</p>");
    assert_eq!(page["text"]["sidebar"], "<p>Side</p>");
    assert_eq!(page["breadcrumbs"][0]["title"], "Home");
}

#[tokio::test]
async fn test_slots_render_as_asides() {
    let server = create_test_server();

    let body = server.get("/layout/").await.text();

    assert!(body.contains("<main>\n<h1>Layout</h1>\n<p>Main</p>"));
    assert!(body.contains("<aside data-slot=\"sidebar\">"));
}

#[tokio::test]
async fn test_post_is_not_allowed() {
    let server = create_test_server();

    let response = server.post("/about/").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Redirects and Static Statuses
// =============================================================================

#[tokio::test]
async fn test_canonical_redirect() {
    let server = create_test_server();

    let response = server.get("/about.html").await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.org/about/"
    );
}

#[tokio::test]
async fn test_wildcard_redirect() {
    let server = create_test_server();

    let response = server.get("/old/foo/bar").await;

    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.org/new/foo/bar"
    );
}

#[tokio::test]
async fn test_content_redirect_is_found() {
    let server = create_test_server();

    let response = server.get("/go/").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.org/about/"
    );
}

#[tokio::test]
async fn test_static_status_pages() {
    let server = create_test_server();

    let missing = server.get("/nowhere/").await;
    missing.assert_status(StatusCode::NOT_FOUND);
    assert!(missing.text().contains("404 Not Found"));

    let gone = server.get("/removed/").await;
    gone.assert_status(StatusCode::GONE);
    assert!(gone.text().contains("410 Gone"));

    let forbidden = server.get("/private/").await;
    forbidden.assert_status(StatusCode::FORBIDDEN);
    assert!(forbidden.text().contains("403 Forbidden"));
}

#[tokio::test]
async fn test_store_failure_is_503() {
    let store = site();
    store.set_offline(true);
    let server = create_test_server_with(store, config());

    let response = server.get("/about/").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.text().contains("503 Service Unavailable"));
}

#[tokio::test]
async fn test_hierarchy_cycle_is_500() {
    let store = MemoryStore::new()
        .with_record(record(1, "/a", "A", "x").with_parent(RecordId::new(2)))
        .with_record(record(2, "/b", "B", "y").with_parent(RecordId::new(1)));
    let server = create_test_server_with(store, config());

    let response = server.get("/a/").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// Preview Access
// =============================================================================

#[tokio::test]
async fn test_unpublished_hidden_without_token() {
    let server = create_test_server();

    server.get("/draft/").await.assert_status(StatusCode::NOT_FOUND);
    server
        .get("/draft/")
        .add_header(X_PREVIEW_TOKEN, HeaderValue::from_static("wrong"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unpublished_visible_with_token() {
    let server = create_test_server();

    let response = server
        .get("/draft/")
        .add_header(X_PREVIEW_TOKEN, HeaderValue::from_static("s3cret"))
        .await;
    response.assert_status_ok();
    assert!(response.text().contains("Not yet"));

    server
        .get("/draft/")
        .add_query_param("preview", "s3cret")
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_unconfigured_token_keeps_gate_closed() {
    let config = ServerConfig {
        preview_token: None,
        ..config()
    };
    let server = create_test_server_with(site(), config);

    server
        .get("/draft/")
        .add_header(X_PREVIEW_TOKEN, HeaderValue::from_static("s3cret"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// =============================================================================
// Health and Middleware
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let server = create_test_server();

    let health = server.get("/_health").await;
    health.assert_status_ok();
    let body: Value = health.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["backend"], "memory");

    server.get("/_liveness").await.assert_status_ok();

    let ready: Value = server.get("/_readiness").await.json();
    assert_eq!(ready["status"], "ready");
}

#[tokio::test]
async fn test_readiness_reports_store_failure() {
    let store = site();
    store.set_offline(true);
    let server = create_test_server_with(store, config());

    let response = server.get("/_readiness").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_id_header() {
    let config = ServerConfig {
        enable_request_id: true,
        ..config()
    };
    let server = create_test_server_with(site(), config);

    let response = server.get("/about/").await;
    let id = response.headers()[&X_REQUEST_ID].to_str().unwrap().to_string();
    let uuid = Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .unwrap();
    assert!(uuid.is_match(&id), "bad request id: {}", id);

    let echoed = server
        .get("/about/")
        .add_header(X_REQUEST_ID, HeaderValue::from_static("abc-123"))
        .await;
    assert_eq!(echoed.headers()[&X_REQUEST_ID], "abc-123");
}

// =============================================================================
// Tables and SQLite
// =============================================================================

#[tokio::test]
async fn test_table_directory_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("prices.json"),
        r#"{"title": "Prices", "columns": ["Item", "Price"], "rows": [["Tea", "3"]]}"#,
    )
    .unwrap();
    let store = MemoryStore::new().with_record(record(1, "/tables/*", "Tables", "%%%table%%%"));
    let config = ServerConfig {
        table_dir: Some(dir.path().to_path_buf()),
        ..config()
    };
    let server = create_test_server_with(store, config);

    let response = server.get("/tables/prices/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("<title>Prices | Lectern</title>"));
    assert!(body.contains("<td>Tea</td>"));

    server
        .get("/tables/unknown/")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_seeded_sqlite_backend() {
    let store = SqliteStore::in_memory().unwrap();
    store.init_schema().unwrap();
    SeedDocument::from_json_str(
        r#"{
            "records": [
                { "id": 1, "key": "/", "title": "Home", "content": "Hi" },
                { "id": 2, "key": "/docs", "parent_id": 1, "title": "Docs",
                  "content": "Read %%%query title Manual%%% carefully" }
            ],
            "redirects": [
                { "source": "/manual", "target": "/docs/", "code": 301 }
            ]
        }"#,
    )
    .unwrap()
    .apply(&store)
    .await
    .unwrap();

    let state = AppState::new(Arc::new(store), config());
    let app = lectern_rest::routing::routes::create_routes(state);
    let server = TestServer::new(app).expect("Failed to create test server");

    let response = server.get("/docs/").await;
    response.assert_status_ok();
    assert!(response.text().contains("<title>Manual | Lectern</title>"));

    let response = server.get("/manual.html").await;
    response.assert_status(StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.org/docs/"
    );

    let health: Value = server.get("/_health").await.json();
    assert_eq!(health["backend"], "sqlite");
}
