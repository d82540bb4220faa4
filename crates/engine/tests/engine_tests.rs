//! End-to-end engine tests.
//!
//! Each test builds a store, runs one request through [`Engine::handle`] and
//! inspects the outcome.

use std::sync::Arc;

use lectern_engine::directive::{
    Fragment, FunctionCall, FunctionRegistry, Interpreter, JsonTableDefinitions, PageText,
};
use lectern_engine::error::FunctionError;
use lectern_engine::{Engine, EngineError, EngineSettings, Outcome, PageRequest};
use lectern_persistence::backends::memory::MemoryStore;
use lectern_persistence::backends::sqlite::SqliteStore;
use lectern_persistence::seed::SeedDocument;
use lectern_persistence::types::{
    CanonicalPolicy, ContentRecord, RecordId, RedirectDisposition, RedirectRule,
};

fn record(id: i64, key: &str, title: &str, content: &str) -> ContentRecord {
    ContentRecord::new(RecordId::new(id), key, title, content)
}

fn engine(store: MemoryStore) -> Engine<MemoryStore> {
    Engine::new(Arc::new(store), EngineSettings::default())
}

async fn handle(engine: &Engine<MemoryStore>, path: &str) -> Outcome {
    engine
        .handle(&PageRequest::new(path).with_origin("https://example.org"))
        .await
        .expect("request should not fail")
}

fn expect_page(outcome: Outcome) -> lectern_engine::page::Page {
    match outcome {
        Outcome::Page(page) => *page,
        other => panic!("expected a page, got {:?}", other),
    }
}

fn expect_redirect(outcome: Outcome) -> (u16, String) {
    match outcome {
        Outcome::Redirect(emission) => (emission.status, emission.location),
        other => panic!("expected a redirect, got {:?}", other),
    }
}

// ============================================================================
// Resolution
// ============================================================================

#[tokio::test]
async fn test_exact_hit_renders_page() {
    let store = MemoryStore::new()
        .with_record(record(1, "/", "Home", "Welcome"))
        .with_record(record(2, "/about", "About", "Who we are").with_parent(RecordId::new(1)))
        .with_probe_log();
    let engine = engine(store);

    let page = expect_page(handle(&engine, "/about/").await);
    assert_eq!(page.title, "About");
    assert_eq!(page.browser_title, "About | Lectern");
    assert_eq!(page.text, PageText::Single("<p>Who we are</p>".to_string()));
    let crumbs: Vec<_> = page.breadcrumbs.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(crumbs, ["Home", "About"]);
    assert!(page.parameters.is_empty());
    assert_eq!(engine.store().record_lookups(), 1);
}

#[tokio::test]
async fn test_catch_all_captures_whole_path() {
    let store = MemoryStore::new().with_record(record(
        1,
        "/*",
        "Catch all",
        "%%%query parameters *%%%",
    ));
    let engine = engine(store);

    let page = expect_page(handle(&engine, "/a/b/c/").await);
    assert_eq!(page.key, "/*");
    assert_eq!(page.parameters.joined(), "a/b/c");
    assert_eq!(page.text, PageText::Single("a/b/c".to_string()));
}

#[tokio::test]
async fn test_unpublished_needs_preview() {
    let store = MemoryStore::new().with_record(record(1, "/draft", "Draft", "x").with_published(false));
    let engine = engine(store);

    let outcome = handle(&engine, "/draft/").await;
    assert_eq!(outcome, Outcome::Status(RedirectDisposition::NotFound));

    let preview = engine
        .handle(&PageRequest::new("/draft/").with_unpublished(true))
        .await
        .unwrap();
    assert!(matches!(preview, Outcome::Page(_)));
}

#[tokio::test]
async fn test_store_failure_is_an_error() {
    let store = MemoryStore::new();
    store.set_offline(true);
    let engine = engine(store);

    let err = engine.handle(&PageRequest::new("/x")).await.unwrap_err();
    assert!(matches!(err, EngineError::Store(_)));
}

// ============================================================================
// Canonical Form
// ============================================================================

#[tokio::test]
async fn test_require_slash_redirects_extension_request() {
    let store = MemoryStore::new().with_record(record(1, "/docs", "Docs", "x"));
    let engine = engine(store);

    let (status, location) = expect_redirect(handle(&engine, "/docs.html").await);
    assert_eq!(status, 301);
    assert_eq!(location, "https://example.org/docs/");
}

#[tokio::test]
async fn test_canonical_redirect_keeps_query() {
    let store = MemoryStore::new().with_record(
        record(1, "/docs", "Docs", "x").with_canonical(CanonicalPolicy::RequireExtension),
    );
    let engine = engine(store);

    let outcome = engine
        .handle(&PageRequest::new("/docs/").with_query("page=2"))
        .await
        .unwrap();
    let (status, location) = expect_redirect(outcome);
    assert_eq!(status, 301);
    assert_eq!(location, "http://localhost/docs.html?page=2");
}

// ============================================================================
// Redirect Table
// ============================================================================

#[tokio::test]
async fn test_wildcard_redirect_substitutes_parameters() {
    let store = MemoryStore::new().with_redirect(RedirectRule::new(
        "/old/*",
        "/new/*",
        RedirectDisposition::Permanent,
    ));
    let engine = engine(store);

    let (status, location) = expect_redirect(handle(&engine, "/old/foo/bar").await);
    assert_eq!(status, 301);
    assert_eq!(location, "https://example.org/new/foo/bar");
}

#[tokio::test]
async fn test_temporary_rule_uses_same_emission() {
    let store = MemoryStore::new().with_redirect(RedirectRule::new(
        "/promo.html",
        "https://shop.example/sale",
        RedirectDisposition::Temporary,
    ));
    let engine = engine(store);

    let (status, location) = expect_redirect(handle(&engine, "/promo/").await);
    assert_eq!(status, 302);
    assert_eq!(location, "https://shop.example/sale");
}

#[tokio::test]
async fn test_gone_rule_selects_status() {
    let store = MemoryStore::new().with_redirect(RedirectRule::new(
        "/retired",
        "",
        RedirectDisposition::Gone,
    ));
    let engine = engine(store);

    assert_eq!(
        handle(&engine, "/retired/").await,
        Outcome::Status(RedirectDisposition::Gone)
    );
}

#[tokio::test]
async fn test_no_rule_is_not_found() {
    let engine = engine(MemoryStore::new());
    assert_eq!(
        handle(&engine, "/nothing/here").await,
        Outcome::Status(RedirectDisposition::NotFound)
    );
}

// ============================================================================
// Interpretation
// ============================================================================

#[tokio::test]
async fn test_unknown_function_renders_notice() {
    let store = MemoryStore::new().with_record(record(1, "/p", "P", "%%%\nabfrage foo\n%%%"));
    let engine = engine(store);

    let page = expect_page(handle(&engine, "/p/").await);
    let text = page.text.main("text");
    assert_eq!(text.matches("directive-error").count(), 1);
    assert!(text.contains("foo"));
}

#[tokio::test]
async fn test_content_redirect_is_temporary() {
    let store = MemoryStore::new().with_record(record(
        1,
        "/moved",
        "Moved",
        "%%%weiterleitung /elsewhere/%%%",
    ));
    let engine = engine(store);

    let (status, location) = expect_redirect(handle(&engine, "/moved/").await);
    assert_eq!(status, 302);
    assert_eq!(location, "https://example.org/elsewhere/");
}

#[tokio::test]
async fn test_missing_table_falls_back_to_redirects() {
    let dir = tempfile::tempdir().unwrap();
    let store = MemoryStore::new()
        .with_record(record(1, "/tables/*", "Tables", "%%%table%%%"))
        .with_redirect(RedirectRule::new(
            "/tables/*",
            "/catalog/*",
            RedirectDisposition::Permanent,
        ));
    let interpreter = Interpreter::default().with_tables(JsonTableDefinitions::new(dir.path()));
    let engine = Engine::with_interpreter(Arc::new(store), EngineSettings::default(), interpreter);

    let (status, location) = expect_redirect(handle(&engine, "/tables/unknown/").await);
    assert_eq!(status, 301);
    assert_eq!(location, "https://example.org/catalog/unknown");
}

#[tokio::test]
async fn test_table_from_captured_parameter() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("prices.json"),
        r#"{"title": "Prices", "columns": ["Item"], "rows": [["Tea"]]}"#,
    )
    .unwrap();
    let store = MemoryStore::new()
        .with_record(record(1, "/", "Home", ""))
        .with_record(record(2, "/tables/*", "Tables", "%%%table%%%").with_parent(RecordId::new(1)));
    let interpreter = Interpreter::default().with_tables(JsonTableDefinitions::new(dir.path()));
    let engine = Engine::with_interpreter(Arc::new(store), EngineSettings::default(), interpreter);

    let page = expect_page(handle(&engine, "/tables/prices/").await);
    assert_eq!(page.title, "Prices");
    assert!(page.suppress_heading);
    let crumbs: Vec<_> = page.breadcrumbs.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(crumbs, ["Home", "Prices"]);
}

fn shout(call: &FunctionCall<'_>) -> Result<Fragment, FunctionError> {
    Ok(Fragment::text(call.args.join(" ").to_uppercase()).with_author("robot"))
}

#[tokio::test]
async fn test_custom_function_and_stitching() {
    let store = MemoryStore::new().with_record(
        record(1, "/hello", "Hello", "Say %%%query shout hi there%%% please").with_author("alice"),
    );
    let registry = FunctionRegistry::with_builtins().with("shout", shout);
    let engine = Engine::with_interpreter(
        Arc::new(store),
        EngineSettings::default(),
        Interpreter::new(registry),
    );

    let page = expect_page(handle(&engine, "/hello/").await);
    assert_eq!(page.text.main("text"), "<p>Say HI THERE please</p>");
    assert_eq!(page.authors, ["robot"]);
}

#[tokio::test]
async fn test_hierarchy_cycle_is_fatal() {
    let store = MemoryStore::new()
        .with_record(record(1, "/a", "A", "x").with_parent(RecordId::new(2)))
        .with_record(record(2, "/b", "B", "y").with_parent(RecordId::new(1)));
    let engine = engine(store);

    let err = engine.handle(&PageRequest::new("/a/")).await.unwrap_err();
    assert!(matches!(err, EngineError::HierarchyCycle { .. }));
}

// ============================================================================
// SQLite
// ============================================================================

#[tokio::test]
async fn test_seeded_sqlite_store() {
    let store = SqliteStore::in_memory().unwrap();
    store.init_schema().unwrap();
    let seed = SeedDocument::from_json_str(
        r#"{
            "records": [
                { "id": 1, "key": "/", "title": "Home", "content": "Welcome" },
                { "id": 2, "key": "/blog/*", "parent_id": 1, "title": "Blog",
                  "content": "Post %%%query parameters *%%%" }
            ],
            "redirects": [
                { "source": "/news/*", "target": "/blog/*", "code": 301 }
            ]
        }"#,
    )
    .unwrap();
    seed.apply(&store).await.unwrap();

    let engine = Engine::new(Arc::new(store), EngineSettings::default());

    let outcome = engine.handle(&PageRequest::new("/blog/2024/hello/")).await.unwrap();
    let page = expect_page(outcome);
    assert_eq!(page.text.main("text"), "<p>Post 2024/hello</p>");

    let outcome = engine.handle(&PageRequest::new("/news/2024/hello/")).await.unwrap();
    let (status, location) = expect_redirect(outcome);
    assert_eq!(status, 301);
    assert_eq!(location, "http://localhost/blog/2024/hello");

    let outcome = engine.handle(&PageRequest::new("/")).await.unwrap();
    assert_eq!(expect_page(outcome).browser_title, "Home");
}
