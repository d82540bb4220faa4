//! Lectern content server.

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use lectern_persistence::core::RecordWriter;
use lectern_persistence::seed::SeedDocument;
use lectern_rest::{ServerConfig, create_app_with_config, init_logging};
use tracing::info;

#[cfg(feature = "sqlite")]
use lectern_persistence::backends::sqlite::SqliteStore;

/// Opens the SQLite store named by the configuration and creates its schema.
#[cfg(feature = "sqlite")]
fn create_sqlite_store(config: &ServerConfig) -> anyhow::Result<SqliteStore> {
    let db_path = config.database_url.as_deref().unwrap_or("lectern.db");
    info!(database = %db_path, "Initializing SQLite store");

    let store = if db_path == ":memory:" {
        SqliteStore::in_memory()?
    } else {
        SqliteStore::open(db_path)?
    };
    store.init_schema()?;

    Ok(store)
}

/// Imports the seed document at `path` into `writer`.
async fn import_seed<W: RecordWriter>(writer: &W, path: &Path) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let seed = SeedDocument::from_json_str(&json)
        .with_context(|| format!("invalid seed file {}", path.display()))?;
    let summary = seed.apply(writer).await?;
    info!(
        records = summary.records,
        redirects = summary.redirects,
        seed = %path.display(),
        "Seed imported"
    );
    Ok(())
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        extension = %config.extension,
        preview = config.preview_token.is_some(),
        "Starting Lectern"
    );

    start(config).await
}

/// Starts the server with the SQLite store.
#[cfg(feature = "sqlite")]
async fn start(config: ServerConfig) -> anyhow::Result<()> {
    let store = create_sqlite_store(&config)?;
    if let Some(seed) = &config.seed_file {
        import_seed(&store, seed).await?;
    }
    let app = create_app_with_config(store, config.clone());
    serve(app, &config).await
}

/// Starts the server with an in-memory store when SQLite is not compiled in.
#[cfg(not(feature = "sqlite"))]
async fn start(config: ServerConfig) -> anyhow::Result<()> {
    use lectern_persistence::backends::memory::MemoryStore;

    if config.database_url.as_deref().is_some_and(|url| url != ":memory:") {
        anyhow::bail!(
            "A database file requires the 'sqlite' feature. \
             Build with: cargo build -p lectern --features sqlite"
        );
    }

    tracing::warn!("SQLite support not compiled in, serving from memory");
    let store = MemoryStore::new();
    if let Some(seed) = &config.seed_file {
        import_seed(&store, seed).await?;
    }
    let app = create_app_with_config(store, config.clone());
    serve(app, &config).await
}
