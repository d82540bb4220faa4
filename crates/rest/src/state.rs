//! Application state shared by all handlers.

use std::sync::Arc;

use lectern_engine::Engine;
use lectern_engine::directive::{Interpreter, JsonTableDefinitions};
use lectern_persistence::core::RecordStore;
use tracing::info;

use crate::config::ServerConfig;

/// Shared application state.
///
/// Holds the content engine (which owns the record store) and the server
/// configuration.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use lectern_persistence::backends::memory::MemoryStore;
/// use lectern_persistence::core::RecordStore;
/// use lectern_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(Arc::new(MemoryStore::new()), ServerConfig::for_testing());
/// assert_eq!(state.store().backend_name(), "memory");
/// ```
pub struct AppState<S> {
    /// The content engine.
    engine: Engine<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: RecordStore> AppState<S> {
    /// Creates state with an engine built from `config`.
    ///
    /// When `config.table_dir` is set the interpreter gets a JSON table
    /// subsystem rooted there.
    pub fn new(store: Arc<S>, config: ServerConfig) -> Self {
        let mut interpreter = Interpreter::default();
        if let Some(dir) = &config.table_dir {
            info!(dir = %dir.display(), "Embedded tables enabled");
            interpreter = interpreter.with_tables(JsonTableDefinitions::new(dir.clone()));
        }
        let engine = Engine::with_interpreter(store, config.engine_settings(), interpreter);
        Self::with_engine(engine, config)
    }

    /// Creates state around an already configured engine.
    pub fn with_engine(engine: Engine<S>, config: ServerConfig) -> Self {
        Self {
            engine,
            config: Arc::new(config),
        }
    }

    /// Returns the content engine.
    pub fn engine(&self) -> &Engine<S> {
        &self.engine
    }

    /// Returns the record store.
    pub fn store(&self) -> &S {
        self.engine.store()
    }

    /// Returns the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the origin relative redirects resolve against.
    pub fn origin(&self) -> &str {
        self.config.origin()
    }

    /// Returns the configured preview token, if any.
    pub fn preview_token(&self) -> Option<&str> {
        self.config.preview_token.as_deref()
    }
}
