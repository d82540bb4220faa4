//! Request orchestration.

use std::sync::Arc;

use lectern_persistence::core::RecordStore;
use lectern_persistence::types::RedirectDisposition;
use tracing::{debug, info};

use crate::breadcrumb::build_trail;
use crate::canonical;
use crate::directive::{Interpretation, Interpreter};
use crate::error::{EngineResult, InterpretError};
use crate::page::{Page, assemble};
use crate::path::RequestPath;
use crate::redirect::{RedirectEmission, resolve_redirect};
use crate::resolver::{ResolvedRecord, resolve};
use crate::settings::EngineSettings;

/// Everything the engine needs to know about a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Raw request path.
    pub path: String,
    /// Raw query string without the `?`.
    pub query: Option<String>,
    /// Scheme and authority relative redirects resolve against.
    pub origin: String,
    /// Whether unpublished records may be served.
    pub include_unpublished: bool,
}

impl PageRequest {
    /// Creates a request for `path` with a localhost origin.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
            origin: "http://localhost".to_string(),
            include_unpublished: false,
        }
    }

    /// Sets the query string.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Sets the origin.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Allows unpublished records.
    pub fn with_unpublished(mut self, include: bool) -> Self {
        self.include_unpublished = include;
        self
    }
}

/// What to send back for a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Render this page.
    Page(Box<Page>),
    /// Send a redirect.
    Redirect(RedirectEmission),
    /// Send the static response for this disposition.
    Status(RedirectDisposition),
}

/// The content engine.
#[derive(Debug)]
pub struct Engine<S> {
    store: Arc<S>,
    interpreter: Interpreter,
    settings: Arc<EngineSettings>,
}

impl<S> Clone for Engine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            interpreter: self.interpreter.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<S: RecordStore> Engine<S> {
    /// Creates an engine with the built-in functions.
    pub fn new(store: Arc<S>, settings: EngineSettings) -> Self {
        Self::with_interpreter(store, settings, Interpreter::default())
    }

    /// Creates an engine with a custom interpreter.
    pub fn with_interpreter(
        store: Arc<S>,
        settings: EngineSettings,
        interpreter: Interpreter,
    ) -> Self {
        info!(
            backend = store.backend_name(),
            extension = %settings.extension,
            "Content engine initialized"
        );
        Self {
            store,
            interpreter,
            settings: Arc::new(settings),
        }
    }

    /// Returns the record store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the interpreter.
    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Handles one request.
    pub async fn handle(&self, request: &PageRequest) -> EngineResult<Outcome> {
        let path = RequestPath::parse(&request.path, &self.settings.extension);
        debug!(path = %path, suffix = ?path.suffix(), "Handling request");

        let resolved = resolve(self.store.as_ref(), &path, request.include_unpublished).await?;
        if let Some(ResolvedRecord { record, parameters }) = resolved {
            if let Some(target) = canonical::enforce(
                &path,
                record.canonical(),
                &self.settings.extension,
                request.query.as_deref(),
            ) {
                debug!(key = %record.key(), target = %target, "Canonical redirect");
                return Ok(Outcome::Redirect(RedirectEmission::new(
                    RedirectDisposition::Permanent,
                    &target,
                    &request.origin,
                )));
            }

            match self
                .interpreter
                .interpret(record.content(), &parameters, record.id())
            {
                Ok(Interpretation::Page(assembly)) => {
                    let ancestors = self.store.load_ancestors(record.id()).await?;
                    let trail = build_trail(&ancestors, record.id())?;
                    let page =
                        assemble(&record, parameters, assembly, trail, &path, &self.settings);
                    return Ok(Outcome::Page(Box::new(page)));
                }
                Ok(Interpretation::Redirect(target)) => {
                    return Ok(Outcome::Redirect(RedirectEmission::new(
                        RedirectDisposition::Temporary,
                        &target,
                        &request.origin,
                    )));
                }
                Err(InterpretError::TableDefinitionMissing { definition }) => {
                    debug!(
                        key = %record.key(),
                        definition = ?definition,
                        "Table definition missing, treating as unresolved"
                    );
                }
            }
        }

        let decision = resolve_redirect(
            self.store.as_ref(),
            &path,
            &self.settings.extension,
            RedirectDisposition::NotFound,
            self.settings.max_redirect_probes,
        )
        .await?;

        let disposition = decision.disposition();
        match decision.target() {
            Some(target) if disposition.is_redirect() => Ok(Outcome::Redirect(
                RedirectEmission::new(disposition, &target, &request.origin),
            )),
            _ => Ok(Outcome::Status(disposition)),
        }
    }
}
