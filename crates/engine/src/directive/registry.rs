//! Directive function registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use lectern_persistence::types::RecordId;

use crate::error::FunctionError;
use crate::resolver::CapturedParameters;

use super::fragment::Fragment;

/// Arguments passed to a directive function.
#[derive(Debug, Clone, Copy)]
pub struct FunctionCall<'a> {
    /// Name the function was invoked under.
    pub name: &'a str,
    /// Arguments after quote reassembly and wildcard expansion.
    pub args: &'a [String],
    /// Parameters captured by the URL resolver.
    pub parameters: &'a CapturedParameters,
    /// The record being rendered.
    pub record_id: RecordId,
}

/// A function callable from a `query` directive.
pub trait DirectiveFunction: Send + Sync {
    /// Runs the function.
    fn call(&self, call: &FunctionCall<'_>) -> Result<Fragment, FunctionError>;
}

impl<F> DirectiveFunction for F
where
    F: Fn(&FunctionCall<'_>) -> Result<Fragment, FunctionError> + Send + Sync,
{
    fn call(&self, call: &FunctionCall<'_>) -> Result<Fragment, FunctionError> {
        self(call)
    }
}

/// Name to function table. Names are matched case-insensitively.
#[derive(Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, Arc<dyn DirectiveFunction>>,
}

impl FunctionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        super::builtins::register_builtins(&mut registry);
        registry
    }

    /// Registers `function` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: &str, function: F)
    where
        F: DirectiveFunction + 'static,
    {
        self.functions.insert(name.to_lowercase(), Arc::new(function));
    }

    /// Registers `function` and returns the registry, builder style.
    pub fn with<F>(mut self, name: &str, function: F) -> Self
    where
        F: DirectiveFunction + 'static,
    {
        self.register(name, function);
        self
    }

    /// Looks up a function.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn DirectiveFunction>> {
        self.functions.get(&name.to_lowercase())
    }

    /// Returns true if a function is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
