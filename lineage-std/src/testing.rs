//! Testing utilities for Lineage.
//!
//! This module provides small building blocks for testing registries,
//! registrars and bootstrap sequences.
//!
//! # Features
//!
//! - [`Tag`]: A cheap, comparable behavior value
//! - [`RecordingRegistrar`]: A registrar that registers fixed entries and counts its runs
//! - [`FailingRegistrar`]: A registrar that always fails
//! - [`RunLog`]: Shared record of the order registrars ran in
//! - [`ancestry_over`]: Build an ancestry calculator from declarations

use lineage_core::{
    DispatchRegistry, GraphError, Registrar, RegistryError, TypeAncestry, TypeDecl, TypeGraph,
    TypeKey,
};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Tag
// ============================================================================

/// A behavior that is just a label.
///
/// Handy when a test only cares about *which* registration a lookup hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub &'static str);

impl Tag {
    /// The label.
    pub fn label(&self) -> &'static str {
        self.0
    }
}

// ============================================================================
// Run Log
// ============================================================================

/// Shared, ordered record of registrar runs.
#[derive(Debug, Clone, Default)]
pub struct RunLog {
    names: Arc<Mutex<Vec<&'static str>>>,
}

impl RunLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name.
    pub fn record(&self, name: &'static str) {
        self.names.lock().push(name);
    }

    /// Names recorded so far, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.names.lock().clone()
    }

    /// Clear the log.
    pub fn clear(&self) {
        self.names.lock().clear();
    }
}

// ============================================================================
// Recording Registrar
// ============================================================================

/// A registrar that registers a fixed set of entries and counts its runs.
///
/// # Example
///
/// ```rust,ignore
/// let plugin = RecordingRegistrar::new("numbers")
///     .with_type::<u32>(Tag("u32"))
///     .with_type::<dyn Numeric>(Tag("numeric"));
/// let probe = plugin.clone();
///
/// let registry = DispatchRegistry::bootstrap(ancestry, config, &BootstrapLoader::new().with(plugin))?;
/// assert_eq!(probe.calls(), 1);
/// ```
pub struct RecordingRegistrar<B> {
    name: &'static str,
    priority: i32,
    entries: Vec<(TypeKey, B)>,
    calls: Arc<AtomicUsize>,
    log: Option<RunLog>,
}

impl<B> RecordingRegistrar<B> {
    /// Create a registrar with no entries.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            priority: 0,
            entries: Vec::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            log: None,
        }
    }

    /// Add an entry for `T`.
    pub fn with_type<T: ?Sized + 'static>(self, behavior: B) -> Self {
        self.with_entry(TypeKey::of::<T>(), behavior)
    }

    /// Add an entry for `ty`.
    pub fn with_entry(mut self, ty: TypeKey, behavior: B) -> Self {
        self.entries.push((ty, behavior));
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Record each run into `log`.
    pub fn with_log(mut self, log: RunLog) -> Self {
        self.log = Some(log);
        self
    }

    /// How many times `register` ran (shared across clones).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<B: Clone> Clone for RecordingRegistrar<B> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            priority: self.priority,
            entries: self.entries.clone(),
            calls: self.calls.clone(),
            log: self.log.clone(),
        }
    }
}

impl<B> Registrar<B> for RecordingRegistrar<B>
where
    B: Clone + Send + Sync + 'static,
{
    fn register(&self, registry: &DispatchRegistry<B>) -> Result<(), RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(log) = &self.log {
            log.record(self.name);
        }
        for (ty, behavior) in &self.entries {
            registry.register(*ty, behavior.clone())?;
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

// ============================================================================
// Failing Registrar
// ============================================================================

/// A registrar that fails with a fixed error without registering anything.
#[derive(Debug, Clone)]
pub struct FailingRegistrar {
    name: &'static str,
    error: RegistryError,
}

impl FailingRegistrar {
    /// Create a registrar failing with `error`.
    pub fn new(name: &'static str, error: RegistryError) -> Self {
        Self { name, error }
    }
}

impl<B> Registrar<B> for FailingRegistrar {
    fn register(&self, _registry: &DispatchRegistry<B>) -> Result<(), RegistryError> {
        Err(self.error.clone())
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Declare `decls` in a fresh graph and wrap it in an ancestry calculator.
pub fn ancestry_over<I>(decls: I) -> Result<Arc<TypeAncestry>, GraphError>
where
    I: IntoIterator<Item = TypeDecl>,
{
    let graph = TypeGraph::new();
    graph.declare_all(decls)?;
    Ok(Arc::new(TypeAncestry::new(Arc::new(graph))))
}
