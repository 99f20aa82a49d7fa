//! # Bootstrap
//!
//! Populates a [`DispatchRegistry`] from an ordered list of [`Registrar`]s
//! before any consumer sees it.
//!
//! Each registry moves through `Uninitialized -> Populating -> Ready`. If a
//! registrar fails, population stops, the registry moves to `Failed` and the
//! error is returned. A failed bootstrap is treated as a fatal startup error:
//! the `Failed` registry rejects all further registration and the caller is
//! expected to abort rather than run with a partial table.
//!
//! # Example
//!
//! ```rust,ignore
//! let loader = BootstrapLoader::new()
//!     .with(NumericConverters)
//!     .with(|registry: &DispatchRegistry<Conv>| registry.register_type::<String>(text()));
//!
//! let registry = DispatchRegistry::bootstrap(ancestry, RegistryConfig::new(), &loader)?;
//! ```

use crate::{
    ancestry::TypeAncestry,
    config::RegistryConfig,
    error::{BootstrapError, RegistryError},
    registry::DispatchRegistry,
};
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU8, Ordering},
    },
};

/// Lifecycle phase of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Created, not yet populated.
    Uninitialized = 0,
    /// A bootstrap sequence is running.
    ///
    /// Writes are not restricted to the running registrars: any caller holding
    /// the registry may register while it is populating, the same as before
    /// bootstrap started.
    Populating = 1,
    /// Bootstrap finished; concurrent reads are expected.
    Ready = 2,
    /// Bootstrap aborted; registration is permanently rejected.
    Failed = 3,
}

impl Phase {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Phase::Uninitialized,
            1 => Phase::Populating,
            2 => Phase::Ready,
            _ => Phase::Failed,
        }
    }

    pub(crate) fn accepts_registration(self, late: bool) -> bool {
        match self {
            Phase::Uninitialized | Phase::Populating => true,
            Phase::Ready => late,
            Phase::Failed => false,
        }
    }
}

pub(crate) struct PhaseCell(AtomicU8);

impl PhaseCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(Phase::Uninitialized as u8))
    }

    pub(crate) fn load(&self) -> Phase {
        Phase::from_u8(self.0.load(Ordering::Acquire))
    }

    fn store(&self, phase: Phase) {
        self.0.store(phase as u8, Ordering::Release);
    }

    fn transition(&self, from: Phase, to: Phase) -> Result<(), Phase> {
        self.0
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(Phase::from_u8)
    }
}

/// A bootstrap-time plugin that adds direct registrations.
///
/// Closures of the form `Fn(&DispatchRegistry<B>) -> Result<(), RegistryError>`
/// are registrars too.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a registrar for behaviors of type `{B}`",
    label = "missing `Registrar<{B}>` implementation",
    note = "Implement `register` to add this plugin's behaviors to the registry."
)]
pub trait Registrar<B>: Send + Sync {
    /// Add this plugin's behaviors to `registry`.
    fn register(&self, registry: &DispatchRegistry<B>) -> Result<(), RegistryError>;

    /// Name used in logs and errors.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Ordering hint for discovered registrars (lower runs first).
    fn priority(&self) -> i32 {
        0
    }
}

impl<B, F> Registrar<B> for F
where
    F: Fn(&DispatchRegistry<B>) -> Result<(), RegistryError> + Send + Sync,
{
    fn register(&self, registry: &DispatchRegistry<B>) -> Result<(), RegistryError> {
        (self)(registry)
    }
}

/// Forwards to a registrar living in static storage.
struct StaticRegistrar<B: 'static>(&'static dyn Registrar<B>);

impl<B: 'static> Registrar<B> for StaticRegistrar<B> {
    fn register(&self, registry: &DispatchRegistry<B>) -> Result<(), RegistryError> {
        self.0.register(registry)
    }

    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn priority(&self) -> i32 {
        self.0.priority()
    }
}

/// Ordered list of registrars that populates a registry exactly once.
pub struct BootstrapLoader<B> {
    registrars: Vec<Arc<dyn Registrar<B>>>,
}

impl<B: 'static> BootstrapLoader<B> {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self {
            registrars: Vec::new(),
        }
    }

    /// Append a registrar.
    pub fn with<R: Registrar<B> + 'static>(mut self, registrar: R) -> Self {
        self.push(registrar);
        self
    }

    /// Append a registrar (mutable version).
    pub fn push<R: Registrar<B> + 'static>(&mut self, registrar: R) {
        self.registrars.push(Arc::new(registrar));
    }

    /// Append a registrar that lives in static storage.
    pub fn push_static(&mut self, registrar: &'static dyn Registrar<B>) {
        self.registrars.push(Arc::new(StaticRegistrar(registrar)));
    }

    /// Append an already shared registrar.
    pub fn push_shared(&mut self, registrar: Arc<dyn Registrar<B>>) {
        self.registrars.push(registrar);
    }

    /// Stable-sort by `(priority, name)`.
    pub fn sort_by_priority(&mut self) {
        self.registrars
            .sort_by(|a, b| (a.priority(), a.name()).cmp(&(b.priority(), b.name())));
    }

    /// Registrar names in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.registrars.iter().map(|r| r.name()).collect()
    }

    /// Number of registrars.
    pub fn len(&self) -> usize {
        self.registrars.len()
    }

    /// Whether the loader has no registrars.
    pub fn is_empty(&self) -> bool {
        self.registrars.is_empty()
    }
}

impl<B> BootstrapLoader<B>
where
    B: Clone + Send + Sync + 'static,
{
    /// Run every registrar once, in order, against `registry`.
    ///
    /// `registry` must be `Uninitialized`. On success it is `Ready`; on the
    /// first registrar error it is `Failed` and no later registrar runs.
    pub fn populate(&self, registry: &DispatchRegistry<B>) -> Result<(), BootstrapError> {
        registry
            .phase
            .transition(Phase::Uninitialized, Phase::Populating)
            .map_err(BootstrapError::AlreadyPopulated)?;
        log_info!(
            registry = registry.config().label,
            registrars = self.len(),
            "bootstrap started"
        );

        for registrar in &self.registrars {
            if let Err(source) = registrar.register(registry) {
                registry.phase.store(Phase::Failed);
                log_error!(
                    registry = registry.config().label,
                    registrar = registrar.name(),
                    error = %source,
                    "bootstrap aborted"
                );
                return Err(BootstrapError::Registrar {
                    registrar: registrar.name(),
                    source,
                });
            }
        }

        registry.phase.store(Phase::Ready);
        log_info!(
            registry = registry.config().label,
            entries = registry.len(),
            "bootstrap finished"
        );
        Ok(())
    }
}

impl<B> Extend<Arc<dyn Registrar<B>>> for BootstrapLoader<B> {
    fn extend<I: IntoIterator<Item = Arc<dyn Registrar<B>>>>(&mut self, registrars: I) {
        self.registrars.extend(registrars);
    }
}

impl<B: 'static> Default for BootstrapLoader<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> fmt::Debug for BootstrapLoader<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.registrars.iter().map(|r| r.name()))
            .finish()
    }
}

impl<B> DispatchRegistry<B>
where
    B: Clone + Send + Sync + 'static,
{
    /// Build a registry and populate it; only a `Ready` registry is returned.
    pub fn bootstrap(
        ancestry: Arc<TypeAncestry>,
        config: RegistryConfig,
        loader: &BootstrapLoader<B>,
    ) -> Result<Self, BootstrapError> {
        let registry = Self::with_config(ancestry, config);
        loader.populate(&registry)?;
        Ok(registry)
    }
}
