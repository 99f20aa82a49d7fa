//! # Dispatch Registry
//!
//! A thread-safe map from [`TypeKey`] to a caller-supplied behavior `B`,
//! resolved through the declared type hierarchy.
//!
//! # Registration
//!
//! [`DispatchRegistry::register`] stores a *direct* slot for the type and
//! then fills every vacant slot in the type's ancestry with a *propagated*
//! copy. Occupied slots are never overwritten, so the first writer of an
//! ancestor slot wins and a more specific registration is never replaced.
//! A later direct registration of an ancestor does replace a propagated slot.
//!
//! Propagated slots belong to one [`Hierarchy::generation`]. When the
//! hierarchy changes, the next registration or lookup replays every direct
//! registration in its original order against the new relation, so the table
//! never depends on when a declaration happened.
//!
//! # Resolution
//!
//! - [`resolve_exact`](DispatchRegistry::resolve_exact): one map lookup.
//! - [`resolve_fuzzy`](DispatchRegistry::resolve_fuzzy): exact, then the
//!   ancestry chain in order, then the structural fallback if one is set.
//! - [`resolve_strict`](DispatchRegistry::resolve_strict): fuzzy, with a miss
//!   reported as [`ResolveError::NotFound`].
//!
//! # Locking
//!
//! The slot table sits behind one `RwLock`. `register` and `remove` take it
//! exclusively for the whole lookup + propagate step; lookups share it, and a
//! fuzzy walk happens under a single read guard, so no reader ever sees a
//! partially propagated registration. Ancestry chains are computed before the
//! table lock is taken, except while replaying (on `remove` or after a
//! hierarchy change), where the table lock is held while the ancestry cache
//! lock is briefly acquired; the reverse nesting never happens.

use crate::{
    ancestry::{AncestryChain, TypeAncestry},
    bootstrap::{Phase, PhaseCell},
    config::RegistryConfig,
    error::{RegistryError, ResolveError},
    graph::Hierarchy,
    key::TypeKey,
};
use parking_lot::RwLock;
use std::{
    collections::{HashMap, hash_map::Entry},
    fmt,
    sync::Arc,
};

/// Structural fallback consulted after an exact and fuzzy miss.
pub type Fallback<B> = dyn Fn(TypeKey, &dyn Hierarchy) -> Option<B> + Send + Sync;

/// How a behavior came to be associated with a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Registered explicitly for this type.
    Direct,
    /// Copied into this slot by a descendant's direct registration.
    Propagated {
        /// The type whose registration filled the slot.
        from: TypeKey,
    },
    /// Produced by the structural fallback. Only seen in [`Resolved`].
    Fallback,
}

/// One stored behavior.
#[derive(Debug, Clone)]
pub struct Slot<B> {
    behavior: B,
    origin: Origin,
}

impl<B> Slot<B> {
    /// The stored behavior.
    pub fn behavior(&self) -> &B {
        &self.behavior
    }

    /// How the slot was filled.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Whether this is a direct registration.
    pub fn is_direct(&self) -> bool {
        self.origin == Origin::Direct
    }

    /// Take the behavior out of the slot.
    pub fn into_behavior(self) -> B {
        self.behavior
    }
}

/// Result of a fuzzy lookup with diagnostics.
#[derive(Debug, Clone)]
pub struct Resolved<B> {
    /// The resolved behavior.
    pub behavior: B,
    /// The key whose slot matched (the queried key itself for fallback hits).
    pub matched: TypeKey,
    /// Origin of the matched slot.
    pub origin: Origin,
}

struct Table<B> {
    slots: HashMap<TypeKey, Slot<B>>,
    // Direct registrations in the order they were made.
    order: Vec<TypeKey>,
    // Hierarchy generation the propagated slots were computed against.
    generation: u64,
}

impl<B: Clone> Table<B> {
    fn new(generation: u64) -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
            generation,
        }
    }

    /// Install a direct slot and propagate it. Returns the propagated count.
    fn install(&mut self, ty: TypeKey, behavior: B, ancestors: &AncestryChain) -> usize {
        let mut propagated = 0;
        for &ancestor in ancestors.iter() {
            match self.slots.entry(ancestor) {
                Entry::Vacant(slot) => {
                    slot.insert(Slot {
                        behavior: behavior.clone(),
                        origin: Origin::Propagated { from: ty },
                    });
                    propagated += 1;
                }
                Entry::Occupied(_) => {
                    log_trace!(ty = %ty, ancestor = %ancestor, "ancestor slot occupied; skipped");
                }
            }
        }
        self.slots.insert(
            ty,
            Slot {
                behavior,
                origin: Origin::Direct,
            },
        );
        self.order.push(ty);
        propagated
    }

    /// Rebuild every slot from the direct registrations, optionally leaving
    /// one out. Returns the behavior of the left-out registration.
    fn replay(&mut self, ancestry: &TypeAncestry, without: Option<TypeKey>) -> Option<B> {
        let mut slots = std::mem::take(&mut self.slots);
        let order = std::mem::take(&mut self.order);
        let removed = without
            .and_then(|ty| slots.remove(&ty))
            .map(Slot::into_behavior);

        for key in order.into_iter().filter(|key| Some(*key) != without) {
            if let Some(slot) = slots.remove(&key) {
                let ancestors = ancestry.ancestry_of(key, false);
                self.install(key, slot.behavior, &ancestors);
            }
        }
        removed
    }
}

/// A type-hierarchy-aware, thread-safe dispatch table.
///
/// # Example
///
/// ```rust,ignore
/// let graph = Arc::new(TypeGraph::new());
/// graph.declare(TypeDecl::contract::<dyn Shape>())?;
/// graph.declare(TypeDecl::class::<Circle>().implements::<dyn Shape>())?;
///
/// let registry = DispatchRegistry::from_hierarchy(graph);
/// registry.register_type::<dyn Shape>("shape")?;
/// assert_eq!(registry.resolve_type::<Circle>(), Some("shape"));
/// ```
pub struct DispatchRegistry<B> {
    ancestry: Arc<TypeAncestry>,
    config: RegistryConfig,
    table: RwLock<Table<B>>,
    fallback: Option<Box<Fallback<B>>>,
    pub(crate) phase: PhaseCell,
}

impl<B> DispatchRegistry<B>
where
    B: Clone + Send + Sync + 'static,
{
    /// Create an empty registry over a shared ancestry calculator.
    pub fn new(ancestry: Arc<TypeAncestry>) -> Self {
        Self::with_config(ancestry, RegistryConfig::default())
    }

    /// Create an empty registry with explicit options.
    pub fn with_config(ancestry: Arc<TypeAncestry>, config: RegistryConfig) -> Self {
        let generation = ancestry.hierarchy().generation();
        Self {
            ancestry,
            config,
            table: RwLock::new(Table::new(generation)),
            fallback: None,
            phase: PhaseCell::new(),
        }
    }

    /// Create an empty registry with its own ancestry calculator.
    pub fn from_hierarchy(hierarchy: Arc<dyn Hierarchy>) -> Self {
        Self::new(Arc::new(TypeAncestry::new(hierarchy)))
    }

    /// Install a structural fallback, consulted only when neither the type
    /// nor any ancestor is registered.
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(TypeKey, &dyn Hierarchy) -> Option<B> + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(fallback));
        self
    }

    /// Register `behavior` directly for `ty` and propagate it to every
    /// vacant ancestor slot.
    pub fn register(&self, ty: TypeKey, behavior: B) -> Result<(), RegistryError> {
        let seen = self.generation();
        let mut ancestors = self.ancestry.ancestry_of(ty, false);

        let mut table = self.table.write();
        if !self.accepts_writes() {
            return Err(RegistryError::Sealed(ty));
        }
        if table.slots.get(&ty).is_some_and(Slot::is_direct) {
            return Err(RegistryError::Duplicate(ty));
        }

        let current = self.generation();
        self.refresh(&mut table, current);
        if seen != current {
            ancestors = self.ancestry.ancestry_of(ty, false);
        }

        #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
        let propagated = table.install(ty, behavior, &ancestors);
        log_debug!(
            registry = self.config.label,
            ty = %ty,
            propagated,
            "registered behavior"
        );
        Ok(())
    }

    /// Register `behavior` directly for `T`.
    pub fn register_type<T: ?Sized + 'static>(&self, behavior: B) -> Result<(), RegistryError> {
        self.register(TypeKey::of::<T>(), behavior)
    }

    /// The slot stored for exactly `ty`, direct or propagated.
    pub fn resolve_exact(&self, ty: TypeKey) -> Option<B> {
        self.sync();
        self.table
            .read()
            .slots
            .get(&ty)
            .map(|slot| slot.behavior.clone())
    }

    /// The behavior of `ty` or of its nearest registered ancestor.
    pub fn resolve_fuzzy(&self, ty: TypeKey) -> Option<B> {
        self.resolve_entry(ty).map(|resolved| resolved.behavior)
    }

    /// Fuzzy lookup for `T`.
    pub fn resolve_type<T: ?Sized + 'static>(&self) -> Option<B> {
        self.resolve_fuzzy(TypeKey::of::<T>())
    }

    /// Fuzzy lookup that treats a miss as an error.
    pub fn resolve_strict(&self, ty: TypeKey) -> Result<B, ResolveError> {
        self.resolve_fuzzy(ty).ok_or(ResolveError::NotFound(ty))
    }

    /// Fuzzy lookup reporting which slot matched.
    pub fn resolve_entry(&self, ty: TypeKey) -> Option<Resolved<B>> {
        self.sync();
        if let Some(slot) = self.table.read().slots.get(&ty) {
            return Some(Self::resolved(ty, slot));
        }

        let chain = self.ancestry.ancestry_of(ty, true);
        {
            let table = self.table.read();
            let hit = chain
                .iter()
                .find_map(|key| table.slots.get(key).map(|slot| Self::resolved(*key, slot)));
            if hit.is_some() {
                return hit;
            }
        }

        let fallback = self.fallback.as_ref()?;
        let behavior = fallback(ty, self.ancestry.hierarchy())?;
        log_trace!(registry = self.config.label, ty = %ty, "resolved through fallback");
        Some(Resolved {
            behavior,
            matched: ty,
            origin: Origin::Fallback,
        })
    }

    fn generation(&self) -> u64 {
        self.ancestry.hierarchy().generation()
    }

    fn accepts_writes(&self) -> bool {
        self.phase
            .load()
            .accepts_registration(self.config.allow_late_registration)
    }

    /// Replay the table if it was built against an older hierarchy.
    fn sync(&self) {
        let current = self.generation();
        if self.table.read().generation == current {
            return;
        }
        self.refresh(&mut self.table.write(), current);
    }

    fn refresh(&self, table: &mut Table<B>, current: u64) {
        if table.generation == current {
            return;
        }
        table.replay(&self.ancestry, None);
        log_debug!(
            registry = self.config.label,
            from = table.generation,
            to = current,
            "hierarchy changed; replayed registrations"
        );
        table.generation = current;
    }

    fn resolved(key: TypeKey, slot: &Slot<B>) -> Resolved<B> {
        Resolved {
            behavior: slot.behavior.clone(),
            matched: key,
            origin: slot.origin,
        }
    }

    /// Remove the direct registration for `ty`.
    ///
    /// Every slot is rebuilt by replaying the remaining direct registrations
    /// in their original order, so the table ends up exactly as if `ty` had
    /// never been registered. Requires [`RegistryConfig::allow_removal`] and a
    /// registry that still accepts registration.
    pub fn remove(&self, ty: TypeKey) -> Result<B, RegistryError> {
        if !self.config.allow_removal {
            return Err(RegistryError::RemovalDisabled);
        }

        let mut table = self.table.write();
        if !self.accepts_writes() {
            return Err(RegistryError::Sealed(ty));
        }
        if !table.order.contains(&ty) {
            return Err(RegistryError::NotRegistered(ty));
        }

        let current = self.generation();
        let removed = table
            .replay(&self.ancestry, Some(ty))
            .ok_or(RegistryError::NotRegistered(ty))?;
        table.generation = current;

        log_debug!(registry = self.config.label, ty = %ty, "removed registration");
        Ok(removed)
    }

    /// Whether `ty` has a direct registration.
    pub fn is_registered(&self, ty: TypeKey) -> bool {
        self.table
            .read()
            .slots
            .get(&ty)
            .is_some_and(Slot::is_direct)
    }

    /// Snapshot of the direct registrations, in registration order.
    pub fn direct_entries(&self) -> Vec<(TypeKey, B)> {
        let table = self.table.read();
        table
            .order
            .iter()
            .filter_map(|key| table.slots.get(key).map(|slot| (*key, slot.behavior.clone())))
            .collect()
    }

    /// Snapshot of every slot, direct and propagated.
    pub fn entries(&self) -> Vec<(TypeKey, Slot<B>)> {
        self.sync();
        self.table
            .read()
            .slots
            .iter()
            .map(|(key, slot)| (*key, slot.clone()))
            .collect()
    }

    /// Number of direct registrations.
    pub fn len(&self) -> usize {
        self.table.read().order.len()
    }

    /// Whether nothing was registered directly.
    pub fn is_empty(&self) -> bool {
        self.table.read().order.is_empty()
    }

    /// Forget the memoized ancestry of `ty`.
    pub fn evict(&self, ty: TypeKey) -> bool {
        self.ancestry.evict(ty)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase.load()
    }

    /// The ancestry calculator.
    pub fn ancestry(&self) -> &Arc<TypeAncestry> {
        &self.ancestry
    }

    /// The registry options.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }
}

impl<B> fmt::Debug for DispatchRegistry<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.read();
        f.debug_struct("DispatchRegistry")
            .field("label", &self.config.label)
            .field("phase", &self.phase.load())
            .field("direct", &table.order)
            .field("slots", &table.slots.len())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}
