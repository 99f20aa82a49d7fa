//! # Declared Type Hierarchy
//!
//! Rust has no runtime view of supertypes, so the inheritance/contract
//! relation that dispatch walks is declared up front. A [`Hierarchy`] answers
//! "what is the supertype of `T`" and "which contracts does `T` declare";
//! [`TypeGraph`] is the default, thread-safe implementation.
//!
//! Types the host owns can implement [`Lineage`] (usually through
//! `#[derive(Lineage)]`). Foreign types are declared with [`TypeDecl`]
//! directly, which is what makes retroactive dispatch possible.
//!
//! # Example
//!
//! ```rust,ignore
//! let graph = TypeGraph::new();
//! graph.declare(TypeDecl::contract::<dyn Shape>())?;
//! graph.declare(TypeDecl::class::<Circle>().implements::<dyn Shape>())?;
//! ```

use crate::{
    error::GraphError,
    key::{TypeKey, TypeKind},
};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

/// The supertype relation consulted by ancestry computation.
///
/// Implement this directly when the relation already lives elsewhere
/// (generated tables, a plugin manifest). Otherwise use [`TypeGraph`].
pub trait Hierarchy: Send + Sync {
    /// The immediate supertype of `ty`, if any.
    fn supertype(&self, ty: TypeKey) -> Option<TypeKey>;

    /// Contracts declared directly by `ty`, in declaration order.
    ///
    /// For a contract these are its super-contracts.
    fn contracts(&self, ty: TypeKey) -> Vec<TypeKey>;

    /// The declared kind of `ty`, if known.
    fn kind(&self, _ty: TypeKey) -> Option<TypeKind> {
        None
    }

    /// A counter that changes whenever the relation changes.
    ///
    /// Ancestry caches compare it to decide when memoized chains are stale.
    /// Static relations can keep the default.
    fn generation(&self) -> u64 {
        0
    }
}

/// Declaration of one node in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    key: TypeKey,
    kind: TypeKind,
    supertype: Option<TypeKey>,
    contracts: Vec<TypeKey>,
}

impl TypeDecl {
    /// Create a declaration for an arbitrary key.
    pub fn new(key: TypeKey, kind: TypeKind) -> Self {
        Self {
            key,
            kind,
            supertype: None,
            contracts: Vec::new(),
        }
    }

    /// Declare a concrete type.
    pub fn class<T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<T>(), TypeKind::Class)
    }

    /// Declare a contract, usually `dyn SomeTrait`.
    pub fn contract<T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<T>(), TypeKind::Contract)
    }

    /// Declare a structural array type.
    pub fn array<T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<T>(), TypeKind::Array)
    }

    /// Set the immediate supertype.
    pub fn extends<S: ?Sized + 'static>(self) -> Self {
        self.extends_key(TypeKey::of::<S>())
    }

    /// Set the immediate supertype by key.
    pub fn extends_key(mut self, supertype: TypeKey) -> Self {
        self.supertype = Some(supertype);
        self
    }

    /// Append a declared contract (a super-contract when declaring a contract).
    pub fn implements<C: ?Sized + 'static>(self) -> Self {
        self.implements_key(TypeKey::of::<C>())
    }

    /// Append a declared contract by key.
    pub fn implements_key(mut self, contract: TypeKey) -> Self {
        if !self.contracts.contains(&contract) {
            self.contracts.push(contract);
        }
        self
    }

    /// The declared key.
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// The declared kind.
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The immediate supertype.
    pub fn supertype(&self) -> Option<TypeKey> {
        self.supertype
    }

    /// Declared contracts in order.
    pub fn contracts(&self) -> &[TypeKey] {
        &self.contracts
    }
}

/// A type that declares its own place in the hierarchy.
///
/// Usually derived:
///
/// ```rust,ignore
/// #[derive(Lineage)]
/// #[lineage(extends = Shape, implements(dyn Drawable))]
/// struct Circle;
/// ```
pub trait Lineage: 'static {
    /// The declaration registered by [`TypeGraph::declare_type`].
    fn declaration() -> TypeDecl;
}

/// Thread-safe, mutable [`Hierarchy`].
#[derive(Default)]
pub struct TypeGraph {
    nodes: RwLock<HashMap<TypeKey, TypeDecl>>,
    generation: AtomicU64,
}

impl TypeGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration.
    ///
    /// Each key may be declared once. The supertype and contracts do not
    /// need to be declared first; undeclared ancestors simply end the walk.
    pub fn declare(&self, decl: TypeDecl) -> Result<(), GraphError> {
        let key = decl.key;
        if decl.supertype == Some(key) || decl.contracts.contains(&key) {
            return Err(GraphError::SelfReference(key));
        }
        if decl.kind == TypeKind::Contract && decl.supertype.is_some() {
            return Err(GraphError::ContractWithSupertype(key));
        }

        let mut nodes = self.nodes.write();
        if nodes.contains_key(&key) {
            return Err(GraphError::AlreadyDeclared(key));
        }
        if let Some(supertype) = decl.supertype {
            if nodes.get(&supertype).map(TypeDecl::kind) == Some(TypeKind::Contract) {
                return Err(GraphError::SupertypeIsContract { ty: key, supertype });
            }
        }

        log_trace!(ty = %key, kind = ?decl.kind, "declared type");
        nodes.insert(key, decl);
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    /// Declare a type through its [`Lineage`] implementation.
    pub fn declare_type<T: Lineage>(&self) -> Result<(), GraphError> {
        self.declare(T::declaration())
    }

    /// Declare several types, stopping at the first error.
    pub fn declare_all<I>(&self, decls: I) -> Result<(), GraphError>
    where
        I: IntoIterator<Item = TypeDecl>,
    {
        decls.into_iter().try_for_each(|decl| self.declare(decl))
    }

    /// Remove a declaration, e.g. from a module-unload hook.
    pub fn undeclare(&self, key: TypeKey) -> Option<TypeDecl> {
        let removed = self.nodes.write().remove(&key);
        if removed.is_some() {
            log_debug!(ty = %key, "undeclared type");
            self.generation.fetch_add(1, Ordering::AcqRel);
        }
        removed
    }

    /// The declaration for `key`.
    pub fn get(&self, key: TypeKey) -> Option<TypeDecl> {
        self.nodes.read().get(&key).cloned()
    }

    /// Whether `key` is declared.
    pub fn contains(&self, key: TypeKey) -> bool {
        self.nodes.read().contains_key(&key)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    /// Whether the graph has no declarations.
    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    /// Snapshot of every declaration.
    pub fn declarations(&self) -> Vec<TypeDecl> {
        self.nodes.read().values().cloned().collect()
    }
}

impl Hierarchy for TypeGraph {
    fn supertype(&self, ty: TypeKey) -> Option<TypeKey> {
        self.nodes.read().get(&ty).and_then(TypeDecl::supertype)
    }

    fn contracts(&self, ty: TypeKey) -> Vec<TypeKey> {
        self.nodes
            .read()
            .get(&ty)
            .map(|decl| decl.contracts.clone())
            .unwrap_or_default()
    }

    fn kind(&self, ty: TypeKey) -> Option<TypeKind> {
        self.nodes.read().get(&ty).map(TypeDecl::kind)
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Shape {}
    trait Drawable {}
    struct Circle;
    struct Blob;

    #[test]
    fn test_declare_and_query() {
        let graph = TypeGraph::new();
        graph.declare(TypeDecl::contract::<dyn Shape>()).unwrap();
        graph
            .declare(
                TypeDecl::class::<Circle>()
                    .extends::<Blob>()
                    .implements::<dyn Shape>()
                    .implements::<dyn Drawable>(),
            )
            .unwrap();

        let circle = TypeKey::of::<Circle>();
        assert_eq!(graph.supertype(circle), Some(TypeKey::of::<Blob>()));
        assert_eq!(
            graph.contracts(circle),
            vec![TypeKey::of::<dyn Shape>(), TypeKey::of::<dyn Drawable>()]
        );
        assert_eq!(graph.kind(circle), Some(TypeKind::Class));
        assert_eq!(graph.kind(TypeKey::of::<Blob>()), None);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let graph = TypeGraph::new();
        graph.declare(TypeDecl::class::<Circle>()).unwrap();
        let err = graph.declare(TypeDecl::class::<Circle>()).unwrap_err();
        assert_eq!(err, GraphError::AlreadyDeclared(TypeKey::of::<Circle>()));
    }

    #[test]
    fn test_invalid_declarations() {
        let graph = TypeGraph::new();
        assert!(matches!(
            graph.declare(TypeDecl::class::<Circle>().extends::<Circle>()),
            Err(GraphError::SelfReference(_))
        ));
        assert!(matches!(
            graph.declare(TypeDecl::contract::<dyn Shape>().extends::<Blob>()),
            Err(GraphError::ContractWithSupertype(_))
        ));

        graph.declare(TypeDecl::contract::<dyn Shape>()).unwrap();
        assert!(matches!(
            graph.declare(TypeDecl::class::<Circle>().extends::<dyn Shape>()),
            Err(GraphError::SupertypeIsContract { .. })
        ));
        assert!(!graph.is_empty());
        assert!(!graph.contains(TypeKey::of::<Circle>()));
    }

    #[test]
    fn test_generation_tracks_changes() {
        let graph = TypeGraph::new();
        let start = graph.generation();
        graph.declare(TypeDecl::class::<Circle>()).unwrap();
        let declared = graph.generation();
        assert!(declared > start);

        assert!(graph.undeclare(TypeKey::of::<Blob>()).is_none());
        assert_eq!(graph.generation(), declared);

        assert!(graph.undeclare(TypeKey::of::<Circle>()).is_some());
        assert!(graph.generation() > declared);
    }

    #[test]
    fn test_implements_ignores_repeats() {
        let decl = TypeDecl::class::<Circle>()
            .implements::<dyn Shape>()
            .implements::<dyn Shape>();
        assert_eq!(decl.contracts().len(), 1);
    }
}
