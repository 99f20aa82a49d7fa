//! # lineage - Type-Hierarchy-Aware Dispatch
//!
//! `lineage` attaches behaviors (conversion, hashing, serialization, ...) to
//! types that know nothing about them, and resolves the behavior for any
//! type through its declared supertypes and contracts.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lineage::prelude::*;
//!
//! trait Shape {}
//!
//! #[derive(Lineage)]
//! #[lineage(implements(dyn Shape))]
//! struct Circle;
//!
//! let graph = Arc::new(TypeGraph::new());
//! graph.declare(TypeDecl::contract::<dyn Shape>())?;
//! graph.declare_type::<Circle>()?;
//!
//! let loader = BootstrapLoader::new()
//!     .with(|registry: &DispatchRegistry<&'static str>| registry.register_type::<dyn Shape>("shape"));
//! let registry = DispatchRegistry::bootstrap(
//!     Arc::new(TypeAncestry::new(graph)),
//!     RegistryConfig::new(),
//!     &loader,
//! )?;
//!
//! assert_eq!(registry.resolve_type::<Circle>(), Some("shape"));
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use lineage_core::{
    // Ancestry
    AncestryChain,
    // Bootstrap
    BootstrapError,
    BootstrapLoader,
    // Error types
    BoxError,
    // Registry
    DispatchRegistry,
    Fallback,
    GraphError,
    // Hierarchy
    Hierarchy,
    Lineage,
    LineageError,
    Origin,
    Phase,
    Registrar,
    RegistryConfig,
    RegistryError,
    ResolveError,
    Resolved,
    Slot,
    TypeAncestry,
    TypeDecl,
    TypeGraph,
    // Keys
    TypeKey,
    TypeKind,
};

// Consumers
pub use lineage_std::{
    BehaviorError, HashBehavior, HashStrategies, HashStrategy, TextBehavior, TextConversions,
    ToText,
};

/// Declarations for std scalar types.
pub mod builtin {
    pub use lineage_std::builtin::{
        Floating, Integral, Numeric, Textual, builtin_declarations, declare_builtins,
    };
}

/// Text conversion.
pub mod convert {
    pub use lineage_std::convert::{TextBehavior, TextConversions, ToText, display};
}

/// Hash strategies.
pub mod hash {
    pub use lineage_std::hash::{HashBehavior, HashStrategies, HashStrategy, seq_hash, std_hash};
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use lineage_std::testing::*;
}

/// Prelude module - common imports for Lineage.
///
/// # Usage
///
/// ```rust,ignore
/// use lineage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BootstrapLoader, DispatchRegistry, Hierarchy, Lineage, Registrar, RegistryConfig,
        RegistryError, TypeAncestry, TypeDecl, TypeGraph, TypeKey,
    };
    pub use std::sync::Arc;
}

#[cfg(feature = "macros")]
pub use lineage_macros::Lineage;

#[cfg(feature = "inventory")]
pub use inventory;
#[cfg(feature = "inventory")]
pub use lineage_std::{registrar_collection, submit_registrar};
