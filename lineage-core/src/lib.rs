//! # lineage-core
//!
//! Core types for the Lineage dispatch registry.
//!
//! Lineage lets unrelated, pre-existing types be given a behavior (how to
//! convert, hash, or serialize them) after the fact, without modifying those
//! types. Behaviors are registered per type and resolved through a declared
//! inheritance/contract graph instead of compile-time polymorphism.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! plugins that only need to declare types and register behaviors.
//!
//! # Three Layers
//!
//! ## Layer 1: Hierarchy ([`Hierarchy`], [`TypeGraph`])
//!
//! The supertype relation. Rust cannot enumerate supertypes at runtime, so
//! each type declares its supertype and contracts, either by hand through
//! [`TypeDecl`] (foreign types) or through the [`Lineage`] trait.
//!
//! ## Layer 2: Ancestry ([`TypeAncestry`])
//!
//! The ordered, duplicate-free closure of a type's ancestors, computed once
//! per type and memoized.
//!
//! ## Layer 3: Dispatch ([`DispatchRegistry`], [`BootstrapLoader`])
//!
//! The behavior table. Registration propagates a behavior to every vacant
//! ancestor slot; lookups walk the ancestry chain on a miss. A
//! [`BootstrapLoader`] runs the host's [`Registrar`]s once before the
//! registry is handed out.
//!
//! # Error Types
//!
//! - [`LineageError`] - Top-level error type
//! - [`RegistryError`] - Registration errors
//! - [`ResolveError`] - Strict lookup misses
//! - [`BootstrapError`] - Population failures
//! - [`GraphError`] - Declaration errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

#[macro_use]
mod log;

mod ancestry;
mod bootstrap;
mod config;
mod error;
mod graph;
mod key;
mod registry;

// Re-exports
pub use ancestry::{AncestryChain, TypeAncestry};
pub use bootstrap::{BootstrapLoader, Phase, Registrar};
pub use config::RegistryConfig;
pub use error::{
    BootstrapError, BoxError, GraphError, LineageError, RegistryError, ResolveError,
};
pub use graph::{Hierarchy, Lineage, TypeDecl, TypeGraph};
pub use key::{TypeKey, TypeKind};
pub use registry::{DispatchRegistry, Fallback, Origin, Resolved, Slot};
