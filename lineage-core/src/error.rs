//! Error types for Lineage.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`LineageError`] - Top-level error type for all Lineage operations
//! - [`GraphError`] - Invalid type declarations
//! - [`RegistryError`] - Registration failures
//! - [`ResolveError`] - Strict lookups that found nothing
//! - [`BootstrapError`] - Registry population failures

use crate::{bootstrap::Phase, key::TypeKey};
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Lineage operations.
#[derive(Error, Debug)]
pub enum LineageError {
    /// A type declaration was rejected.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// A registration was rejected.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// A strict lookup failed.
    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    /// Bootstrap aborted.
    #[error("bootstrap error: {0}")]
    Bootstrap(#[from] BootstrapError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised while declaring the type hierarchy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The type was already declared.
    #[error("type `{0}` is already declared")]
    AlreadyDeclared(TypeKey),

    /// The declaration names itself as a supertype or contract.
    #[error("type `{0}` cannot be its own ancestor")]
    SelfReference(TypeKey),

    /// A contract declared a class supertype.
    #[error("contract `{0}` cannot extend a supertype; list super-contracts with `implements`")]
    ContractWithSupertype(TypeKey),

    /// The named supertype is a declared contract.
    #[error("type `{ty}` extends `{supertype}`, which is a contract")]
    SupertypeIsContract {
        /// The type being declared.
        ty: TypeKey,
        /// The offending supertype.
        supertype: TypeKey,
    },
}

/// Errors that can occur when registering a behavior.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The type already has a direct registration.
    #[error("type `{0}` already has a direct registration")]
    Duplicate(TypeKey),

    /// The registry no longer accepts registrations.
    #[error("registry is sealed; cannot register `{0}`")]
    Sealed(TypeKey),

    /// The type has no direct registration to remove.
    #[error("type `{0}` has no direct registration")]
    NotRegistered(TypeKey),

    /// Removal is not enabled for this registry.
    #[error("removal is disabled for this registry")]
    RemovalDisabled,
}

/// Errors reported by strict lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Neither the type nor any of its ancestors is registered.
    #[error("no behavior registered for `{0}` or any of its ancestors")]
    NotFound(TypeKey),
}

/// Errors that abort registry population.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Population was attempted on a registry that left `Uninitialized`.
    #[error("registry already left the uninitialized phase (currently {0:?})")]
    AlreadyPopulated(Phase),

    /// A registrar failed; the registry is now `Failed`.
    #[error("registrar `{registrar}` failed")]
    Registrar {
        /// Name of the failing registrar.
        registrar: &'static str,
        /// The registration error it returned.
        #[source]
        source: RegistryError,
    },
}

// Convenience conversions
impl From<BoxError> for LineageError {
    fn from(err: BoxError) -> Self {
        LineageError::Custom(err)
    }
}
