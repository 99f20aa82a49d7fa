//! # lineage-std
//!
//! Standard consumers and helpers for the Lineage dispatch registry.
//!
//! This crate provides:
//! - **Built-in declarations**: std scalars under [`builtin`] marker contracts
//! - **Text conversion**: [`TextConversions`]
//! - **Hashing**: [`HashStrategies`] with an array fallback
//! - **Discovery**: [`registrar_collection!`] / [`submit_registrar!`] (feature `inventory`)
//! - **Testing**: [`testing`] registrars and fixtures

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core types
pub use lineage_core;

// Modules
pub mod builtin;
pub mod convert;
#[cfg(feature = "inventory")]
pub mod discovery;
pub mod error;
pub mod hash;
pub mod testing;

pub use convert::{TextBehavior, TextConversions, ToText, display};
pub use error::BehaviorError;
pub use hash::{HashBehavior, HashStrategies, HashStrategy, seq_hash, std_hash};

#[cfg(feature = "inventory")]
pub use inventory;
