//! Consumer-level errors.

use lineage_core::{BoxError, ResolveError, TypeKey};
use thiserror::Error;

/// Errors raised by the consumers in this crate.
///
/// A failing behavior is reported as [`BehaviorError::Failed`] and never
/// swallowed; a lookup miss only becomes an error in strict calls.
#[derive(Error, Debug)]
pub enum BehaviorError {
    /// No behavior is registered for the type or any ancestor.
    #[error(transparent)]
    Unresolved(#[from] ResolveError),

    /// The resolved behavior itself failed.
    #[error("behavior for `{ty}` failed")]
    Failed {
        /// Type of the value being processed.
        ty: TypeKey,
        /// The behavior's own error.
        #[source]
        source: BoxError,
    },
}
