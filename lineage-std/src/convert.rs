//! # Text Conversion
//!
//! Value-to-text conversion dispatched on the runtime type of the value.
//!
//! Behaviors receive the value as `&dyn Any`. A behavior registered for a
//! contract (say `dyn Numeric`) is handed the concrete value, so it must
//! recognise every concrete type it intends to serve.
//!
//! # Example
//!
//! ```rust,ignore
//! let conversions = TextConversions::new(registry);
//! conversions.registry().register_type::<u32>(display::<u32>())?;
//!
//! assert_eq!(conversions.convert(&7u32)?, Some("7".to_string()));
//! assert_eq!(conversions.convert(&Unknown)?, None);
//! ```

use crate::error::BehaviorError;
use lineage_core::{BoxError, DispatchRegistry, ResolveError, TypeKey};
use std::{any::Any, fmt::Display, sync::Arc};

/// Converts a value to text.
pub trait ToText: Send + Sync {
    /// Convert `value`; an error means the behavior failed.
    fn to_text(&self, value: &dyn Any) -> Result<String, BoxError>;
}

impl<F> ToText for F
where
    F: Fn(&dyn Any) -> Result<String, BoxError> + Send + Sync,
{
    fn to_text(&self, value: &dyn Any) -> Result<String, BoxError> {
        (self)(value)
    }
}

/// Shared text behavior.
pub type TextBehavior = Arc<dyn ToText>;

/// Behavior that formats `T` with [`Display`].
pub fn display<T: Display + 'static>() -> TextBehavior {
    Arc::new(|value: &dyn Any| -> Result<String, BoxError> {
        value
            .downcast_ref::<T>()
            .map(ToString::to_string)
            .ok_or_else(|| BoxError::from(format!("expected `{}`", std::any::type_name::<T>())))
    })
}

/// Text conversion over a [`DispatchRegistry`].
pub struct TextConversions {
    registry: DispatchRegistry<TextBehavior>,
}

impl TextConversions {
    /// Wrap a (usually bootstrapped) registry.
    pub fn new(registry: DispatchRegistry<TextBehavior>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &DispatchRegistry<TextBehavior> {
        &self.registry
    }

    /// Convert `value`, or `Ok(None)` when no behavior applies.
    pub fn convert<T: Any>(&self, value: &T) -> Result<Option<String>, BehaviorError> {
        self.convert_keyed(TypeKey::of::<T>(), value)
    }

    /// Convert an erased value, or `Ok(None)` when no behavior applies.
    pub fn convert_dyn(&self, value: &dyn Any) -> Result<Option<String>, BehaviorError> {
        self.convert_keyed(TypeKey::of_any(value), value)
    }

    /// Convert `value`, treating a missing behavior as an error.
    pub fn convert_strict<T: Any>(&self, value: &T) -> Result<String, BehaviorError> {
        let ty = TypeKey::of::<T>();
        self.convert_keyed(ty, value)?
            .ok_or_else(|| ResolveError::NotFound(ty).into())
    }

    fn convert_keyed(&self, ty: TypeKey, value: &dyn Any) -> Result<Option<String>, BehaviorError> {
        let Some(behavior) = self.registry.resolve_fuzzy(ty) else {
            return Ok(None);
        };
        behavior.to_text(value).map(Some).map_err(|source| {
            #[cfg(feature = "tracing")]
            tracing::warn!(ty = %ty, error = %source, "text conversion failed");
            BehaviorError::Failed { ty, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{Integral, declare_builtins};
    use lineage_core::TypeGraph;

    struct Opaque;

    fn conversions() -> TextConversions {
        let graph = Arc::new(TypeGraph::new());
        declare_builtins(&graph).unwrap();
        TextConversions::new(DispatchRegistry::from_hierarchy(graph))
    }

    fn integral_text() -> TextBehavior {
        Arc::new(|value: &dyn Any| -> Result<String, BoxError> {
            if let Some(v) = value.downcast_ref::<i64>() {
                Ok(format!("int:{v}"))
            } else if let Some(v) = value.downcast_ref::<u8>() {
                Ok(format!("int:{v}"))
            } else {
                Err("unsupported integral".into())
            }
        })
    }

    #[test]
    fn test_display_behavior() {
        let conversions = conversions();
        conversions
            .registry()
            .register_type::<f64>(display::<f64>())
            .unwrap();
        assert_eq!(conversions.convert(&1.5f64).unwrap(), Some("1.5".to_string()));
    }

    #[test]
    fn test_contract_behavior_serves_subtypes() {
        let conversions = conversions();
        conversions
            .registry()
            .register_type::<dyn Integral>(integral_text())
            .unwrap();

        assert_eq!(conversions.convert(&9i64).unwrap(), Some("int:9".to_string()));
        assert_eq!(conversions.convert_dyn(&3u8).unwrap(), Some("int:3".to_string()));
    }

    #[test]
    fn test_behavior_failure_is_reported() {
        let conversions = conversions();
        conversions
            .registry()
            .register_type::<dyn Integral>(integral_text())
            .unwrap();

        let err = conversions.convert(&5u32).unwrap_err();
        assert!(matches!(err, BehaviorError::Failed { ty, .. } if ty == TypeKey::of::<u32>()));
    }

    #[test]
    fn test_permissive_and_strict_miss() {
        let conversions = conversions();
        assert_eq!(conversions.convert(&Opaque).unwrap(), None);
        assert!(matches!(
            conversions.convert_strict(&Opaque),
            Err(BehaviorError::Unresolved(ResolveError::NotFound(_)))
        ));
    }
}
