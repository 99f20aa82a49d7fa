//! # Hash Strategies
//!
//! Hashing dispatched on the runtime type of the value, with a structural
//! fallback for array-like types.
//!
//! Types declared with [`TypeKind::Array`] that have no registered strategy
//! of their own (and no registered ancestor) are hashed by the array
//! strategy supplied at construction. Every other miss stays a miss.

use crate::error::BehaviorError;
use lineage_core::{BoxError, DispatchRegistry, ResolveError, TypeAncestry, TypeKey, TypeKind};
use std::{
    any::Any,
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
};

/// Hashes a value.
pub trait HashStrategy: Send + Sync {
    /// Hash `value`; an error means the strategy does not support it.
    fn hash_value(&self, value: &dyn Any) -> Result<u64, BoxError>;
}

impl<F> HashStrategy for F
where
    F: Fn(&dyn Any) -> Result<u64, BoxError> + Send + Sync,
{
    fn hash_value(&self, value: &dyn Any) -> Result<u64, BoxError> {
        (self)(value)
    }
}

/// Shared hash behavior.
pub type HashBehavior = Arc<dyn HashStrategy>;

fn finish<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Strategy that hashes `T` with its [`Hash`] impl.
pub fn std_hash<T: Hash + 'static>() -> HashBehavior {
    Arc::new(|value: &dyn Any| -> Result<u64, BoxError> {
        value
            .downcast_ref::<T>()
            .map(finish)
            .ok_or_else(|| BoxError::from(format!("expected `{}`", std::any::type_name::<T>())))
    })
}

/// Strategy for sequences of `E`: `Vec<E>` and `Box<[E]>`.
///
/// Both hash the same for equal contents.
pub fn seq_hash<E: Hash + 'static>() -> HashBehavior {
    Arc::new(|value: &dyn Any| -> Result<u64, BoxError> {
        if let Some(items) = value.downcast_ref::<Vec<E>>() {
            Ok(finish(items.as_slice()))
        } else if let Some(items) = value.downcast_ref::<Box<[E]>>() {
            Ok(finish(&**items))
        } else {
            Err(format!("expected a sequence of `{}`", std::any::type_name::<E>()).into())
        }
    })
}

/// Hashing over a [`DispatchRegistry`] with an array fallback.
pub struct HashStrategies {
    registry: DispatchRegistry<HashBehavior>,
}

impl HashStrategies {
    /// Build an empty registry whose misses on array types fall back to
    /// `array_strategy`.
    pub fn new(ancestry: Arc<TypeAncestry>, array_strategy: HashBehavior) -> Self {
        let registry = DispatchRegistry::new(ancestry).with_fallback(move |ty, hierarchy| {
            (hierarchy.kind(ty) == Some(TypeKind::Array)).then(|| {
                #[cfg(feature = "tracing")]
                tracing::trace!(ty = %ty, "using array hash strategy");
                array_strategy.clone()
            })
        });
        Self { registry }
    }

    /// Wrap an existing registry; no fallback is added.
    pub fn from_registry(registry: DispatchRegistry<HashBehavior>) -> Self {
        Self { registry }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &DispatchRegistry<HashBehavior> {
        &self.registry
    }

    /// The strategy that would hash values of `ty`.
    pub fn strategy_for(&self, ty: TypeKey) -> Option<HashBehavior> {
        self.registry.resolve_fuzzy(ty)
    }

    /// Hash `value`; a missing strategy is an error.
    pub fn hash<T: Any>(&self, value: &T) -> Result<u64, BehaviorError> {
        self.hash_keyed(TypeKey::of::<T>(), value)
    }

    /// Hash an erased value; a missing strategy is an error.
    pub fn hash_dyn(&self, value: &dyn Any) -> Result<u64, BehaviorError> {
        self.hash_keyed(TypeKey::of_any(value), value)
    }

    fn hash_keyed(&self, ty: TypeKey, value: &dyn Any) -> Result<u64, BehaviorError> {
        let strategy = self
            .registry
            .resolve_fuzzy(ty)
            .ok_or(ResolveError::NotFound(ty))?;
        strategy.hash_value(value).map_err(|source| {
            #[cfg(feature = "tracing")]
            tracing::warn!(ty = %ty, error = %source, "hash strategy failed");
            BehaviorError::Failed { ty, source }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{Integral, declare_builtins};
    use lineage_core::{Origin, TypeDecl, TypeGraph};

    struct Tags(Vec<u32>);

    fn ancestry() -> Arc<TypeAncestry> {
        let graph = TypeGraph::new();
        declare_builtins(&graph).unwrap();
        graph.declare(TypeDecl::array::<Vec<u32>>()).unwrap();
        Arc::new(TypeAncestry::new(Arc::new(graph)))
    }

    #[test]
    fn test_registered_strategy() {
        let strategies = HashStrategies::new(ancestry(), seq_hash::<u8>());
        strategies
            .registry()
            .register_type::<String>(std_hash::<String>())
            .unwrap();

        let text = "lineage".to_string();
        assert_eq!(strategies.hash(&text).unwrap(), finish(&text));
    }

    #[test]
    fn test_array_fallback() {
        let strategies = HashStrategies::new(ancestry(), seq_hash::<u8>());

        let bytes = vec![1u8, 2, 3];
        assert_eq!(strategies.hash(&bytes).unwrap(), finish(&[1u8, 2, 3][..]));
        assert_eq!(
            strategies
                .registry()
                .resolve_entry(TypeKey::of::<Vec<u8>>())
                .map(|entry| entry.origin),
            Some(Origin::Fallback)
        );

        // Declared as an array, but the fallback strategy only knows bytes.
        assert!(matches!(
            strategies.hash(&vec![1u32]),
            Err(BehaviorError::Failed { .. })
        ));
    }

    #[test]
    fn test_fallback_skips_non_arrays() {
        let strategies = HashStrategies::new(ancestry(), seq_hash::<u8>());
        assert!(strategies.strategy_for(TypeKey::of::<Tags>()).is_none());
        assert!(matches!(
            strategies.hash(&Tags(vec![1])),
            Err(BehaviorError::Unresolved(ResolveError::NotFound(_)))
        ));
    }

    #[test]
    fn test_contract_strategy_serves_integers() {
        let strategies = HashStrategies::new(ancestry(), seq_hash::<u8>());
        strategies
            .registry()
            .register_type::<dyn Integral>(Arc::new(|value: &dyn Any| -> Result<u64, BoxError> {
                value
                    .downcast_ref::<u64>()
                    .copied()
                    .ok_or_else(|| "not a u64".into())
            }))
            .unwrap();

        assert_eq!(strategies.hash_dyn(&42u64).unwrap(), 42);
    }

    #[test]
    fn test_from_registry_has_no_fallback() {
        let registry = DispatchRegistry::new(ancestry());
        let strategies = HashStrategies::from_registry(registry);
        assert!(strategies.strategy_for(TypeKey::of::<Vec<u8>>()).is_none());
    }
}
