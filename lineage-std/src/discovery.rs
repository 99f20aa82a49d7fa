//! Link-time registrar discovery via `inventory`.
//!
//! A host declares one collection per behavior type; plugins anywhere in
//! the final binary submit registrars to it, and the host builds its
//! [`BootstrapLoader`](lineage_core::BootstrapLoader) from whatever was linked in.
//!
//! # Example
//!
//! ```rust,ignore
//! lineage_std::registrar_collection!(pub TextPlugins, TextBehavior);
//!
//! struct NumericText;
//! impl Registrar<TextBehavior> for NumericText { /* ... */ }
//!
//! lineage_std::submit_registrar!(TextPlugins, NumericText);
//!
//! let registry = DispatchRegistry::bootstrap(ancestry, config, &TextPlugins::loader())?;
//! ```

/// Declare a discovery collection for registrars of one behavior type.
///
/// Expands to a newtype over `&'static dyn Registrar<B>` that `inventory`
/// collects, plus a `loader()` constructor returning every submitted
/// registrar sorted by `(priority, name)`.
#[macro_export]
macro_rules! registrar_collection {
    ($(#[$meta:meta])* $vis:vis $name:ident, $behavior:ty $(,)?) => {
        $(#[$meta])*
        $vis struct $name(pub &'static (dyn $crate::lineage_core::Registrar<$behavior> + 'static));

        $crate::inventory::collect!($name);

        impl $name {
            /// Loader over every registrar linked into the binary.
            #[allow(dead_code)]
            $vis fn loader() -> $crate::lineage_core::BootstrapLoader<$behavior> {
                let mut loader = $crate::lineage_core::BootstrapLoader::new();
                for entry in $crate::inventory::iter::<$name> {
                    loader.push_static(entry.0);
                }
                loader.sort_by_priority();
                loader
            }
        }
    };
}

/// Submit a registrar to a collection declared with
/// [`registrar_collection!`].
///
/// `$registrar` must be a constant expression.
#[macro_export]
macro_rules! submit_registrar {
    ($collection:path, $registrar:expr $(,)?) => {
        $crate::inventory::submit! {
            $collection(&$registrar)
        }
    };
}

#[cfg(test)]
mod tests {
    use lineage_core::{DispatchRegistry, Registrar, RegistryError, TypeGraph};

    struct First;
    struct Second;

    impl Registrar<u8> for First {
        fn register(&self, registry: &DispatchRegistry<u8>) -> Result<(), RegistryError> {
            registry.register_type::<u16>(1)
        }
        fn name(&self) -> &'static str {
            "first"
        }
    }

    impl Registrar<u8> for Second {
        fn register(&self, registry: &DispatchRegistry<u8>) -> Result<(), RegistryError> {
            registry.register_type::<u32>(2)
        }
        fn name(&self) -> &'static str {
            "second"
        }
        fn priority(&self) -> i32 {
            -1
        }
    }

    registrar_collection!(Discovered, u8);
    submit_registrar!(Discovered, First);
    submit_registrar!(Discovered, Second);

    #[test]
    fn test_loader_collects_submissions() {
        let loader = Discovered::loader();
        assert_eq!(loader.names(), vec!["second", "first"]);

        let registry = DispatchRegistry::from_hierarchy(std::sync::Arc::new(TypeGraph::new()));
        loader.populate(&registry).unwrap();
        assert_eq!(registry.resolve_type::<u16>(), Some(1));
        assert_eq!(registry.resolve_type::<u32>(), Some(2));
    }
}
