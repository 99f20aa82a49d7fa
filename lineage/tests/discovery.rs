//! Registrars discovered at link time.

#![cfg(feature = "inventory")]

use lineage::{
    DispatchRegistry, Phase, Registrar, RegistryConfig, RegistryError, registrar_collection,
    submit_registrar, testing::Tag,
};

mod common;
use common::{Circle, Figure, Ring, Shape, ancestry, key};

registrar_collection!(ShapePlugins, Tag);

struct ContractPlugin;

impl Registrar<Tag> for ContractPlugin {
    fn register(&self, registry: &DispatchRegistry<Tag>) -> Result<(), RegistryError> {
        registry.register_type::<dyn Shape>(Tag("shape"))
    }

    fn name(&self) -> &'static str {
        "contract"
    }

    fn priority(&self) -> i32 {
        10
    }
}

struct CirclePlugin;

impl Registrar<Tag> for CirclePlugin {
    fn register(&self, registry: &DispatchRegistry<Tag>) -> Result<(), RegistryError> {
        registry.register_type::<Circle>(Tag("circle"))
    }

    fn name(&self) -> &'static str {
        "circle"
    }
}

submit_registrar!(ShapePlugins, ContractPlugin);
submit_registrar!(ShapePlugins, CirclePlugin);

#[test]
fn test_discovered_registrars_sorted() {
    let loader = ShapePlugins::loader();
    assert_eq!(loader.names(), vec!["circle", "contract"]);
}

#[test]
fn test_discovered_bootstrap() {
    let registry =
        DispatchRegistry::bootstrap(ancestry(), RegistryConfig::new(), &ShapePlugins::loader())
            .unwrap();

    assert_eq!(registry.phase(), Phase::Ready);
    assert_eq!(registry.resolve_fuzzy(key::<Ring>()), Some(Tag("circle")));
    assert_eq!(registry.resolve_exact(key::<dyn Shape>()), Some(Tag("shape")));
    // Circle ran first, so Figure holds its propagated copy.
    assert_eq!(registry.resolve_exact(key::<Figure>()), Some(Tag("circle")));
}
