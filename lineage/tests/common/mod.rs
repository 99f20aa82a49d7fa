#![allow(dead_code)]

use lineage::{DispatchRegistry, RegistryConfig, TypeAncestry, TypeDecl, TypeGraph, TypeKey};
use std::sync::Arc;

// ============================================================================
// Shapes
// ============================================================================
//
// dyn Drawable <- dyn Shape
// dyn Named
//
// Figure: Named
// ├── Circle: Shape
// │   └── Ring
// └── Square: Shape

pub trait Drawable {}
pub trait Shape: Drawable {}
pub trait Named {}

pub struct Figure;
pub struct Circle;
pub struct Ring;
pub struct Square;

/// Never declared.
pub struct Stray;

pub fn shape_declarations() -> Vec<TypeDecl> {
    vec![
        TypeDecl::contract::<dyn Drawable>(),
        TypeDecl::contract::<dyn Shape>().implements::<dyn Drawable>(),
        TypeDecl::contract::<dyn Named>(),
        TypeDecl::class::<Figure>().implements::<dyn Named>(),
        TypeDecl::class::<Circle>()
            .extends::<Figure>()
            .implements::<dyn Shape>(),
        TypeDecl::class::<Ring>().extends::<Circle>(),
        TypeDecl::class::<Square>()
            .extends::<Figure>()
            .implements::<dyn Shape>(),
    ]
}

// ============================================================================
// Diamond
// ============================================================================
//
//        dyn Top
//       /       \
//  dyn Left   dyn Right
//       \      /    \
//        Leaf ----> Base

pub trait Top {}
pub trait Left: Top {}
pub trait Right: Top {}

pub struct Base;
pub struct Leaf;

pub fn diamond_declarations() -> Vec<TypeDecl> {
    vec![
        TypeDecl::contract::<dyn Top>(),
        TypeDecl::contract::<dyn Left>().implements::<dyn Top>(),
        TypeDecl::contract::<dyn Right>().implements::<dyn Top>(),
        TypeDecl::class::<Base>().implements::<dyn Right>(),
        TypeDecl::class::<Leaf>()
            .extends::<Base>()
            .implements::<dyn Left>()
            .implements::<dyn Right>(),
    ]
}

// ============================================================================
// Builders
// ============================================================================

pub fn key<T: ?Sized + 'static>() -> TypeKey {
    TypeKey::of::<T>()
}

pub fn graph() -> Arc<TypeGraph> {
    let graph = TypeGraph::new();
    graph.declare_all(shape_declarations()).unwrap();
    graph.declare_all(diamond_declarations()).unwrap();
    Arc::new(graph)
}

pub fn ancestry() -> Arc<TypeAncestry> {
    Arc::new(TypeAncestry::new(graph()))
}

pub fn registry<B>() -> DispatchRegistry<B>
where
    B: Clone + Send + Sync + 'static,
{
    DispatchRegistry::new(ancestry())
}

pub fn registry_with<B>(config: RegistryConfig) -> DispatchRegistry<B>
where
    B: Clone + Send + Sync + 'static,
{
    DispatchRegistry::with_config(ancestry(), config)
}
