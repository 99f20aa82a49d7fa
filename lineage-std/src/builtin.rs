//! Declarations for std scalar types.
//!
//! Std types cannot implement [`Lineage`](lineage_core::Lineage) from here,
//! so they are declared through [`TypeDecl`] against a small set of marker
//! contracts:
//!
//! ```text
//! dyn Numeric
//! ├── dyn Integral   i8 .. i128, u8 .. u128, isize, usize
//! └── dyn Floating   f32, f64
//! dyn Textual        String, str, char
//! ```
//!
//! `Vec<u8>` and `[u8]` are declared as arrays so structural fallbacks can
//! pick them up.

use lineage_core::{GraphError, TypeDecl, TypeGraph};

/// Any number.
pub trait Numeric {}

/// Integer types.
pub trait Integral: Numeric {}

/// Floating-point types.
pub trait Floating: Numeric {}

/// Character data.
pub trait Textual {}

macro_rules! builtin_types {
    ($contract:ident: $($ty:ty),+ $(,)?) => {
        $(
            impl $contract for $ty {}
        )+
    };
}

builtin_types!(Numeric: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);
builtin_types!(Integral: i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
builtin_types!(Floating: f32, f64);
builtin_types!(Textual: String, str, char);

fn integral<T: 'static>() -> TypeDecl {
    TypeDecl::class::<T>().implements::<dyn Integral>()
}

fn floating<T: 'static>() -> TypeDecl {
    TypeDecl::class::<T>().implements::<dyn Floating>()
}

fn textual<T: ?Sized + 'static>() -> TypeDecl {
    TypeDecl::class::<T>().implements::<dyn Textual>()
}

/// Every built-in declaration, contracts first.
pub fn builtin_declarations() -> Vec<TypeDecl> {
    vec![
        TypeDecl::contract::<dyn Numeric>(),
        TypeDecl::contract::<dyn Integral>().implements::<dyn Numeric>(),
        TypeDecl::contract::<dyn Floating>().implements::<dyn Numeric>(),
        TypeDecl::contract::<dyn Textual>(),
        integral::<i8>(),
        integral::<i16>(),
        integral::<i32>(),
        integral::<i64>(),
        integral::<i128>(),
        integral::<isize>(),
        integral::<u8>(),
        integral::<u16>(),
        integral::<u32>(),
        integral::<u64>(),
        integral::<u128>(),
        integral::<usize>(),
        floating::<f32>(),
        floating::<f64>(),
        textual::<String>(),
        textual::<str>(),
        textual::<char>(),
        TypeDecl::array::<Vec<u8>>(),
        TypeDecl::array::<[u8]>(),
    ]
}

/// Declare the built-ins in `graph`.
pub fn declare_builtins(graph: &TypeGraph) -> Result<(), GraphError> {
    graph.declare_all(builtin_declarations())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lineage_core::{TypeAncestry, TypeKey, TypeKind, Hierarchy};
    use std::sync::Arc;

    #[test]
    fn test_integer_climbs_to_numeric() {
        let graph = Arc::new(TypeGraph::new());
        declare_builtins(&graph).unwrap();

        let ancestry = TypeAncestry::new(graph.clone());
        assert_eq!(
            ancestry.ancestry_of(TypeKey::of::<u16>(), true).as_slice(),
            &[
                TypeKey::of::<u16>(),
                TypeKey::of::<dyn Integral>(),
                TypeKey::of::<dyn Numeric>(),
            ]
        );
        assert_eq!(graph.kind(TypeKey::of::<[u8]>()), Some(TypeKind::Array));
    }

    #[test]
    fn test_declared_twice_fails() {
        let graph = TypeGraph::new();
        declare_builtins(&graph).unwrap();
        assert!(declare_builtins(&graph).is_err());
    }
}
