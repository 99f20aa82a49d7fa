//! Procedural macros for Lineage.
//!
//! - `#[derive(Lineage)]` - Declare a type's supertype and contracts

use proc_macro::TokenStream;

mod lineage;

/// Derive macro for implementing the `Lineage` trait.
///
/// # Example
///
/// ```rust,ignore
/// use lineage::Lineage;
///
/// trait Shape {}
/// trait Drawable {}
///
/// #[derive(Lineage)]
/// #[lineage(implements(dyn Shape, dyn Drawable))]
/// struct Circle;
///
/// #[derive(Lineage)]
/// #[lineage(extends = Circle)]
/// struct Ring;
///
/// graph.declare_type::<Circle>()?;
/// graph.declare_type::<Ring>()?;
/// ```
#[proc_macro_derive(Lineage, attributes(lineage))]
pub fn derive_lineage(input: TokenStream) -> TokenStream {
    lineage::derive_lineage_impl(input)
}
