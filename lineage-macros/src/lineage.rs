//! `#[derive(Lineage)]`.
//!
//! Recognised keys inside `#[lineage(...)]`, which may be repeated:
//!
//! - `extends = Path` - the immediate supertype (at most one)
//! - `implements(dyn A, dyn B)` - directly declared contracts, in order
//! - `array` - declare the type as array-like instead of a class

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, DeriveInput, GenericParam, Ident, Path, Token, Type, parenthesized,
    parse::{Parse, ParseStream},
    parse_macro_input, parse_quote,
    punctuated::Punctuated,
};

/// Arguments collected from every `#[lineage(...)]` attribute.
#[derive(Default)]
pub(crate) struct LineageArgs {
    pub extends: Option<Path>,
    pub implements: Vec<Type>,
    pub array: bool,
}

impl LineageArgs {
    fn merge(&mut self, other: LineageArgs, attr: &Attribute) -> syn::Result<()> {
        if let Some(extends) = other.extends {
            if self.extends.is_some() {
                return Err(syn::Error::new_spanned(attr, "`extends` may only be given once"));
            }
            self.extends = Some(extends);
        }
        self.implements.extend(other.implements);
        self.array |= other.array;
        Ok(())
    }
}

impl Parse for LineageArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = LineageArgs::default();

        while !input.is_empty() {
            let ident: Ident = input.parse()?;

            match ident.to_string().as_str() {
                "extends" => {
                    input.parse::<Token![=]>()?;
                    if args.extends.is_some() {
                        return Err(syn::Error::new(
                            ident.span(),
                            "`extends` may only be given once",
                        ));
                    }
                    args.extends = Some(input.parse()?);
                }
                "implements" => {
                    let content;
                    parenthesized!(content in input);
                    let contracts = Punctuated::<Type, Token![,]>::parse_terminated(&content)?;
                    args.implements.extend(contracts);
                }
                "array" => {
                    args.array = true;
                }
                other => {
                    return Err(syn::Error::new(
                        ident.span(),
                        format!("unknown lineage attribute: {}", other),
                    ));
                }
            }

            if input.peek(Token![,]) {
                input.parse::<Token![,]>()?;
            }
        }

        Ok(args)
    }
}

/// Implementation of `#[derive(Lineage)]`.
pub fn derive_lineage_impl(input: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(input as DeriveInput);

    let mut args = LineageArgs::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("lineage")) {
        let parsed = match attr.parse_args::<LineageArgs>() {
            Ok(parsed) => parsed,
            Err(err) => return err.to_compile_error().into(),
        };
        if let Err(err) = args.merge(parsed, attr) {
            return err.to_compile_error().into();
        }
    }

    // Declarations are keyed by `TypeId`, so every type parameter must be 'static.
    for param in input.generics.params.iter_mut() {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!('static));
        }
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let constructor = if args.array {
        quote!(array)
    } else {
        quote!(class)
    };
    let extends = args.extends.iter().map(|path| quote!(.extends::<#path>()));
    let implements = args
        .implements
        .iter()
        .map(|contract| quote!(.implements::<#contract>()));

    let expanded = quote! {
        impl #impl_generics ::lineage::Lineage for #name #ty_generics #where_clause {
            fn declaration() -> ::lineage::TypeDecl {
                ::lineage::TypeDecl::#constructor::<Self>()
                    #(#extends)*
                    #(#implements)*
            }
        }
    };

    TokenStream::from(expanded)
}
