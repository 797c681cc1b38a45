//! `#[derive(Ser)]` and `#[derive(De)]` for the `msgpack` crate.
//!
//! Structs are written as an array of their fields in declaration order.
//! Enum variants without fields are written as their index; the rest as an
//! array of the index followed by the fields.

extern crate proc_macro;

mod de;
mod ser;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use syn::{
    parse_macro_input, parse_quote, Data, DeriveInput, Fields, GenericParam, Generics, Ident,
    Index, Member,
};

#[proc_macro_derive(Ser)]
pub fn ser_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let out = match &ast.data {
        Data::Struct(sd) => Ok(ser::struct_impl::ser(&ast, sd)),
        Data::Enum(ed) => Ok(ser::enum_impl::ser(&ast, ed)),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "`Ser` cannot be derived for unions",
        )),
    };

    out.unwrap_or_else(syn::Error::into_compile_error).into()
}

#[proc_macro_derive(De)]
pub fn de_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let out = match &ast.data {
        Data::Struct(sd) => Ok(de::struct_impl::de(&ast, sd)),
        Data::Enum(ed) => Ok(de::enum_impl::de(&ast, ed)),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "`De` cannot be derived for unions",
        )),
    };

    out.unwrap_or_else(syn::Error::into_compile_error).into()
}

/// Adds `bound` to every type parameter.
fn bounded(generics: &Generics, bound: TokenStream2) -> Generics {
    let mut generics = generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(#bound));
        }
    }
    generics
}

/// How each field is reached from `self`.
fn members(fields: &Fields) -> Vec<Member> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| match &field.ident {
            Some(ident) => Member::Named(ident.clone()),
            None => Member::Unnamed(Index::from(i)),
        })
        .collect()
}

/// Local names for a variant's fields when it is destructured.
fn bindings(fields: &Fields) -> Vec<Ident> {
    (0..fields.len())
        .map(|i| Ident::new(&format!("__f{}", i), proc_macro2::Span::call_site()))
        .collect()
}
