use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput, Fields};

pub fn de(ast: &DeriveInput, data: &DataStruct) -> TokenStream {
    let name = &ast.ident;
    let name_str = name.to_string();
    let generics = crate::bounded(&ast.generics, quote!(::msgpack::De));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let len = data.fields.len();
    let construct = construct(quote!(#name), &data.fields);

    quote! {
        impl #impl_generics ::msgpack::De for #name #ty_generics #where_clause {
            fn de<__R: ::std::io::BufRead>(
                d: &mut ::msgpack::Decoder<__R>,
            ) -> ::std::result::Result<Self, ::msgpack::Error> {
                d.read_record_len(#name_str, #len)?;
                d.nested(|__d| Ok(#construct))
            }
        }
    }
}

/// Builds `path` from fields decoded in declaration order.
pub fn construct(path: TokenStream, fields: &Fields) -> TokenStream {
    let members = crate::members(fields);
    let field = quote!(::msgpack::De::de(__d)?);
    let values = members.iter().map(|_| &field);

    match fields {
        Fields::Named(_) => quote! { #path { #(#members: #values),* } },
        Fields::Unnamed(_) => quote! { #path(#(#values),*) },
        Fields::Unit => path,
    }
}
