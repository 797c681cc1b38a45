use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields};

pub fn ser(ast: &DeriveInput, data: &DataEnum) -> TokenStream {
    let name = &ast.ident;
    let generics = crate::bounded(&ast.generics, quote!(::msgpack::Ser));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let arms = data.variants.iter().enumerate().map(|(index, variant)| {
        let index = index as u64;
        let ident = &variant.ident;
        let binds = crate::bindings(&variant.fields);
        let len = binds.len() + 1;

        let pattern = match &variant.fields {
            // unit variants are just their index
            Fields::Unit => return quote! { #name::#ident => e.put_u64(#index), },
            Fields::Unnamed(_) => quote! { #name::#ident(#(ref #binds),*) },
            Fields::Named(_) => {
                let members = crate::members(&variant.fields);
                quote! { #name::#ident { #(#members: ref #binds),* } }
            }
        };

        quote! {
            #pattern => {
                e.put_array_len(#len)?;
                e.put_u64(#index)?;
                #(::msgpack::Ser::ser(#binds, e)?;)*
                Ok(())
            }
        }
    });

    quote! {
        impl #impl_generics ::msgpack::Ser for #name #ty_generics #where_clause {
            fn ser<__W: ::std::io::Write>(
                &self,
                e: &mut ::msgpack::Encoder<__W>,
            ) -> ::std::result::Result<(), ::msgpack::Error> {
                match *self {
                    #(#arms)*
                }
            }
        }
    }
}
