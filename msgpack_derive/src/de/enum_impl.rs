use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataEnum, DeriveInput};

pub fn de(ast: &DeriveInput, data: &DataEnum) -> TokenStream {
    let name = &ast.ident;
    let name_str = name.to_string();
    let generics = crate::bounded(&ast.generics, quote!(::msgpack::De));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let arms = data.variants.iter().enumerate().map(|(index, variant)| {
        let index = index as u64;
        let ident = &variant.ident;
        let variant_str = format!("{}::{}", name, ident);
        let len = variant.fields.len();
        let construct = super::struct_impl::construct(quote!(#name::#ident), &variant.fields);

        quote! {
            #index => {
                ::msgpack::encoding::de::check_field_count(#variant_str, #len, found)?;
                Ok(#construct)
            }
        }
    });

    quote! {
        impl #impl_generics ::msgpack::De for #name #ty_generics #where_clause {
            fn de<__R: ::std::io::BufRead>(
                d: &mut ::msgpack::Decoder<__R>,
            ) -> ::std::result::Result<Self, ::msgpack::Error> {
                let (index, found) = d.read_variant(#name_str)?;
                d.nested(|__d| match index {
                    #(#arms)*
                    _ => Err(::msgpack::Error::UnknownVariant {
                        record: #name_str,
                        index,
                    }),
                })
            }
        }
    }
}
