use proc_macro2::TokenStream;
use quote::quote;
use syn::{DataStruct, DeriveInput};

pub fn ser(ast: &DeriveInput, data: &DataStruct) -> TokenStream {
    let name = &ast.ident;
    let generics = crate::bounded(&ast.generics, quote!(::msgpack::Ser));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let len = data.fields.len();
    let members = crate::members(&data.fields);

    quote! {
        impl #impl_generics ::msgpack::Ser for #name #ty_generics #where_clause {
            fn ser<__W: ::std::io::Write>(
                &self,
                e: &mut ::msgpack::Encoder<__W>,
            ) -> ::std::result::Result<(), ::msgpack::Error> {
                e.put_array_len(#len)?;
                #(::msgpack::Ser::ser(&self.#members, e)?;)*
                Ok(())
            }
        }
    }
}
