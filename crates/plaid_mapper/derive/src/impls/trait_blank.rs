use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappedMeta;

/// Generate implementation code for `Blank`.
pub(crate) fn impl_trait_blank(meta: &MappedMeta, blank_body: TokenStream) -> TokenStream {
    let macro_utils = meta.macro_utils();
    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #macro_utils::Blank for #ident #ty_generics #where_clause {
            fn blank() -> Self {
                #blank_body
            }
        }
    }
}
