use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappedMeta;

/// Generate implementation code for `Typed`.
///
/// `type_info_tokens` builds the `TypeInfo`; it runs once per type, or once
/// per instantiation for generic types.
pub(crate) fn impl_trait_typed(meta: &MappedMeta, type_info_tokens: TokenStream) -> TokenStream {
    let macro_utils = meta.macro_utils();

    let inner_cell_tokens = if meta.impl_with_generic() {
        quote! {
            static CELL: #macro_utils::GenericTypeInfoCell = #macro_utils::GenericTypeInfoCell::new();
            CELL.get_or_insert::<Self>(|| {
                #type_info_tokens
            })
        }
    } else {
        quote! {
            static CELL: #macro_utils::NonGenericTypeInfoCell = #macro_utils::NonGenericTypeInfoCell::new();
            CELL.get_or_init(|| {
                #type_info_tokens
            })
        }
    };

    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #macro_utils::Typed for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #macro_utils::TypeInfo {
                #inner_cell_tokens
            }
        }
    }
}
