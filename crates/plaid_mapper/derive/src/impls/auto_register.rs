use proc_macro2::TokenStream;

use crate::derive_data::MappedMeta;

/// Generate the `inventory` submission for `#[mapping(auto_register)]`.
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(meta: &MappedMeta) -> TokenStream {
    use quote::quote_spanned;

    let Some(span) = meta.attrs().auto_register else {
        return crate::utils::empty();
    };
    // Invalid for generic types.
    if meta.impl_with_generic() {
        return crate::utils::empty();
    }

    let auto_register_ = crate::path::auto_register_(meta.plaid_mapper_path());
    let ident = meta.ident();

    quote_spanned! { span =>
        #auto_register_::inventory::submit! {
            #auto_register_::AutoRegisterFunc(#auto_register_::register_type::<#ident>)
        }
    }
}

/// Generate the `inventory` submission for `#[mapping(auto_register)]`.
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &MappedMeta) -> TokenStream {
    crate::utils::empty()
}
