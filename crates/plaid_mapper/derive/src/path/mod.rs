//! Paths into `plaid_mapper` used by the generated code.
//!
//! Generated code only names items through `__macro_exports`, so the public
//! layout of `plaid_mapper` can change without touching this crate.

use proc_macro2::TokenStream;
use quote::quote;

/// Get the correct access path to the `plaid_mapper` crate.
///
/// 1. For crates that depend on `plaid_mapper`, `::plaid_mapper` is returned.
/// 2. For crates that depend on `plaid`, `::plaid::mapper` is returned.
/// 3. Otherwise `::plaid_mapper` is returned, which may be incorrect.
///
/// Reading the manifest is not free, so the path is computed once per
/// derive and passed around.
pub(crate) fn plaid_mapper() -> syn::Path {
    plaid_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("plaid_mapper"))
}

#[inline(always)]
pub(crate) fn macro_utils_(plaid_mapper_path: &syn::Path) -> TokenStream {
    quote! {
        #plaid_mapper_path::__macro_exports::macro_utils
    }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(plaid_mapper_path: &syn::Path) -> TokenStream {
    quote! {
        #plaid_mapper_path::__macro_exports::auto_register
    }
}
