use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Generics, Ident, ImplGenerics, Path, Type, TypeGenerics};

use super::TypeAttributes;

/// Information shared by every impl generated for one type.
pub(crate) struct MappedMeta<'a> {
    plaid_mapper_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
    /// Field types mentioning a type parameter.
    bound_types: Vec<Type>,
}

impl<'a> MappedMeta<'a> {
    pub fn new(attrs: TypeAttributes, ident: &'a Ident, generics: &'a Generics) -> syn::Result<Self> {
        if let Some(lifetime) = generics.lifetimes().next() {
            return Err(syn::Error::new_spanned(
                lifetime,
                "mapped types are `'static`, lifetime parameters are not supported",
            ));
        }
        Ok(Self {
            plaid_mapper_path: crate::path::plaid_mapper(),
            attrs,
            ident,
            generics,
            bound_types: Vec::new(),
        })
    }

    #[inline]
    pub fn plaid_mapper_path(&self) -> &Path {
        &self.plaid_mapper_path
    }

    #[inline]
    pub fn macro_utils(&self) -> TokenStream {
        crate::path::macro_utils_(&self.plaid_mapper_path)
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &'a Ident {
        self.ident
    }

    /// Whether the type has type or const parameters.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Records the field types that need `Typed + Blank` bounds.
    pub(super) fn set_field_types<'t>(&mut self, types: impl Iterator<Item = &'t Type>) {
        let params: Vec<&Ident> = self.generics.type_params().map(|param| &param.ident).collect();
        if params.is_empty() {
            return;
        }
        for ty in types {
            if mentions_any(&params, ty.to_token_stream()) && !self.bound_types.contains(ty) {
                self.bound_types.push(ty.clone());
            }
        }
    }

    /// `impl_generics`, `ty_generics` and a where clause.
    ///
    /// Generic types get `Self: Any + Send + Sync`, and every field type
    /// mentioning a type parameter gets `Typed + Blank`.
    pub fn split_generics(&self) -> (ImplGenerics<'a>, TypeGenerics<'a>, TokenStream) {
        let macro_utils = self.macro_utils();
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let mut clause = quote! { where };
        if self.generics.type_params().next().is_some() {
            clause.extend(quote! {
                Self: ::core::any::Any + ::core::marker::Send + ::core::marker::Sync,
            });
        }
        if let Some(where_clause) = where_clause {
            let predicates = where_clause.predicates.iter();
            clause.extend(quote! { #(#predicates,)* });
        }
        for ty in &self.bound_types {
            clause.extend(quote! { #ty: #macro_utils::Typed + #macro_utils::Blank, });
        }

        (impl_generics, ty_generics, clause)
    }
}

fn mentions_any(idents: &[&Ident], tokens: TokenStream) -> bool {
    tokens.into_iter().any(|tree| match tree {
        proc_macro2::TokenTree::Ident(ident) => idents.contains(&&ident),
        proc_macro2::TokenTree::Group(group) => mentions_any(idents, group.stream()),
        _ => false,
    })
}
