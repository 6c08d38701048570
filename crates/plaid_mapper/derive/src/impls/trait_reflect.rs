use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappedMeta;

/// Generate implementation code for `Reflect`.
///
/// `reflect_ref` and `reflect_mut` are the bodies of the two view methods.
pub(crate) fn impl_trait_reflect(meta: &MappedMeta, reflect_ref: TokenStream, reflect_mut: TokenStream) -> TokenStream {
    let macro_utils = meta.macro_utils();
    let ident = meta.ident();
    let (impl_generics, ty_generics, where_clause) = meta.split_generics();

    quote! {
        impl #impl_generics #macro_utils::Reflect for #ident #ty_generics #where_clause {
            #[inline]
            fn reflect_type_info(&self) -> &'static #macro_utils::TypeInfo {
                <Self as #macro_utils::Typed>::type_info()
            }

            #[inline]
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            #[inline]
            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            #[inline]
            fn into_any(self: #macro_utils::Box<Self>) -> #macro_utils::Box<dyn ::core::any::Any> {
                self
            }

            #[inline]
            fn as_reflect(&self) -> &dyn #macro_utils::Reflect {
                self
            }

            #[inline]
            fn as_reflect_mut(&mut self) -> &mut dyn #macro_utils::Reflect {
                self
            }

            #[inline]
            fn into_reflect(self: #macro_utils::Box<Self>) -> #macro_utils::Box<dyn #macro_utils::Reflect> {
                self
            }

            fn assign(
                &mut self,
                value: #macro_utils::Box<dyn #macro_utils::Reflect>,
            ) -> ::core::result::Result<(), #macro_utils::Box<dyn #macro_utils::Reflect>> {
                *self = value.take::<Self>()?;
                ::core::result::Result::Ok(())
            }

            #[inline]
            fn reflect_ref(&self) -> #macro_utils::ReflectRef<'_> {
                #reflect_ref
            }

            #[inline]
            fn reflect_mut(&mut self) -> #macro_utils::ReflectMut<'_> {
                #reflect_mut
            }
        }
    }
}
