use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::MappedEnum;

/// Implements `Typed`, `Reflect` and `Blank` for a fieldless enum.
///
/// The blank value is the first variant.
pub(crate) fn match_enum(mapped: &MappedEnum) -> syn::Result<TokenStream> {
    let meta = mapped.meta();
    let attrs = meta.attrs();
    if let Some(resolve) = attrs.resolutions.first() {
        return Err(syn::Error::new_spanned(&resolve.target, "enums take no part in type resolution"));
    }
    if let Some(hook) = attrs.hooks.first() {
        return Err(syn::Error::new(hook.kind.span(), "enums have no lifecycle hooks"));
    }

    let macro_utils = meta.macro_utils();
    let names = mapped.variants().iter().map(|variant| &variant.name);
    let idents: Vec<_> = mapped.variants().iter().map(|variant| variant.ident).collect();
    let indices: Vec<usize> = (0..idents.len()).collect();
    let first = idents[0];

    let type_info_tokens = quote! {
        #macro_utils::TypeInfo::new(
            #macro_utils::Type::of::<Self>(),
            #macro_utils::TypeKind::Enum(#macro_utils::EnumInfo::new(
                &[#(#names),*],
                |value| {
                    value.downcast_ref::<Self>().map(|value| match value {
                        #(Self::#idents => #indices,)*
                    })
                },
                |index| {
                    let value = match index {
                        #(#indices => Self::#idents,)*
                        _ => return #macro_utils::None,
                    };
                    #macro_utils::Some(<Self as #macro_utils::Reflect>::into_reflect(#macro_utils::Box::new(value)))
                },
            )),
        )
        .with_blank(|| {
            <Self as #macro_utils::Reflect>::into_reflect(
                #macro_utils::Box::new(<Self as #macro_utils::Blank>::blank())
            )
        })
    };

    let typed_impl = super::impl_trait_typed(meta, type_info_tokens);
    let reflect_impl = super::impl_trait_reflect(
        meta,
        quote!(#macro_utils::ReflectRef::Enum(self)),
        quote!(#macro_utils::ReflectMut::Opaque(self)),
    );
    let blank_impl = super::impl_trait_blank(meta, quote!(Self::#first));
    let auto_register = super::get_auto_register_impl(meta);

    Ok(quote! {
        #typed_impl

        #reflect_impl

        #blank_impl

        #auto_register
    })
}
