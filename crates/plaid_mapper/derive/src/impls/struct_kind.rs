use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{MappedStruct, StructField};

/// Implements `Typed`, `Reflect` and `Blank` for a struct mapped as an object.
pub(crate) fn match_struct(mapped: &MappedStruct) -> TokenStream {
    let meta = mapped.meta();
    let macro_utils = meta.macro_utils();

    let members = mapped.members().map(|field| member_tokens(&macro_utils, field));
    let with_base = mapped.base().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let name = field.name();
        quote! {
            .with_base(#macro_utils::BaseLink::new(
                #name,
                <#ty as #macro_utils::Typed>::type_info,
                |derived| {
                    derived
                        .downcast_ref::<Self>()
                        .map(|derived| <#ty as #macro_utils::Reflect>::as_reflect(&derived.#ident))
                },
                |derived| {
                    derived
                        .downcast_mut::<Self>()
                        .map(|derived| <#ty as #macro_utils::Reflect>::as_reflect_mut(&mut derived.#ident))
                },
            ))
        }
    });

    let attrs = meta.attrs();
    let with_markers = attrs.markers_expression(&macro_utils);
    let with_resolutions = (!attrs.resolutions.is_empty()).then(|| {
        let resolutions = attrs.resolutions.iter().map(|r| r.get_expression(&macro_utils));
        quote!(.with_resolutions(#macro_utils::vec![#(#resolutions),*]))
    });
    let with_hooks = (!attrs.hooks.is_empty()).then(|| {
        let hooks = attrs.hooks.iter().map(|h| h.get_expression(&macro_utils));
        quote!(.with_hooks(#macro_utils::vec![#(#hooks),*]))
    });

    let type_info_tokens = quote! {
        #macro_utils::TypeInfo::new(
            #macro_utils::Type::of::<Self>(),
            #macro_utils::TypeKind::Object(
                #macro_utils::ObjectInfo::new(#macro_utils::vec![#(#members),*])
                    #with_base
                    .with_marker(#macro_utils::Participant)
                    #with_markers
                    #with_resolutions
                    #with_hooks
            ),
        )
        .with_blank(|| {
            <Self as #macro_utils::Reflect>::into_reflect(
                #macro_utils::Box::new(<Self as #macro_utils::Blank>::blank())
            )
        })
    };

    let blank_fields = mapped.fields().iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        if field.attrs.skip.is_some() {
            quote!(#ident: ::core::default::Default::default())
        } else {
            quote!(#ident: <#ty as #macro_utils::Blank>::blank())
        }
    });
    let blank_body = quote! {
        Self { #(#blank_fields),* }
    };

    let typed_impl = super::impl_trait_typed(meta, type_info_tokens);
    let reflect_impl = super::impl_trait_reflect(
        meta,
        quote!(#macro_utils::ReflectRef::Object(self)),
        quote!(#macro_utils::ReflectMut::Object(self)),
    );
    let blank_impl = super::impl_trait_blank(meta, blank_body);
    let auto_register = super::get_auto_register_impl(meta);

    quote! {
        #typed_impl

        #reflect_impl

        #blank_impl

        #auto_register
    }
}

/// `MemberInfo::new::<Self, T>("name")` with markers and accessors.
fn member_tokens(macro_utils: &TokenStream, field: &StructField) -> TokenStream {
    let ident = field.ident;
    let ty = field.ty;
    let name = field.name();

    // The member cache selects members by their role, so every member gets one.
    let role = match &field.attrs.role {
        Some(role) => role.get_expression(macro_utils),
        None => quote!(#macro_utils::Role::element()),
    };
    let with_required = field.attrs.required.map(|null_check| {
        quote!(.with_marker(#macro_utils::Required { null_check: #null_check }))
    });
    let with_custom = field.attrs.custom_markers.get_expression();

    quote! {
        #macro_utils::MemberInfo::new::<Self, #ty>(#name)
            .with_marker(#role)
            #with_required
            #with_custom
            .with_getter(|owner| {
                owner
                    .downcast_ref::<Self>()
                    .map(|owner| <#ty as #macro_utils::Reflect>::as_reflect(&owner.#ident))
            })
            .with_getter_mut(|owner| {
                owner
                    .downcast_mut::<Self>()
                    .map(|owner| <#ty as #macro_utils::Reflect>::as_reflect_mut(&mut owner.#ident))
            })
            .with_setter(|owner, value| {
                let #macro_utils::Some(owner) = owner.downcast_mut::<Self>() else {
                    return #macro_utils::Err(value);
                };
                owner.#ident = value.take::<#ty>()?;
                #macro_utils::Ok(())
            })
    }
}
