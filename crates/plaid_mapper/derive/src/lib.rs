//! See [`Mapped`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

static MAPPING_ATTRIBUTE_NAME: &str = "mapping";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Mapping Derivation
///
/// `#[derive(Mapped)]` implements `Typed`, `Reflect` and `Blank`.
///
/// - Structs with named fields, and unit structs, are mapped as objects.
///   Every field is a member named after it.
/// - Fieldless enums are mapped by variant name. The first variant is the
///   blank value.
///
/// Tuple structs, unions and enums with data are rejected.
///
/// Every non-skipped field type must implement `Typed` and `Blank`; the blank
/// value of the type is built from the blanks of its fields, and skipped
/// fields use `Default`.
///
/// ## Field attributes
///
/// - `attribute`, `element`, `cdata`: the member's role. Each optionally
///   takes `(key = "..", index = N)` to override the lookup key or sequence
///   position. Members without a role are elements.
/// - `list(entry = "..", key = "..", index = N)`: a sequence written as
///   repeated XML children; every option is optional.
/// - `required`, `required(null_check)`: deserialization fails when the
///   member is absent, or also when it is null.
/// - `skip`: not a member.
/// - `base`: the field holds the base type; at most one per type.
/// - `@expr`: attaches a user marker.
///
/// ```rust, ignore
/// #[derive(Mapped)]
/// struct Item {
///     #[mapping(attribute(key = "id"), required)]
///     id: u64,
///     #[mapping(list(entry = "tag"))]
///     tags: Vec<String>,
///     #[mapping(skip)]
///     cached: Option<String>,
/// }
/// ```
///
/// ## Type attributes
///
/// - `resolve(target = T, key = "..", index = N, value = "..")`, repeatable:
///   data carrying `value` under `key` (or at sequence slot `index`)
///   deserializes as `T`, which must derive from this type. Without `value`
///   the type name of `T` is used.
/// - `before_serialize`, `after_serialize` = `method`: called with `&self`.
/// - `before_deserialize`, `after_deserialize` = `method`: called with `&mut self`.
/// - `xml_root = ".."`: the element name as an XML document root.
/// - `auto_register`: collected by `TypeRegistry::auto_register`. Ignored
///   on generic types.
/// - `@expr`: attaches a user marker.
///
/// ```rust, ignore
/// #[derive(Mapped)]
/// #[mapping(resolve(target = Circle, key = "shape", value = "circle"))]
/// #[mapping(after_deserialize = validate)]
/// struct Shape {
///     name: String,
/// }
///
/// #[derive(Mapped)]
/// struct Circle {
///     #[mapping(base)]
///     shape: Shape,
///     radius: f64,
/// }
/// ```
///
/// ## Variant attributes
///
/// - `rename = ".."`: the mapped name of the variant.
#[proc_macro_derive(Mapped, attributes(mapping))]
pub fn derive_mapped(input: TokenStream) -> TokenStream {
    use crate::derive_data::MappedDerive;

    let ast = parse_macro_input!(input as DeriveInput);

    let tokens = match MappedDerive::from_input(&ast) {
        Ok(MappedDerive::Struct(mapped)) => Ok(impls::match_struct(&mapped)),
        Ok(MappedDerive::Enum(mapped)) => impls::match_enum(&mapped),
        Err(err) => Err(err),
    };

    match tokens {
        Ok(tokens) => quote! {
            const _: () = {
                #tokens
            };
        }
        .into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// Submits a type that does not derive [`Mapped`](derive_mapped) to
/// `TypeRegistry::auto_register`.
///
/// Expands to nothing without the `auto_register` feature. The type must be
/// concrete.
///
/// ```rust, ignore
/// impl_auto_register!(Vec<u32>);
/// impl_auto_register!(std::collections::BTreeMap<String, f64>);
/// ```
#[proc_macro]
pub fn impl_auto_register(_input: TokenStream) -> TokenStream {
    #[cfg(not(feature = "auto_register"))]
    return utils::empty().into();

    #[cfg(feature = "auto_register")]
    {
        let ty = parse_macro_input!(_input as syn::Type);
        let auto_register_ = path::auto_register_(&path::plaid_mapper());

        TokenStream::from(quote! {
            const _: () = {
                #auto_register_::inventory::submit! {
                    #auto_register_::AutoRegisterFunc(#auto_register_::register_type::<#ty>)
                }
            };
        })
    }
}
