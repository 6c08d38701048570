//! Parsing of `#[mapping(...)]` attributes.

// -----------------------------------------------------------------------------
// Modules

mod custom_markers;
mod field_attributes;
mod type_attributes;
mod variant_attributes;

// -----------------------------------------------------------------------------
// Internal API

use custom_markers::CustomMarkers;

pub(crate) use field_attributes::{FieldAttributes, FieldRole, RoleKind};
pub(crate) use type_attributes::{HookAttribute, ResolveAttribute, TypeAttributes};
pub(crate) use variant_attributes::VariantAttributes;

use syn::parse::ParseStream;
use syn::{Attribute, LitInt, LitStr, Token};

/// Calls `f` for each comma separated entry of every `#[mapping(...)]` in `attrs`.
pub(crate) fn for_each_entry(
    attrs: &[Attribute],
    mut f: impl FnMut(ParseStream) -> syn::Result<()>,
) -> syn::Result<()> {
    for attr in attrs {
        if !attr.path().is_ident(crate::MAPPING_ATTRIBUTE_NAME) {
            continue;
        }
        attr.parse_args_with(|input: ParseStream| {
            while !input.is_empty() {
                f(input)?;
                if input.is_empty() {
                    break;
                }
                input.parse::<Token![,]>()?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// Parses `= "literal"`.
pub(crate) fn parse_str_value(input: ParseStream) -> syn::Result<LitStr> {
    input.parse::<Token![=]>()?;
    input.parse()
}

/// Parses `= 123`.
pub(crate) fn parse_usize_value(input: ParseStream) -> syn::Result<usize> {
    input.parse::<Token![=]>()?;
    input.parse::<LitInt>()?.base10_parse()
}
