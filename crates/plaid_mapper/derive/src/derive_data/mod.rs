//! Parsed forms of the derive input.

// -----------------------------------------------------------------------------
// Modules

mod attributes;
mod mapped_enum;
mod mapped_meta;
mod mapped_struct;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use attributes::{FieldAttributes, FieldRole, HookAttribute, RoleKind, TypeAttributes, VariantAttributes};

pub(crate) use mapped_enum::{EnumVariant, MappedEnum};
pub(crate) use mapped_meta::MappedMeta;
pub(crate) use mapped_struct::{MappedStruct, StructField};

use syn::{Data, DeriveInput, Fields};

/// The shape a `#[derive(Mapped)]` input maps to.
pub(crate) enum MappedDerive<'a> {
    /// Named-field and unit structs, mapped as objects.
    Struct(MappedStruct<'a>),
    /// Fieldless enums, mapped by variant name.
    Enum(MappedEnum<'a>),
}

impl<'a> MappedDerive<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;
        let meta = MappedMeta::new(attrs, &input.ident, &input.generics)?;

        match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(fields) => Ok(Self::Struct(MappedStruct::new(meta, fields.named.iter())?)),
                Fields::Unit => Ok(Self::Struct(MappedStruct::new(meta, core::iter::empty())?)),
                Fields::Unnamed(_) => Err(syn::Error::new_spanned(
                    &input.ident,
                    "tuple structs cannot be mapped, name their fields",
                )),
            },
            Data::Enum(data) => Ok(Self::Enum(MappedEnum::new(meta, data.variants.iter())?)),
            Data::Union(_) => Err(syn::Error::new_spanned(&input.ident, "unions cannot be mapped")),
        }
    }
}
