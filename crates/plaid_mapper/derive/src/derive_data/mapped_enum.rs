use syn::{Fields, Ident, LitStr, Variant};

use super::{MappedMeta, VariantAttributes};

pub(crate) struct EnumVariant<'a> {
    pub ident: &'a Ident,
    /// The mapped name: the `rename` override or the identifier.
    pub name: LitStr,
}

pub(crate) struct MappedEnum<'a> {
    meta: MappedMeta<'a>,
    variants: Vec<EnumVariant<'a>>,
}

impl<'a> MappedEnum<'a> {
    pub fn new(meta: MappedMeta<'a>, variants: impl Iterator<Item = &'a Variant>) -> syn::Result<Self> {
        let mut parsed: Vec<EnumVariant<'a>> = Vec::new();
        for variant in variants {
            if !matches!(variant.fields, Fields::Unit) {
                return Err(syn::Error::new_spanned(
                    &variant.fields,
                    "only fieldless enums can be mapped, wrap data carrying variants in objects",
                ));
            }
            let attrs = VariantAttributes::parse_attrs(&variant.attrs)?;
            let name = attrs
                .rename
                .unwrap_or_else(|| LitStr::new(&variant.ident.to_string(), variant.ident.span()));
            if parsed.iter().any(|other| other.name.value() == name.value()) {
                return Err(syn::Error::new(name.span(), "duplicate variant name"));
            }
            parsed.push(EnumVariant {
                ident: &variant.ident,
                name,
            });
        }
        if parsed.is_empty() {
            return Err(syn::Error::new_spanned(meta.ident(), "an enum needs at least one variant to be mapped"));
        }
        if meta.impl_with_generic() {
            return Err(syn::Error::new_spanned(meta.ident(), "generic enums cannot be mapped"));
        }
        Ok(Self { meta, variants: parsed })
    }

    #[inline]
    pub fn meta(&self) -> &MappedMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn variants(&self) -> &[EnumVariant<'a>] {
        &self.variants
    }
}
