use syn::{Field, Ident, Type};

use super::{FieldAttributes, MappedMeta};

/// A named field with its parsed attributes.
pub(crate) struct StructField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: FieldAttributes,
}

impl StructField<'_> {
    /// Skipped fields are neither members nor the base.
    #[inline]
    pub fn is_member(&self) -> bool {
        self.attrs.skip.is_none() && self.attrs.base.is_none()
    }

    /// The member name, with any raw identifier prefix removed.
    pub fn name(&self) -> String {
        let name = self.ident.to_string();
        match name.strip_prefix("r#") {
            Some(stripped) => stripped.to_owned(),
            None => name,
        }
    }
}

pub(crate) struct MappedStruct<'a> {
    meta: MappedMeta<'a>,
    fields: Vec<StructField<'a>>,
}

impl<'a> MappedStruct<'a> {
    pub fn new(mut meta: MappedMeta<'a>, fields: impl Iterator<Item = &'a Field>) -> syn::Result<Self> {
        let mut parsed = Vec::new();
        let mut base_seen = false;
        for field in fields {
            let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if let Some(span) = attrs.base {
                if base_seen {
                    return Err(syn::Error::new(span, "a type has at most one base"));
                }
                base_seen = true;
            }
            let Some(ident) = field.ident.as_ref() else {
                return Err(syn::Error::new_spanned(field, "expected a named field"));
            };
            parsed.push(StructField {
                ident,
                ty: &field.ty,
                attrs,
            });
        }
        meta.set_field_types(parsed.iter().filter(|f| f.attrs.skip.is_none()).map(|f| f.ty));
        Ok(Self { meta, fields: parsed })
    }

    #[inline]
    pub fn meta(&self) -> &MappedMeta<'a> {
        &self.meta
    }

    #[inline]
    pub fn fields(&self) -> &[StructField<'a>] {
        &self.fields
    }

    /// Fields mapped as members, in declaration order.
    pub fn members(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields.iter().filter(|field| field.is_member())
    }

    pub fn base(&self) -> Option<&StructField<'a>> {
        self.fields.iter().find(|field| field.attrs.base.is_some())
    }
}
