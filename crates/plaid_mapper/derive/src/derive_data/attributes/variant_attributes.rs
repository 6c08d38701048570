use syn::{Attribute, Ident, LitStr, parse::ParseStream};

use super::{for_each_entry, parse_str_value};

/// Attributes of an enum variant.
#[derive(Default, Debug)]
pub(crate) struct VariantAttributes {
    pub rename: Option<LitStr>,
}

impl VariantAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_entry(attrs, |input: ParseStream| {
            let ident: Ident = input.parse()?;
            if ident != "rename" {
                return Err(syn::Error::new(ident.span(), "expected `rename = \"...\"`"));
            }
            this.rename = Some(parse_str_value(input)?);
            Ok(())
        })?;
        Ok(this)
    }
}
