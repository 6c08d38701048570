use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::token::Paren;
use syn::{Attribute, Ident, LitStr, parenthesized, parse::ParseStream};

use super::{CustomMarkers, for_each_entry, parse_str_value, parse_usize_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoleKind {
    Attribute,
    Element,
    CData,
    List,
}

/// The wire role of a field.
#[derive(Debug)]
pub(crate) struct FieldRole {
    pub kind: RoleKind,
    pub key: Option<LitStr>,
    pub index: Option<usize>,
    pub entry: Option<LitStr>,
}

impl FieldRole {
    fn new(kind: RoleKind) -> Self {
        Self {
            kind,
            key: None,
            index: None,
            entry: None,
        }
    }

    /// Format: `(key = "..", index = N)`, plus `entry = ".."` for lists.
    fn parse_options(&mut self, input: ParseStream) -> syn::Result<()> {
        if !input.peek(Paren) {
            return Ok(());
        }
        let content;
        parenthesized!(content in input);
        while !content.is_empty() {
            let ident: Ident = content.parse()?;
            match ident.to_string().as_str() {
                "key" => self.key = Some(parse_str_value(&content)?),
                "index" => self.index = Some(parse_usize_value(&content)?),
                "entry" if self.kind == RoleKind::List => self.entry = Some(parse_str_value(&content)?),
                _ => return Err(syn::Error::new(ident.span(), "expected `key`, `index` or `entry` (lists only)")),
            }
            if content.is_empty() {
                break;
            }
            content.parse::<syn::Token![,]>()?;
        }
        Ok(())
    }

    /// The `Role` expression, e.g. `Role::attribute().with_key("id")`.
    pub fn get_expression(&self, macro_utils: &TokenStream) -> TokenStream {
        let base = match self.kind {
            RoleKind::Attribute => quote!(#macro_utils::Role::attribute()),
            RoleKind::Element => quote!(#macro_utils::Role::element()),
            RoleKind::CData => quote!(#macro_utils::Role::cdata()),
            RoleKind::List => match &self.entry {
                Some(entry) => quote!(#macro_utils::Role::list(#macro_utils::Some(#entry))),
                None => quote!(#macro_utils::Role::list(#macro_utils::None)),
            },
        };
        let with_key = self.key.as_ref().map(|key| quote!(.with_key(#key)));
        let with_index = self.index.map(|index| quote!(.with_index(#index)));
        quote! {
            #base #with_key #with_index
        }
    }
}

/// Attributes of a struct field.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    /// `None` maps the field as an element.
    pub role: Option<FieldRole>,
    /// `Some(null_check)` when the field is required.
    pub required: Option<bool>,
    pub skip: Option<Span>,
    pub base: Option<Span>,
    pub custom_markers: CustomMarkers,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_entry(attrs, |input| this.parse_entry(input))?;
        this.validity()?;
        Ok(this)
    }

    fn parse_entry(&mut self, input: ParseStream) -> syn::Result<()> {
        if input.peek(syn::Token![@]) {
            return self.custom_markers.parse_inner_stream(input);
        }
        let ident: Ident = input.parse()?;
        let kind = match ident.to_string().as_str() {
            "attribute" => Some(RoleKind::Attribute),
            "element" => Some(RoleKind::Element),
            "cdata" => Some(RoleKind::CData),
            "list" => Some(RoleKind::List),
            "required" => {
                let mut null_check = false;
                if input.peek(Paren) {
                    let content;
                    parenthesized!(content in input);
                    let flag: Ident = content.parse()?;
                    if flag != "null_check" {
                        return Err(syn::Error::new(flag.span(), "expected `null_check`"));
                    }
                    null_check = true;
                }
                self.required = Some(null_check);
                None
            }
            "skip" => {
                self.skip = Some(ident.span());
                None
            }
            "base" => {
                self.base = Some(ident.span());
                None
            }
            _ => {
                return Err(syn::Error::new(
                    ident.span(),
                    "unknown field attribute, expected one of `attribute`, `element`, `cdata`, `list`, \
                     `required`, `skip`, `base` or `@marker`",
                ));
            }
        };
        if let Some(kind) = kind {
            if self.role.is_some() {
                return Err(syn::Error::new(ident.span(), "a field can only have one role"));
            }
            let mut role = FieldRole::new(kind);
            role.parse_options(input)?;
            self.role = Some(role);
        }
        Ok(())
    }

    fn validity(&self) -> syn::Result<()> {
        if let Some(span) = self.skip
            && (self.role.is_some() || self.required.is_some() || self.base.is_some())
        {
            return Err(syn::Error::new(span, "a skipped field takes no other mapping attribute"));
        }
        if let Some(span) = self.base
            && (self.role.is_some() || self.required.is_some())
        {
            return Err(syn::Error::new(span, "a base field is not a member and takes no role"));
        }
        Ok(())
    }
}
