use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Attribute, Ident, LitStr, Token, Type, parenthesized, parse::ParseStream};

use super::{CustomMarkers, for_each_entry, parse_str_value, parse_usize_value};

/// `resolve(target = T, key = "..", index = N, value = "..")`
#[derive(Debug)]
pub(crate) struct ResolveAttribute {
    pub target: Type,
    pub key: Option<LitStr>,
    pub index: Option<usize>,
    pub value: Option<LitStr>,
}

impl ResolveAttribute {
    fn parse(span: Span, input: ParseStream) -> syn::Result<Self> {
        let content;
        parenthesized!(content in input);

        let mut target = None;
        let mut key = None;
        let mut index = None;
        let mut value = None;
        while !content.is_empty() {
            let ident: Ident = content.parse()?;
            match ident.to_string().as_str() {
                "target" => {
                    content.parse::<Token![=]>()?;
                    target = Some(content.parse::<Type>()?);
                }
                "key" => key = Some(parse_str_value(&content)?),
                "index" => index = Some(parse_usize_value(&content)?),
                "value" => value = Some(parse_str_value(&content)?),
                _ => return Err(syn::Error::new(ident.span(), "expected `target`, `key`, `index` or `value`")),
            }
            if content.is_empty() {
                break;
            }
            content.parse::<Token![,]>()?;
        }

        let Some(target) = target else {
            return Err(syn::Error::new(span, "`resolve` needs a `target = Type`"));
        };
        Ok(Self {
            target,
            key,
            index,
            value,
        })
    }

    /// `Resolution::new::<Self>(<T as Typed>::type_info)` plus overrides.
    pub fn get_expression(&self, macro_utils: &TokenStream) -> TokenStream {
        let target = &self.target;
        let with_key = self.key.as_ref().map(|key| quote!(.with_key(#key)));
        let with_index = self.index.map(|index| quote!(.with_index(#index)));
        let with_value = self.value.as_ref().map(|value| quote!(.with_value(#value)));
        quote! {
            #macro_utils::Resolution::new::<Self>(<#target as #macro_utils::Typed>::type_info)
                #with_key #with_index #with_value
        }
    }
}

/// A lifecycle hook naming an inherent method of the type.
#[derive(Debug)]
pub(crate) struct HookAttribute {
    pub kind: Ident,
    pub method: Ident,
}

impl HookAttribute {
    fn is_serialize(&self) -> bool {
        self.kind.to_string().ends_with("_serialize")
    }

    /// `HookInfo::on_serialize::<Self>(..)` or `HookInfo::on_deserialize::<Self>(..)`.
    pub fn get_expression(&self, macro_utils: &TokenStream) -> TokenStream {
        let method = &self.method;
        let name = method.to_string();
        let kind = match self.kind.to_string().as_str() {
            "before_serialize" => quote!(BeforeSerialize),
            "after_serialize" => quote!(AfterSerialize),
            "before_deserialize" => quote!(BeforeDeserialize),
            _ => quote!(AfterDeserialize),
        };
        if self.is_serialize() {
            quote! {
                #macro_utils::HookInfo::on_serialize::<Self>(
                    #macro_utils::HookKind::#kind,
                    #name,
                    |owner| {
                        if let #macro_utils::Some(owner) = owner.downcast_ref::<Self>() {
                            Self::#method(owner);
                        }
                    },
                )
            }
        } else {
            quote! {
                #macro_utils::HookInfo::on_deserialize::<Self>(
                    #macro_utils::HookKind::#kind,
                    #name,
                    |owner| {
                        if let #macro_utils::Some(owner) = owner.downcast_mut::<Self>() {
                            Self::#method(owner);
                        }
                    },
                )
            }
        }
    }
}

/// Attributes on the type itself.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    pub resolutions: Vec<ResolveAttribute>,
    pub hooks: Vec<HookAttribute>,
    pub xml_root: Option<LitStr>,
    pub auto_register: Option<Span>,
    pub custom_markers: CustomMarkers,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for_each_entry(attrs, |input| this.parse_entry(input))?;
        Ok(this)
    }

    fn parse_entry(&mut self, input: ParseStream) -> syn::Result<()> {
        if input.peek(Token![@]) {
            return self.custom_markers.parse_inner_stream(input);
        }
        let ident: Ident = input.parse()?;
        match ident.to_string().as_str() {
            "resolve" => self.resolutions.push(ResolveAttribute::parse(ident.span(), input)?),
            "before_serialize" | "after_serialize" | "before_deserialize" | "after_deserialize" => {
                if self.hooks.iter().any(|hook| hook.kind == ident) {
                    return Err(syn::Error::new(ident.span(), "duplicate hook"));
                }
                input.parse::<Token![=]>()?;
                let method: Ident = input.parse()?;
                self.hooks.push(HookAttribute { kind: ident, method });
            }
            "xml_root" => {
                if self.xml_root.is_some() {
                    return Err(syn::Error::new(ident.span(), "duplicate `xml_root`"));
                }
                self.xml_root = Some(parse_str_value(input)?);
            }
            "auto_register" => self.auto_register = Some(ident.span()),
            _ => {
                return Err(syn::Error::new(
                    ident.span(),
                    "unknown type attribute, expected one of `resolve`, `before_serialize`, `after_serialize`, \
                     `before_deserialize`, `after_deserialize`, `xml_root`, `auto_register` or `@marker`",
                ));
            }
        }
        Ok(())
    }

    /// Marker calls for the object info: user markers, then `XmlRoot`.
    pub fn markers_expression(&self, macro_utils: &TokenStream) -> TokenStream {
        let custom = self.custom_markers.get_expression();
        let xml_root = self
            .xml_root
            .as_ref()
            .map(|name| quote!(.with_marker(#macro_utils::XmlRoot(#name))));
        quote! {
            #custom #xml_root
        }
    }
}
