use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, Token, parse::ParseStream};

/// User marker expressions, written as `@expr`.
#[derive(Default, Debug)]
pub(crate) struct CustomMarkers {
    markers: Vec<Expr>,
}

impl CustomMarkers {
    /// Parse `@` markers.
    ///
    /// Examples:
    /// - `#[mapping(@Sensitive)]`
    /// - `#[mapping(@Range { min: 0, max: 10 })]`
    pub fn parse_inner_stream(&mut self, input: ParseStream) -> syn::Result<()> {
        input.parse::<Token![@]>()?;
        self.markers.push(input.parse()?);
        Ok(())
    }

    /// `.with_marker(...)` calls, one per marker.
    pub fn get_expression(&self) -> TokenStream {
        let markers = self.markers.iter();
        quote! {
            #(.with_marker(#markers))*
        }
    }
}
