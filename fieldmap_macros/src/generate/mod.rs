//! Code generation: the tree synthesizer for injected companions and the
//! derive-path trait implementation.

pub mod companion;
pub mod trait_impl;

use proc_macro2::TokenStream;
use quote::quote;

/// Quote an optional string as an `Option<&'static str>` expression.
pub(crate) fn quote_option_str(value: Option<&str>) -> TokenStream {
    match value {
        Some(value) => quote!(Some(#value)),
        None => quote!(None),
    }
}
