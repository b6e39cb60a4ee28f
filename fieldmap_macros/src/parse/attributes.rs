//! Attribute extraction for fields and for the module macro's options.

use proc_macro2::TokenStream;
use syn::parse::Parser;
use syn::punctuated::Punctuated;
use syn::{Ident, Meta, Token, Type, Visibility};

/// Structural markers read off one field.
///
/// The marker vocabulary itself is treated as an opaque classification
/// input; this type only records which markers are present.
#[derive(Debug)]
pub struct FieldAttributes {
    pub ident: Option<Ident>,
    pub ty: Type,
    pub vis: Visibility,
    pub id: bool,
    pub transient: bool,
    pub relation: bool,
}

impl FieldAttributes {
    pub fn from_field(field: &syn::Field) -> Self {
        let mut id = false;
        let mut transient = false;
        let mut relation = false;

        for attr in &field.attrs {
            if attr.path().is_ident("id") {
                id = true;
            } else if attr.path().is_ident("transient") {
                transient = true;
            } else if attr.path().is_ident("relation") {
                relation = true;
            }
        }

        Self {
            ident: field.ident.clone(),
            ty: field.ty.clone(),
            vis: field.vis.clone(),
            id,
            transient,
            relation,
        }
    }
}

/// Recognized processing options of `#[entity_module(..)]`.
///
/// The surface is deliberately small: `inline` marks emitted accessors
/// `#[inline]` and changes nothing else. Unknown options are an error
/// rather than being silently dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModuleOptions {
    pub inline: bool,
}

impl ModuleOptions {
    pub fn parse(args: TokenStream) -> syn::Result<Self> {
        let mut options = Self::default();
        if args.is_empty() {
            return Ok(options);
        }

        let metas = Punctuated::<Meta, Token![,]>::parse_terminated.parse2(args)?;
        for meta in metas {
            match &meta {
                Meta::Path(path) if path.is_ident("inline") => options.inline = true,
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unrecognized option, expected `inline`",
                    ));
                }
            }
        }

        Ok(options)
    }
}
