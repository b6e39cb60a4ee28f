//! Derive-path generation: `impl FieldMapped` for one struct.
//!
//! The derive shares the classifier and builder with the injection path,
//! so both entry points always agree on which fields are mapped; it only
//! differs in what it emits. A derive appends items after the struct, it
//! cannot introduce a sibling type collision, so the builder runs with an
//! empty sibling view here.

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::classify::classify;
use crate::diagnostics::Diagnostic;
use crate::generate::quote_option_str;
use crate::mapper::{self, MapperModel};
use crate::parse::entity::EntityVisitor;

/// Expand `#[derive(FieldMap)]`.
pub fn expand_derive(input: &DeriveInput) -> TokenStream {
    let entity = match EntityVisitor::parse_derive(input) {
        Ok(entity) => entity,
        Err(diagnostic) => return diagnostic.into_tokens(),
    };

    let classification = classify(&entity);
    let model = match mapper::build(&entity, &classification.roles, &BTreeSet::new()) {
        Ok(model) => model,
        Err(diagnostic) => return diagnostic.into_tokens(),
    };

    let trait_impl = field_mapped_impl(&model);
    let warnings: TokenStream = classification
        .warnings
        .into_iter()
        .map(Diagnostic::into_tokens)
        .collect();

    quote! {
        #trait_impl
        #warnings
    }
}

fn field_mapped_impl(model: &MapperModel) -> TokenStream {
    let entity = &model.entity;
    let (impl_generics, ty_generics, where_clause) = model.generics.split_for_impl();

    let names = model.constants.iter().map(|constant| &constant.field_name);
    let identifier = quote_option_str(model.identifier.as_deref());
    let relations = &model.relations;

    quote! {
        impl #impl_generics ::fieldmap::FieldMapped for #entity #ty_generics #where_clause {
            const FIELD_NAMES: &'static [&'static str] = &[#(#names),*];
            const IDENTIFIER: Option<&'static str> = #identifier;
            const RELATIONS: &'static [&'static str] = &[#(#relations),*];
        }
    }
}
