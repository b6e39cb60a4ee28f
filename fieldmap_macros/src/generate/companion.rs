//! Tree synthesis for the companion type.
//!
//! Converts a [`MapperModel`] into detached syntax-tree items: the
//! companion unit struct, its constant `impl`, and an accessor `impl` on
//! the entity itself. Nothing here touches the host tree; the fragment
//! stays disposable until the injector splices it.
//!
//! Every ident minted here carries `Span::call_site()`, the generated
//! position sentinel, so injected nodes never alias the original
//! declaration's source range. All synthesized content is literal data or
//! references to the entity and the `fieldmap` support crate, which keeps
//! the fragment resolvable regardless of what else the host has processed.

use derive_more::From;
use quote::quote;
use proc_macro2::Span;
use syn::{Item, parse_quote};

use crate::classify::FieldRole;
use crate::generate::quote_option_str;
use crate::mapper::MapperModel;
use crate::parse::attributes::ModuleOptions;

/// A synthesized, not-yet-attached member list.
#[derive(Debug, From)]
pub struct SyntheticFragment {
    pub items: Vec<Item>,
}

/// Synthesize the companion fragment for one entity.
pub fn synthesize(model: &MapperModel, options: &ModuleOptions) -> SyntheticFragment {
    let companion = &model.companion;
    let entity = respanned(&model.entity);

    let struct_doc = format!("Field name constants for [`{entity}`], generated at compile time.");
    let companion_struct: Item = parse_quote! {
        #[doc = #struct_doc]
        pub struct #companion;
    };

    let const_defs = model.constants.iter().map(|constant| {
        let const_ident = &constant.const_ident;
        let field_name = &constant.field_name;
        let doc = matches!(constant.role, FieldRole::Identifier)
            .then(|| quote!(#[doc = "The identifier field."]));
        quote! {
            #doc
            pub const #const_ident: &'static str = #field_name;
        }
    });
    let name_refs = model.constants.iter().map(|constant| &constant.const_ident);
    let identifier = quote_option_str(model.identifier.as_deref());
    let relations = &model.relations;

    let companion_impl: Item = parse_quote! {
        impl #companion {
            #(#const_defs)*

            /// Mapped field names, in declaration order.
            pub const NAMES: &'static [&'static str] = &[#(Self::#name_refs),*];

            /// Name of the `#[id]` field, when one is marked.
            pub const IDENTIFIER: Option<&'static str> = #identifier;

            /// Names of `#[relation]` fields, tracked but not mapped.
            pub const RELATIONS: &'static [&'static str] = &[#(#relations),*];

            /// Whether `name` is a mapped field of the entity.
            pub const fn contains(name: &str) -> bool {
                ::fieldmap::lookup::contains(Self::NAMES, name)
            }

            /// Position of `name` in declaration order.
            pub const fn position(name: &str) -> Option<usize> {
                ::fieldmap::lookup::position_of(Self::NAMES, name)
            }
        }
    };

    let mut items = vec![companion_struct, companion_impl];

    if !model.accessors.is_empty() {
        let entity_name = respanned(&model.entity);
        let (impl_generics, ty_generics, where_clause) = model.generics.split_for_impl();
        let inline_attr = options.inline.then(|| quote!(#[inline]));

        let accessor_fns = model.accessors.iter().map(|accessor| {
            let field = &accessor.field;
            let setter = &accessor.setter;
            let ty = &accessor.ty;
            let vis = &accessor.vis;
            quote! {
                #inline_attr
                #vis fn #field(&self) -> &#ty {
                    &self.#field
                }

                #inline_attr
                #vis fn #setter(&mut self, value: #ty) {
                    self.#field = value;
                }
            }
        });

        items.push(parse_quote! {
            impl #impl_generics #entity_name #ty_generics #where_clause {
                #(#accessor_fns)*
            }
        });
    }

    SyntheticFragment::from(items)
}

fn respanned(ident: &syn::Ident) -> syn::Ident {
    let mut ident = ident.clone();
    ident.set_span(Span::call_site());
    ident
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::mapper;
    use crate::parse::entity::EntityVisitor;
    use quote::ToTokens;
    use std::collections::BTreeSet;
    use syn::parse_quote;

    fn synthesize_struct(item: syn::ItemStruct, options: ModuleOptions) -> SyntheticFragment {
        let entity = EntityVisitor::parse_struct(&item).unwrap();
        let classification = classify(&entity);
        let model = mapper::build(&entity, &classification.roles, &BTreeSet::new()).unwrap();
        synthesize(&model, &options)
    }

    fn fragment_source(fragment: &SyntheticFragment) -> String {
        fragment
            .items
            .iter()
            .map(|item| item.to_token_stream().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn fragment_holds_constants_in_order() {
        let fragment = synthesize_struct(
            parse_quote! {
                pub struct Order {
                    #[id]
                    pub id: u64,
                    pub total: u32,
                    #[transient]
                    pub notes: String,
                }
            },
            ModuleOptions::default(),
        );

        let source = fragment_source(&fragment);
        assert!(source.contains("pub struct OrderFieldMap"));
        assert!(source.contains("ID"));
        assert!(source.contains("TOTAL"));
        assert!(!source.contains("NOTES"));
        assert!(
            source.find("ID").unwrap() < source.find("TOTAL").unwrap(),
            "constants must keep declaration order"
        );
    }

    #[test]
    fn empty_model_still_yields_a_companion() {
        let fragment = synthesize_struct(parse_quote!(pub struct Empty {}), ModuleOptions::default());

        assert_eq!(fragment.items.len(), 2);
        let source = fragment_source(&fragment);
        assert!(source.contains("pub struct EmptyFieldMap"));
        assert!(source.contains("NAMES"));
    }

    #[test]
    fn accessors_cover_mapped_fields_only() {
        let fragment = synthesize_struct(
            parse_quote! {
                pub struct Order {
                    pub total: u32,
                    #[transient]
                    pub notes: String,
                }
            },
            ModuleOptions::default(),
        );

        let source = fragment_source(&fragment);
        assert!(source.contains("set_total"));
        assert!(!source.contains("set_notes"));
        assert!(!source.contains("inline"));
    }

    #[test]
    fn inline_option_marks_accessors() {
        let fragment = synthesize_struct(
            parse_quote! {
                pub struct Order {
                    pub total: u32,
                }
            },
            ModuleOptions { inline: true },
        );

        assert!(fragment_source(&fragment).contains("inline"));
    }

    #[test]
    fn relations_are_tagged_not_mapped() {
        let fragment = synthesize_struct(
            parse_quote! {
                pub struct Order {
                    pub total: u32,
                    #[relation]
                    pub customer: u64,
                }
            },
            ModuleOptions::default(),
        );

        let source = fragment_source(&fragment);
        assert!(source.contains("RELATIONS"));
        assert!(source.contains("customer"));
        assert!(!source.contains("CUSTOMER"));
        assert!(!source.contains("set_customer"));
    }
}
