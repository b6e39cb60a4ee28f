//! Entity parsing using syn visitors.
//!
//! Turns one marked declaration into [`EntityMetadata`], rejecting shapes
//! the mapper cannot handle. Both macro entry points funnel through here so
//! the derive path and the injection path always agree on what an entity is.

use proc_macro2::Span;
use syn::visit::Visit;
use syn::{Data, DeriveInput, Fields, ItemStruct};

use crate::diagnostics::Diagnostic;
use crate::parse::attributes::FieldAttributes;
use crate::parse::metadata::{EntityMetadata, FieldMetadata};

/// Visitor for parsing a single entity declaration.
#[derive(Default)]
pub struct EntityVisitor {
    metadata: Option<EntityMetadata>,
    error: Option<Diagnostic>,
}

impl EntityVisitor {
    /// Parse an entity from a struct item found inside an entity module.
    pub fn parse_struct(item: &ItemStruct) -> Result<EntityMetadata, Diagnostic> {
        let mut visitor = Self::default();
        visitor.visit_item_struct(item);
        visitor.finish()
    }

    /// Parse an entity from `#[derive(FieldMap)]` input.
    pub fn parse_derive(input: &DeriveInput) -> Result<EntityMetadata, Diagnostic> {
        let mut visitor = Self::default();
        visitor.visit_derive_input(input);
        visitor.finish()
    }

    fn finish(self) -> Result<EntityMetadata, Diagnostic> {
        match (self.metadata, self.error) {
            (_, Some(error)) => Err(error),
            (Some(metadata), None) => Ok(metadata),
            (None, None) => Err(Diagnostic::unsupported_shape(
                Span::call_site(),
                "declaration did not parse as an entity".to_string(),
            )),
        }
    }

    fn read_entity(&mut self, name: &syn::Ident, generics: &syn::Generics, fields: &Fields) {
        let mut entity = EntityMetadata::new(name.clone(), generics.clone());

        match fields {
            Fields::Named(named) => {
                for field in named.named.iter().filter_map(Self::read_field) {
                    entity.add_field(field);
                }
            }
            // A fieldless entity is valid; it maps to an empty mapper.
            Fields::Unit => {}
            Fields::Unnamed(_) => {
                self.error = Some(Diagnostic::unsupported_shape(
                    name.span(),
                    format!("`{name}` is a tuple struct; field mapping needs named fields"),
                ));
                return;
            }
        }

        self.metadata = Some(entity);
    }

    fn read_field(field: &syn::Field) -> Option<FieldMetadata> {
        let attrs = FieldAttributes::from_field(field);
        let name = attrs.ident?;

        let mut metadata = FieldMetadata::new(name, attrs.ty, attrs.vis);
        metadata.id = attrs.id;
        metadata.transient = attrs.transient;
        metadata.relation = attrs.relation;
        Some(metadata)
    }
}

impl<'ast> Visit<'ast> for EntityVisitor {
    fn visit_item_struct(&mut self, item: &'ast ItemStruct) {
        self.read_entity(&item.ident, &item.generics, &item.fields);
    }

    fn visit_derive_input(&mut self, input: &'ast DeriveInput) {
        match &input.data {
            Data::Struct(data) => self.read_entity(&input.ident, &input.generics, &data.fields),
            Data::Enum(_) | Data::Union(_) => {
                self.error = Some(Diagnostic::unsupported_shape(
                    input.ident.span(),
                    format!(
                        "`{}` is not a struct; FieldMap can only map struct fields",
                        input.ident
                    ),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use syn::parse_quote;

    #[test]
    fn parses_named_struct() {
        let item: ItemStruct = parse_quote! {
            pub struct Order {
                #[id]
                pub id: u64,
                pub total: u32,
                #[transient]
                pub notes: String,
            }
        };

        let entity = EntityVisitor::parse_struct(&item).unwrap();
        assert_eq!(entity.name.to_string(), "Order");
        assert_eq!(entity.fields.len(), 3);
        assert!(entity.fields[0].id);
        assert!(entity.fields[2].transient);
    }

    #[test]
    fn unit_struct_is_an_empty_entity() {
        let item: ItemStruct = parse_quote!(pub struct Empty;);
        let entity = EntityVisitor::parse_struct(&item).unwrap();
        assert!(entity.fields.is_empty());
    }

    #[test]
    fn tuple_struct_is_unsupported() {
        let item: ItemStruct = parse_quote!(pub struct Pair(u64, u64););
        let error = EntityVisitor::parse_struct(&item).unwrap_err();
        assert!(matches!(
            error.kind,
            DiagnosticKind::UnsupportedDeclarationShape(_)
        ));
    }

    #[test]
    fn enum_derive_is_unsupported() {
        let input: DeriveInput = parse_quote! {
            enum Status { Open, Closed }
        };
        let error = EntityVisitor::parse_derive(&input).unwrap_err();
        assert!(matches!(
            error.kind,
            DiagnosticKind::UnsupportedDeclarationShape(_)
        ));
    }

    #[test]
    fn derive_input_keeps_generics() {
        let input: DeriveInput = parse_quote! {
            struct Pair<T> {
                #[id]
                key: String,
                value: T,
            }
        };
        let entity = EntityVisitor::parse_derive(&input).unwrap();
        assert_eq!(entity.generics.params.len(), 1);
    }
}
