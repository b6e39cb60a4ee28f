//! Metadata structures for parsed entity declarations.
//!
//! These hold everything the classifier and builder need, decoupled from
//! the syntax tree they were read from. Fields are read once and never
//! written back; only the injector mutates the tree.

use proc_macro2::Span;
use syn::{Generics, Ident, Type, Visibility};

/// A parsed entity declaration.
#[derive(Debug)]
pub struct EntityMetadata {
    /// Entity name (e.g. `Order`).
    pub name: Ident,

    /// Declaration generics, needed for generated `impl` blocks.
    pub generics: Generics,

    /// All named fields, in declaration order.
    pub fields: Vec<FieldMetadata>,

    /// Span of the declaration, for diagnostic attribution.
    pub span: Span,
}

impl EntityMetadata {
    pub fn new(name: Ident, generics: Generics) -> Self {
        let span = name.span();
        Self {
            name,
            generics,
            fields: Vec::new(),
            span,
        }
    }

    pub fn add_field(&mut self, field: FieldMetadata) {
        self.fields.push(field);
    }
}

/// One named field of an entity.
#[derive(Debug)]
pub struct FieldMetadata {
    pub name: Ident,
    pub ty: Type,
    pub vis: Visibility,
    pub id: bool,
    pub transient: bool,
    pub relation: bool,
}

impl FieldMetadata {
    pub fn new(name: Ident, ty: Type, vis: Visibility) -> Self {
        Self {
            name,
            ty,
            vis,
            id: false,
            transient: false,
            relation: false,
        }
    }

    /// How many structural markers the field carries.
    pub fn marker_count(&self) -> usize {
        [self.id, self.transient, self.relation]
            .iter()
            .filter(|&&present| present)
            .count()
    }

    /// Whether the field is a `PhantomData` artifact rather than data.
    pub fn is_phantom(&self) -> bool {
        match &self.ty {
            Type::Path(path) => path
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "PhantomData"),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn fields_keep_declaration_order() {
        let mut entity = EntityMetadata::new(parse_quote!(Order), Generics::default());
        entity.add_field(FieldMetadata::new(
            parse_quote!(id),
            parse_quote!(u64),
            parse_quote!(pub),
        ));
        entity.add_field(FieldMetadata::new(
            parse_quote!(total),
            parse_quote!(u32),
            parse_quote!(pub),
        ));

        let names: Vec<String> = entity.fields.iter().map(|f| f.name.to_string()).collect();
        assert_eq!(names, ["id", "total"]);
    }

    #[test]
    fn phantom_data_is_recognized() {
        let phantom = FieldMetadata::new(
            parse_quote!(_marker),
            parse_quote!(std::marker::PhantomData<T>),
            parse_quote!(pub),
        );
        assert!(phantom.is_phantom());

        let plain = FieldMetadata::new(parse_quote!(total), parse_quote!(u32), parse_quote!(pub));
        assert!(!plain.is_phantom());
    }
}
