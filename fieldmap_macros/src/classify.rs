//! Field role classification.
//!
//! A pure pass over parsed field metadata: every field gets exactly one
//! role. Marker conflicts are resolved, never rejected: excluding a field
//! is always safe, silently mapping an excluded identifier is not, so
//! exclusion wins and the resolution is surfaced as a warning.

use crate::diagnostics::Diagnostic;
use crate::parse::metadata::{EntityMetadata, FieldMetadata};

/// Structural role of a field within its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum FieldRole {
    /// The persistence identifier, marked `#[id]`.
    Identifier,
    /// Ordinary mapped state; any unmarked named field.
    Persistent,
    /// Left out of the mapper: `#[transient]` or a `PhantomData` artifact.
    Excluded,
    /// An association, marked `#[relation]`; tracked but not mapped.
    Relationship,
}

/// Roles for every field of one entity, in declaration order, plus any
/// conflict warnings raised while resolving them.
#[derive(Debug)]
pub struct Classification {
    pub roles: Vec<FieldRole>,
    pub warnings: Vec<Diagnostic>,
}

/// Assign a role to every field of `entity`.
///
/// Zero fields is a valid outcome; so are zero or several `#[id]` markers,
/// which warn rather than fail since marker use is declarative and can be
/// malformed.
pub fn classify(entity: &EntityMetadata) -> Classification {
    let mut warnings = Vec::new();

    let roles: Vec<FieldRole> = entity
        .fields
        .iter()
        .map(|field| resolve_role(field, &mut warnings))
        .collect();

    let identifiers = roles
        .iter()
        .filter(|role| **role == FieldRole::Identifier)
        .count();
    if identifiers > 1 {
        warnings.push(Diagnostic::conflict(
            entity.span,
            entity.name.to_string(),
            format!("{identifiers} fields marked #[id]; the first is reported"),
        ));
    }

    Classification { roles, warnings }
}

/// Resolve one field's markers to a role.
///
/// Precedence on conflict: Excluded > Identifier > Relationship. The
/// precedence lives here, and only here.
fn resolve_role(field: &FieldMetadata, warnings: &mut Vec<Diagnostic>) -> FieldRole {
    let role = if field.transient || field.is_phantom() {
        FieldRole::Excluded
    } else if field.id {
        FieldRole::Identifier
    } else if field.relation {
        FieldRole::Relationship
    } else {
        FieldRole::Persistent
    };

    if field.marker_count() > 1 || (field.is_phantom() && field.marker_count() > 0) {
        warnings.push(Diagnostic::conflict(
            field.name.span(),
            field.name.to_string(),
            format!("resolved to {role}"),
        ));
    }

    role
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::entity::EntityVisitor;
    use syn::parse_quote;

    fn classify_struct(item: syn::ItemStruct) -> Classification {
        let entity = EntityVisitor::parse_struct(&item).unwrap();
        classify(&entity)
    }

    #[test]
    fn roles_follow_markers() {
        let classification = classify_struct(parse_quote! {
            pub struct Order {
                #[id]
                pub id: u64,
                pub total: u32,
                #[transient]
                pub notes: String,
                #[relation]
                pub customer: u64,
            }
        });

        assert_eq!(
            classification.roles,
            [
                FieldRole::Identifier,
                FieldRole::Persistent,
                FieldRole::Excluded,
                FieldRole::Relationship,
            ]
        );
        assert!(classification.warnings.is_empty());
    }

    #[test]
    fn exclusion_beats_identifier_with_warning() {
        let classification = classify_struct(parse_quote! {
            pub struct Order {
                #[id]
                #[transient]
                pub id: u64,
            }
        });

        assert_eq!(classification.roles, [FieldRole::Excluded]);
        assert_eq!(classification.warnings.len(), 1);
    }

    #[test]
    fn identifier_beats_relationship_with_warning() {
        let classification = classify_struct(parse_quote! {
            pub struct Order {
                #[id]
                #[relation]
                pub owner: u64,
            }
        });

        assert_eq!(classification.roles, [FieldRole::Identifier]);
        assert_eq!(classification.warnings.len(), 1);
    }

    #[test]
    fn phantom_data_is_excluded_unmarked() {
        let classification = classify_struct(parse_quote! {
            pub struct Tagged<T> {
                pub value: u32,
                pub _marker: std::marker::PhantomData<T>,
            }
        });

        assert_eq!(
            classification.roles,
            [FieldRole::Persistent, FieldRole::Excluded]
        );
        assert!(classification.warnings.is_empty());
    }

    #[test]
    fn no_fields_is_a_valid_classification() {
        let classification = classify_struct(parse_quote!(pub struct Empty {}));
        assert!(classification.roles.is_empty());
        assert!(classification.warnings.is_empty());
    }

    #[test]
    fn multiple_identifiers_warn() {
        let classification = classify_struct(parse_quote! {
            pub struct Odd {
                #[id]
                pub a: u64,
                #[id]
                pub b: u64,
            }
        });

        assert_eq!(
            classification.roles,
            [FieldRole::Identifier, FieldRole::Identifier]
        );
        assert_eq!(classification.warnings.len(), 1);
    }
}
