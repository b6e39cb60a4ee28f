//! Mapper model construction.
//!
//! Consumes a role assignment and produces the language-agnostic
//! description of what to generate: the companion type name, the ordered
//! constant set, the tracked relationship names and the accessor
//! signatures. Naming is deterministic; the only probing against existing
//! code is the single companion-name collision check.

use std::collections::BTreeSet;

use heck::ToShoutySnakeCase;
use proc_macro2::Span;
use quote::format_ident;
use syn::ext::IdentExt;
use syn::{Generics, Ident, Type, Visibility};

use crate::classify::FieldRole;
use crate::diagnostics::Diagnostic;
use crate::parse::metadata::EntityMetadata;

/// One `(constant name, field name literal)` pair of the mapper.
#[derive(Debug)]
pub struct MapperConstant {
    pub const_ident: Ident,
    pub field_name: String,
    pub role: FieldRole,
}

/// Signature of one generated accessor pair.
#[derive(Debug)]
pub struct AccessorSig {
    /// Field ident, also the getter name. Respanned to the generated
    /// position.
    pub field: Ident,
    pub ty: Type,
    pub vis: Visibility,
    pub setter: Ident,
}

/// Description of the companion type to synthesize for one entity.
#[derive(Debug)]
pub struct MapperModel {
    pub entity: Ident,
    pub generics: Generics,
    pub companion: Ident,
    pub constants: Vec<MapperConstant>,
    pub identifier: Option<String>,
    pub relations: Vec<String>,
    pub accessors: Vec<AccessorSig>,
}

/// The fixed naming transformation: `Order` → `OrderFieldMap`.
pub fn companion_ident(entity: &Ident) -> Ident {
    format_ident!("{}FieldMap", entity)
}

/// The fixed constant naming transformation: `total_price` → `TOTAL_PRICE`.
pub fn constant_ident(field: &Ident) -> Ident {
    Ident::new(
        &field.unraw().to_string().to_shouty_snake_case(),
        Span::call_site(),
    )
}

/// Build the mapper model for `entity` under the given role assignment.
///
/// `siblings` holds the names of items already present in the enclosing
/// module; a pre-existing item with the companion's name fails the build
/// with a `NameCollision` rather than silently overwriting user code.
/// Zero eligible fields still yields a valid, empty model.
pub fn build(
    entity: &EntityMetadata,
    roles: &[FieldRole],
    siblings: &BTreeSet<String>,
) -> Result<MapperModel, Diagnostic> {
    let companion = companion_ident(&entity.name);
    if siblings.contains(&companion.to_string()) {
        return Err(Diagnostic::name_collision(
            entity.span,
            entity.name.to_string(),
            companion.to_string(),
        ));
    }

    let mut constants = Vec::new();
    let mut identifier = None;
    let mut relations = Vec::new();
    let mut accessors = Vec::new();

    for (field, role) in entity.fields.iter().zip(roles) {
        let field_name = field.name.unraw().to_string();
        match role {
            FieldRole::Identifier | FieldRole::Persistent => {
                if *role == FieldRole::Identifier && identifier.is_none() {
                    identifier = Some(field_name.clone());
                }
                constants.push(MapperConstant {
                    const_ident: constant_ident(&field.name),
                    field_name,
                    role: *role,
                });

                let mut getter = field.name.clone();
                getter.set_span(Span::call_site());
                accessors.push(AccessorSig {
                    setter: format_ident!("set_{}", field.name),
                    field: getter,
                    ty: field.ty.clone(),
                    vis: field.vis.clone(),
                });
            }
            FieldRole::Relationship => relations.push(field_name),
            FieldRole::Excluded => {}
        }
    }

    Ok(MapperModel {
        entity: entity.name.clone(),
        generics: entity.generics.clone(),
        companion,
        constants,
        identifier,
        relations,
        accessors,
    })
}
