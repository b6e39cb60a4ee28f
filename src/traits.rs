//! Traits implemented by macro-generated code.

/// Trait for entity structs whose fields have been mapped.
///
/// This trait is automatically implemented via the `#[derive(FieldMap)]`
/// macro; it is not intended to be implemented by hand. All items are
/// associated constants, so the mapping is usable in const contexts and
/// carries no runtime state.
pub trait FieldMapped {
    /// Mapped field names, in declaration order.
    ///
    /// Contains the identifier field and every persistent field; excluded
    /// and relationship fields never appear here.
    const FIELD_NAMES: &'static [&'static str];

    /// Name of the field marked `#[id]`, when one is present.
    const IDENTIFIER: Option<&'static str>;

    /// Names of `#[relation]` fields, in declaration order.
    ///
    /// Relationships are tracked separately so callers can tell a mapped
    /// scalar from an association; they are never plain mapping constants.
    const RELATIONS: &'static [&'static str];

    /// Whether `name` is a mapped field of this entity.
    fn has_field(name: &str) -> bool {
        crate::lookup::contains(Self::FIELD_NAMES, name)
    }
}
