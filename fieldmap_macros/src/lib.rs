//! Proc-macros for the `fieldmap` crate.
//!
//! Two entry points share one pipeline (classify → build → synthesize):
//!
//! - [`FieldMap`](derive@FieldMap): derive implementing
//!   `fieldmap::FieldMapped` for a single struct. Its presence in a derive
//!   list is also what marks a struct as an entity.
//! - [`entity_module`](macro@entity_module): attribute macro that scans a
//!   module for entity structs and splices a companion field-map type into
//!   the module's own syntax tree, so the generated members type-check in
//!   the same compilation unit as the hand-written ones.

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemMod, parse_macro_input};

mod classify;
mod diagnostics;
mod driver;
mod generate;
mod inject;
mod mapper;
mod parse;

/// Derives `fieldmap::FieldMapped` for a struct.
///
/// # Field markers
///
/// - `#[id]`: the persistence identifier
/// - `#[transient]`: excluded from mapping
/// - `#[relation]`: an association, tracked separately and never mapped
///
/// All other named fields are mapped as persistent state, in declaration
/// order. A field carrying conflicting markers resolves to the safe role
/// (exclusion wins) and raises a warning.
///
/// # Example
///
/// ```rust,ignore
/// use fieldmap::{FieldMap, FieldMapped};
///
/// #[derive(FieldMap)]
/// pub struct Order {
///     #[id]
///     pub id: u64,
///     pub total: u32,
///     #[transient]
///     pub notes: String,
/// }
///
/// assert_eq!(Order::FIELD_NAMES, ["id", "total"]);
/// ```
#[proc_macro_derive(FieldMap, attributes(id, transient, relation))]
pub fn field_map_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    generate::trait_impl::expand_derive(&input).into()
}

/// Injects a companion field-map type for every entity struct in a module.
///
/// Each struct deriving `FieldMap` gets a `{Name}FieldMap` companion
/// appended to its enclosing module: one `&'static str` constant per
/// mapped field, aggregate `NAMES`/`IDENTIFIER`/`RELATIONS` constants,
/// const `contains`/`position` lookups, and getter/setter accessors on the
/// entity itself. Existing members are never reordered or rewritten, and
/// reprocessing the same tree never injects twice.
///
/// # Options
///
/// - `inline`: mark the generated accessors `#[inline]`. Classification
///   and naming are unaffected.
///
/// # Example
///
/// ```rust,ignore
/// use fieldmap::{entity_module, FieldMap};
///
/// #[entity_module(inline)]
/// mod shop {
///     use super::*;
///
///     #[derive(FieldMap)]
///     pub struct Order {
///         #[id]
///         pub id: u64,
///         pub total: u32,
///     }
/// }
///
/// assert_eq!(shop::OrderFieldMap::NAMES, ["id", "total"]);
/// ```
#[proc_macro_attribute]
pub fn entity_module(args: TokenStream, input: TokenStream) -> TokenStream {
    let module = parse_macro_input!(input as ItemMod);
    driver::expand_module(args.into(), module).into()
}
