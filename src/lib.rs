//! # Fieldmap
//!
//! Compile-time field mappers for entity structs. A struct marked as an
//! entity gets a companion type of named field constants, spliced directly
//! into the enclosing module's syntax tree before the compiler type-checks
//! it. No generated source files, no reflection at runtime.
//!
//! ## Features
//!
//! - **Injected, not generated-to-disk**: the mapper is appended to the
//!   module tree the compiler is already processing
//! - **Field roles**: `#[id]`, `#[transient]` and `#[relation]` markers
//!   classify fields before mapping
//! - **Order-stable**: constants follow field declaration order
//! - **Const lookup**: `contains`/`position` resolve at compile time
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fieldmap::{entity_module, FieldMap};
//!
//! #[entity_module]
//! mod shop {
//!     use super::*;
//!
//!     #[derive(FieldMap)]
//!     pub struct Order {
//!         #[id]
//!         pub id: u64,
//!         pub total: u32,
//!         #[transient]
//!         pub notes: String,
//!     }
//! }
//!
//! assert_eq!(shop::OrderFieldMap::NAMES, ["id", "total"]);
//! assert_eq!(shop::OrderFieldMap::IDENTIFIER, Some("id"));
//! ```
//!
//! The derive alone also works outside an `#[entity_module]`; it implements
//! [`FieldMapped`] for the struct without injecting a companion type.

pub mod lookup;
pub mod prelude;
pub mod traits;

pub use fieldmap_macros::{FieldMap, entity_module};
pub use traits::FieldMapped;
