//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use fieldmap::prelude::*;
//! ```

pub use crate::traits::FieldMapped;
pub use crate::{FieldMap, entity_module};
