//! Module scanning for entity declarations.
//!
//! One scan walks the module tree handed to `#[entity_module]` and collects
//! every struct carrying the entity marker (a `FieldMap` entry in its derive
//! list) that has not been processed yet, together with the existing item
//! names of each module so the builder can run its collision check. The
//! scan never mutates anything; splicing is the injector's job.

use std::collections::{BTreeMap, BTreeSet};

use syn::{Attribute, Ident, Item, ItemMod, ItemStruct};

use crate::inject::InjectionRecord;

/// One entity declaration waiting to be processed.
#[derive(Debug)]
pub struct PendingEntity {
    /// Idents of the module chain enclosing the declaration, outermost
    /// first, starting at the macro invocation root.
    pub module_path: Vec<Ident>,

    /// Qualified name relative to the invocation root, e.g. `shop::Order`.
    pub qualified: String,

    /// The declaration itself, cloned for read-only inspection.
    pub item: ItemStruct,
}

/// Everything one scan learned about the tree.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Unprocessed entities, in tree order.
    pub pending: Vec<PendingEntity>,

    /// Item names per qualified module path, for collision checks.
    pub siblings: BTreeMap<String, BTreeSet<String>>,
}

/// Walks a module tree collecting pending entities.
pub struct ModuleScanner<'a> {
    record: &'a InjectionRecord,
    attempted: &'a BTreeSet<String>,
    path: Vec<Ident>,
    outcome: ScanOutcome,
}

impl<'a> ModuleScanner<'a> {
    /// Scan `module`, skipping declarations already recorded as injected
    /// and declarations that failed in an earlier round.
    pub fn scan(
        module: &ItemMod,
        record: &'a InjectionRecord,
        attempted: &'a BTreeSet<String>,
    ) -> ScanOutcome {
        let mut scanner = ModuleScanner {
            record,
            attempted,
            path: Vec::new(),
            outcome: ScanOutcome::default(),
        };
        scanner.scan_module(module);
        scanner.outcome
    }

    fn scan_module(&mut self, module: &ItemMod) {
        self.path.push(module.ident.clone());

        if let Some((_, items)) = &module.content {
            let module_key = qualified_path(&self.path);

            let names: BTreeSet<String> = items.iter().filter_map(item_name).collect();
            self.outcome.siblings.insert(module_key.clone(), names);

            for item in items {
                match item {
                    Item::Struct(item) if has_field_map_derive(&item.attrs) => {
                        let qualified = format!("{module_key}::{}", item.ident);
                        if !self.record.contains(&qualified)
                            && !self.attempted.contains(&qualified)
                        {
                            self.outcome.pending.push(PendingEntity {
                                module_path: self.path.clone(),
                                qualified,
                                item: item.clone(),
                            });
                        }
                    }
                    // Out-of-line members have no body to scan or splice.
                    Item::Mod(inner) => self.scan_module(inner),
                    _ => {}
                }
            }
        }

        self.path.pop();
    }
}

/// Join a module ident chain into a qualified path string.
pub fn qualified_path(path: &[Ident]) -> String {
    path.iter()
        .map(Ident::to_string)
        .collect::<Vec<_>>()
        .join("::")
}

/// Whether the declaration's derive list names `FieldMap`.
///
/// Matches on the final path segment so both `FieldMap` and
/// `fieldmap::FieldMap` count.
pub fn has_field_map_derive(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if !attr.path().is_ident("derive") {
            return false;
        }
        let mut found = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta
                .path
                .segments
                .last()
                .is_some_and(|segment| segment.ident == "FieldMap")
            {
                found = true;
            }
            Ok(())
        });
        found
    })
}

fn item_name(item: &Item) -> Option<String> {
    let ident = match item {
        Item::Struct(item) => &item.ident,
        Item::Enum(item) => &item.ident,
        Item::Union(item) => &item.ident,
        Item::Type(item) => &item.ident,
        Item::Const(item) => &item.ident,
        Item::Static(item) => &item.ident,
        Item::Trait(item) => &item.ident,
        Item::Mod(item) => &item.ident,
        Item::Fn(item) => &item.sig.ident,
        _ => return None,
    };
    Some(ident.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn scan_fresh(module: &ItemMod) -> ScanOutcome {
        let record = InjectionRecord::default();
        let attempted = BTreeSet::new();
        ModuleScanner::scan(module, &record, &attempted)
    }

    #[test]
    fn finds_marked_structs() {
        let module: ItemMod = parse_quote! {
            mod shop {
                #[derive(FieldMap)]
                pub struct Order {
                    pub id: u64,
                }

                pub struct Unmarked {
                    pub id: u64,
                }
            }
        };

        let outcome = scan_fresh(&module);
        assert_eq!(outcome.pending.len(), 1);
        assert_eq!(outcome.pending[0].qualified, "shop::Order");
    }

    #[test]
    fn finds_entities_in_nested_modules() {
        let module: ItemMod = parse_quote! {
            mod shop {
                pub mod archive {
                    #[derive(fieldmap::FieldMap)]
                    pub struct Retired {
                        pub id: u64,
                    }
                }
            }
        };

        let outcome = scan_fresh(&module);
        assert_eq!(outcome.pending.len(), 1);
        assert_eq!(outcome.pending[0].qualified, "shop::archive::Retired");
        assert_eq!(outcome.pending[0].module_path.len(), 2);
    }

    #[test]
    fn skips_recorded_declarations() {
        let module: ItemMod = parse_quote! {
            mod shop {
                #[derive(FieldMap)]
                pub struct Order {
                    pub id: u64,
                }
            }
        };

        let mut record = InjectionRecord::default();
        record.mark("shop::Order".to_string());
        let attempted = BTreeSet::new();

        let outcome = ModuleScanner::scan(&module, &record, &attempted);
        assert!(outcome.pending.is_empty());
    }

    #[test]
    fn sibling_names_cover_all_item_kinds() {
        let module: ItemMod = parse_quote! {
            mod shop {
                pub struct OrderFieldMap;
                pub const LIMIT: usize = 8;
                pub fn helper() {}
            }
        };

        let outcome = scan_fresh(&module);
        let names = outcome.siblings.get("shop").unwrap();
        assert!(names.contains("OrderFieldMap"));
        assert!(names.contains("LIMIT"));
        assert!(names.contains("helper"));
    }

    #[test]
    fn derive_detection_requires_exact_segment() {
        let marked: ItemStruct = parse_quote! {
            #[derive(Clone, FieldMap)]
            struct A;
        };
        assert!(has_field_map_derive(&marked.attrs));

        let lookalike: ItemStruct = parse_quote! {
            #[derive(FieldMapper)]
            struct B;
        };
        assert!(!has_field_map_derive(&lookalike.attrs));
    }
}
