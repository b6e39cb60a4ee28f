//! Tree injection.
//!
//! The one place that mutates host tree state. The injector locates the
//! target module node by ident-path identity and appends the synthesized
//! fragment to its member list. Splicing is append-only: pre-existing
//! members are never reordered, rewritten or re-spanned. Everything that
//! depends on the host tree's concrete shape lives behind [`inject`], so a
//! host-side change surfaces in exactly one module.
//!
//! In this host, membership in the emitted token tree is symbol
//! registration: the spliced items are re-expanded with the module and
//! resolve in the same compilation unit as the hand-written members.

use std::collections::BTreeSet;

use proc_macro2::Span;
use syn::visit_mut::VisitMut;
use syn::{Ident, Item, ItemMod};

use crate::diagnostics::Diagnostic;
use crate::generate::companion::SyntheticFragment;

/// Tracks which declarations have been augmented in the current run.
///
/// Scoped to one pipeline run over one tree; created empty by the driver
/// and discarded with it. Never a process-lifetime singleton, so repeated
/// compilations in a long-lived build server cannot leak state across runs.
#[derive(Debug, Default)]
pub struct InjectionRecord {
    completed: BTreeSet<String>,
}

impl InjectionRecord {
    pub fn contains(&self, qualified: &str) -> bool {
        self.completed.contains(qualified)
    }

    pub fn mark(&mut self, qualified: String) {
        self.completed.insert(qualified);
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }
}

/// Splice `fragment` into the module at `target_path` under `root`.
///
/// A declaration already present in `record` is an idempotent no-op, which
/// is what makes multi-round reprocessing safe. Failure to locate a
/// spliceable target is a `HostApiMismatch`: the tree no longer has the
/// shape the scan saw, and partial results would be untrustworthy.
pub fn inject(
    root: &mut ItemMod,
    target_path: &[Ident],
    qualified: &str,
    fragment: SyntheticFragment,
    record: &mut InjectionRecord,
) -> Result<(), Diagnostic> {
    if record.contains(qualified) {
        return Ok(());
    }

    let mut splicer = Splicer {
        path: target_path,
        depth: 0,
        fragment: Some(fragment),
    };
    splicer.visit_item_mod_mut(root);

    if splicer.fragment.is_some() {
        return Err(Diagnostic::host_mismatch(
            Span::call_site(),
            format!(
                "no spliceable module at `{}`",
                crate::parse::module::qualified_path(target_path)
            ),
        ));
    }

    record.mark(qualified.to_string());
    Ok(())
}

/// Walks the module tree along `path` and appends the fragment at the end
/// of the target module's member list.
struct Splicer<'a> {
    path: &'a [Ident],
    depth: usize,
    fragment: Option<SyntheticFragment>,
}

impl VisitMut for Splicer<'_> {
    fn visit_item_mod_mut(&mut self, module: &mut ItemMod) {
        if self.fragment.is_none()
            || self.depth >= self.path.len()
            || module.ident != self.path[self.depth]
        {
            return;
        }

        if self.depth == self.path.len() - 1 {
            if let Some((_, items)) = &mut module.content
                && let Some(fragment) = self.fragment.take()
            {
                items.extend(fragment.items);
            }
            return;
        }

        self.depth += 1;
        if let Some((_, items)) = &mut module.content {
            for item in items.iter_mut() {
                if let Item::Mod(inner) = item {
                    self.visit_item_mod_mut(inner);
                }
            }
        }
        self.depth -= 1;
    }
}
