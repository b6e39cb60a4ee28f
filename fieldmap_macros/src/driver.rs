//! Processing driver.
//!
//! Orchestrates one classify/build/synthesize/inject cycle per entity per
//! round, looping until a scan turns up nothing unprocessed. A declaration
//! that fails is remembered in a separate attempted-set so it is neither
//! rescanned forever nor falsely recorded as augmented. Diagnostics from
//! every phase merge into one stream attributed to the originating
//! declaration.

use std::collections::{BTreeMap, BTreeSet};

use proc_macro2::TokenStream;
use quote::quote;
use syn::ItemMod;

use crate::classify;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::generate::companion;
use crate::inject::{self, InjectionRecord};
use crate::mapper;
use crate::parse::attributes::ModuleOptions;
use crate::parse::entity::EntityVisitor;
use crate::parse::module::{ModuleScanner, PendingEntity, ScanOutcome, qualified_path};

/// Pipeline phase, tracked per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Phase {
    Idle,
    Scanning,
    Classifying,
    Building,
    Synthesizing,
    Injecting,
}

/// One pipeline run over one module tree.
pub struct Driver {
    options: ModuleOptions,
    record: InjectionRecord,
    attempted: BTreeSet<String>,
    diagnostics: Diagnostics,
    phase: Phase,
}

impl Driver {
    pub fn new(options: ModuleOptions) -> Self {
        Self {
            options,
            record: InjectionRecord::default(),
            attempted: BTreeSet::new(),
            diagnostics: Diagnostics::new(),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Number of declarations augmented so far in this run.
    pub fn injected_count(&self) -> usize {
        self.record.len()
    }

    /// Process `module` to a fixpoint.
    ///
    /// Rounds repeat until a scan finds no unprocessed entity, so the
    /// driver converges even when earlier rounds changed the tree. A fatal
    /// diagnostic aborts the remaining work for the whole round.
    pub fn run(&mut self, module: &mut ItemMod) {
        loop {
            self.phase = Phase::Scanning;
            let ScanOutcome { pending, siblings } =
                ModuleScanner::scan(module, &self.record, &self.attempted);
            if pending.is_empty() {
                break;
            }

            for entity in pending {
                if let Err(fatal) = self.process(module, entity, &siblings) {
                    self.diagnostics.push(fatal);
                    self.phase = Phase::Idle;
                    return;
                }
            }
        }
        self.phase = Phase::Idle;
    }

    /// Run one entity through the remaining phases. Per-declaration
    /// failures are absorbed into the diagnostic stream; only a fatal
    /// condition propagates.
    fn process(
        &mut self,
        module: &mut ItemMod,
        pending: PendingEntity,
        siblings: &BTreeMap<String, BTreeSet<String>>,
    ) -> Result<(), Diagnostic> {
        self.phase = Phase::Classifying;
        let entity = match EntityVisitor::parse_struct(&pending.item) {
            Ok(entity) => entity,
            Err(diagnostic) => {
                self.fail(pending.qualified, diagnostic);
                return Ok(());
            }
        };
        let classification = classify::classify(&entity);
        self.diagnostics.extend(classification.warnings);

        self.phase = Phase::Building;
        let module_key = qualified_path(&pending.module_path);
        let no_siblings = BTreeSet::new();
        let sibling_names = siblings.get(&module_key).unwrap_or(&no_siblings);
        let model = match mapper::build(&entity, &classification.roles, sibling_names) {
            Ok(model) => model,
            Err(diagnostic) => {
                self.fail(pending.qualified, diagnostic);
                return Ok(());
            }
        };

        self.phase = Phase::Synthesizing;
        let fragment = companion::synthesize(&model, &self.options);

        self.phase = Phase::Injecting;
        match inject::inject(
            module,
            &pending.module_path,
            &pending.qualified,
            fragment,
            &mut self.record,
        ) {
            Ok(()) => Ok(()),
            Err(diagnostic) if diagnostic.is_fatal() => Err(diagnostic),
            Err(diagnostic) => {
                self.fail(pending.qualified, diagnostic);
                Ok(())
            }
        }
    }

    fn fail(&mut self, qualified: String, diagnostic: Diagnostic) {
        self.attempted.insert(qualified);
        self.diagnostics.push(diagnostic);
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}

/// Expand `#[entity_module(..)]`.
pub fn expand_module(args: TokenStream, mut module: ItemMod) -> TokenStream {
    let options = match ModuleOptions::parse(args) {
        Ok(options) => options,
        Err(error) => {
            let error = error.to_compile_error();
            return quote! { #module #error };
        }
    };

    // Out-of-line modules carry no member list to splice into.
    if module.content.is_none() {
        let diagnostic = Diagnostic::host_mismatch(
            module.ident.span(),
            "#[entity_module] needs an inline module body",
        );
        let diagnostic = diagnostic.into_tokens();
        return quote! { #module #diagnostic };
    }

    let mut driver = Driver::new(options);
    driver.run(&mut module);
    let diagnostics = driver.into_diagnostics().into_tokens();

    quote! {
        #module
        #diagnostics
    }
}
