//! Diagnostic taxonomy and collection.
//!
//! Every failure in the pipeline becomes a [`Diagnostic`] attributed to the
//! originating declaration's span. Errors render as `compile_error!`
//! invocations; warnings render as items that trigger the `deprecated` lint
//! at the offending span, which is the stable way for a proc macro to
//! surface a non-fatal message through rustc.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote_spanned;
use thiserror::Error;

/// The failure modes of the mapping pipeline.
#[derive(Debug, Error)]
pub enum DiagnosticKind {
    /// A field carries more than one structural marker. Auto-resolved;
    /// the winning role is reported and compilation continues.
    #[error("conflicting field markers on `{field}`: {resolved}")]
    ClassificationConflict { field: String, resolved: String },

    /// The companion type name is already taken by pre-existing code.
    /// Fatal for the one declaration; the rest of the module is processed.
    #[error("`{entity}` already has a sibling named `{taken}`, field mapper not injected")]
    NameCollision { entity: String, taken: String },

    /// The marked declaration is not a struct with (zero or more) named
    /// fields. Fatal for the one declaration.
    #[error("{0}")]
    UnsupportedDeclarationShape(String),

    /// The tree handed to the injector does not have the shape the whole
    /// pipeline depends on. Aborts the processing round.
    #[error("host tree mismatch: {0}")]
    HostApiMismatch(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
    Fatal,
}

/// One reported condition, pinned to a source span.
#[derive(Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub span: Span,
}

impl Diagnostic {
    pub fn conflict(span: Span, field: impl Into<String>, resolved: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::ClassificationConflict {
                field: field.into(),
                resolved: resolved.into(),
            },
            span,
        }
    }

    pub fn name_collision(span: Span, entity: impl Into<String>, taken: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::NameCollision {
                entity: entity.into(),
                taken: taken.into(),
            },
            span,
        }
    }

    pub fn unsupported_shape(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::UnsupportedDeclarationShape(message.into()),
            span,
        }
    }

    pub fn host_mismatch(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::HostApiMismatch(message.into()),
            span,
        }
    }

    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::ClassificationConflict { .. } => Severity::Warning,
            DiagnosticKind::NameCollision { .. } => Severity::Error,
            DiagnosticKind::UnsupportedDeclarationShape(_) => Severity::Error,
            DiagnosticKind::HostApiMismatch(_) => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Render into tokens appended to the macro output.
    pub fn into_tokens(self) -> TokenStream {
        let message = format!("fieldmap: {}", self.kind);
        match self.severity() {
            Severity::Warning => warning_tokens(self.span, &message),
            Severity::Error | Severity::Fatal => {
                syn::Error::new(self.span, message).to_compile_error()
            }
        }
    }
}

/// An item that trips the `deprecated` lint at `span`, carrying `message`
/// as the deprecation note. Rustc reports it as an ordinary warning.
fn warning_tokens(span: Span, message: &str) -> TokenStream {
    let marker = Ident::new("FieldMapWarning", span);
    quote_spanned! {span=>
        const _: () = {
            #[allow(dead_code)]
            fn fieldmap_warning() {
                #[deprecated(note = #message)]
                struct #marker;
                let _ = #marker;
            }
        };
    }
}

/// Accumulates diagnostics across declarations and phases, so one bad
/// declaration never hides the reports for its siblings.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.entries.extend(diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity() >= Severity::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Render the whole stream, warnings and errors alike.
    pub fn into_tokens(self) -> TokenStream {
        self.entries
            .into_iter()
            .map(Diagnostic::into_tokens)
            .collect()
    }
}
