// File: src/core/context.rs
use crate::core::line_source::LineSource;
use crate::error::DateError;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    MalformedEntry,
    DateError,
    UndefinedReference,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::MalformedEntry => "malformed entry",
            DiagnosticKind::DateError => "date error",
            DiagnosticKind::UndefinedReference => "undefined reference",
        })
    }
}

/// Why one dictionary line (or one entry of it) was not stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Skip {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self { kind: DiagnosticKind::MalformedEntry, message: message.into() }
    }

    pub fn undefined(message: impl Into<String>) -> Self {
        Self { kind: DiagnosticKind::UndefinedReference, message: message.into() }
    }
}

impl From<DateError> for Skip {
    fn from(err: DateError) -> Self {
        Self { kind: DiagnosticKind::DateError, message: err.to_string() }
    }
}

/// Result of handling one line: stored, or skipped with a reason.
pub type LineOutcome<T = ()> = Result<T, Skip>;

/// A skipped line, located in its source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub line: usize,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.file, self.line, self.kind, self.message)
    }
}

/// State shared by the compilers for one compilation run. Dropped when the
/// run ends; nothing here outlives it except the diagnostics handed back.
#[derive(Debug, Default)]
pub struct CompileContext {
    /// Keep the primary phrase text with each actor code list.
    pub write_actor_root: bool,
    diagnostics: Vec<Diagnostic>,
}

impl CompileContext {
    pub fn new(write_actor_root: bool) -> Self {
        Self { write_actor_root, diagnostics: Vec::new() }
    }

    /// Logs and records a skip at the source's current line.
    pub fn record<R>(&mut self, source: &LineSource<R>, skip: Skip) {
        tracing::warn!(
            file = source.file_name(),
            line = source.line_number(),
            kind = %skip.kind,
            "{}; line skipped",
            skip.message
        );
        self.diagnostics.push(Diagnostic {
            file: source.file_name().to_string(),
            line: source.line_number(),
            kind: skip.kind,
            message: skip.message,
        });
    }

    /// Records the skip, if any, carried by `outcome`.
    pub fn settle<R>(&mut self, source: &LineSource<R>, outcome: LineOutcome) {
        if let Err(skip) = outcome {
            self.record(source, skip);
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
