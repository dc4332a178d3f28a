// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop compilation or persistence outright.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("could not open the {kind} file {}: {source}", path.display())]
    FileNotFound {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read failed in {file} after line {line}: {source}")]
    Read {
        file: String,
        line: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An unparseable or impossible calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date {input:?}: {reason}")]
pub struct DateError {
    pub input: String,
    pub reason: &'static str,
}

impl DateError {
    pub(crate) fn new(input: &str, reason: &'static str) -> Self {
        Self { input: input.to_string(), reason }
    }
}
