// src/lib.rs

pub mod compiler;
pub mod config;
pub mod core;
pub mod error;
pub mod persistence;

pub use crate::compiler::{ActorDictionary, AgentDictionary, VerbDictionary};
pub use crate::config::LexiconConfig;
pub use crate::core::context::{CompileContext, Diagnostic, DiagnosticKind};
pub use crate::core::date::to_ordinal;
pub use crate::core::engine::Lexicon;
pub use crate::core::segmenter::{segment, Segmenter};
pub use crate::error::{DateError, LexiconError};
