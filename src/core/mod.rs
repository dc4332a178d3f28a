// src/core/mod.rs
pub mod context;
pub mod date;
pub mod engine;
pub mod line_source;
pub mod morphology;
pub mod phrase;
pub mod segmenter;
pub mod trie;
pub mod types;
