use crate::compiler::{
    compile_actor_dictionaries, compile_agent_dictionary, compile_verb_dictionary,
    ActorDictionary, AgentDictionary, VerbDictionary,
};
use crate::config::LexiconConfig;
use crate::core::context::{CompileContext, Diagnostic};
use crate::error::LexiconError;
use crate::persistence::{load_from_disk, save_to_disk};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The three compiled dictionaries of one run.
///
/// Built once and only read afterwards; share it behind an `Arc` to serve
/// concurrent lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    pub verbs: VerbDictionary,
    pub actors: ActorDictionary,
    pub agents: AgentDictionary,
    /// Lines skipped while compiling. Not part of a snapshot.
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl Lexicon {
    /// Compiles verbs, then actors, then agents. Fails only if a dictionary
    /// file cannot be opened or read.
    pub fn compile(config: &LexiconConfig) -> Result<Self, LexiconError> {
        let mut ctx = CompileContext::new(config.write_actor_root);
        let verbs = compile_verb_dictionary(&config.verb_file, &mut ctx)?;
        let actors = compile_actor_dictionaries(&config.actor_files, &mut ctx)?;
        let agents = compile_agent_dictionary(&config.agent_file, &mut ctx)?;

        let diagnostics = ctx.into_diagnostics();
        if !diagnostics.is_empty() {
            tracing::warn!(skipped = diagnostics.len(), "dictionary lines were skipped");
        }
        Ok(Self { verbs, actors, agents, diagnostics })
    }

    pub fn load(path: &Path) -> Result<Self, LexiconError> {
        load_from_disk(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), LexiconError> {
        save_to_disk(self, path)
    }
}
