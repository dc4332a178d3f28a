// src/compiler/mod.rs
pub mod actors;
pub mod agents;
pub mod verbs;

pub use actors::{compile_actor_dictionaries, compile_actor_dictionary, ActorDictionary};
pub use agents::{compile_agent_dictionary, AgentDictionary};
pub use verbs::{compile_verb_dictionary, VerbDictionary};

/// Splits `text [CODE] rest` into the trimmed text before `[` and the code
/// inside the brackets. An empty `[]` counts as no code.
pub(crate) fn split_code(line: &str) -> (&str, Option<String>) {
    match line.split_once('[') {
        Some((before, after)) => {
            let code = after.split(']').next().unwrap_or_default().trim();
            let code = (!code.is_empty()).then(|| code.to_string());
            (before.trim(), code)
        }
        None => (line.trim(), None),
    }
}
