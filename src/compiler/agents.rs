// src/compiler/agents.rs
//! Agent dictionary: role phrases and the code they add to an actor.
//!
//! ```text
//! !PERSON! = MAN, MEN, WOMAN, WOMEN
//! PRESIDENT [~GOVPRS]
//! ATTORNEY_GENERAL {ATTORNEYS_GENERAL} [~GOVATG]
//! AIR_FORCE {} [~MIL]
//! HUMAN_RIGHTS_BODY [NGO~]
//! CONGRESS!PERSON! [~LEG]
//! ```

use crate::compiler::split_code;
use crate::core::context::{CompileContext, LineOutcome, Skip};
use crate::core::line_source::LineSource;
use crate::core::morphology::agent_plural;
use crate::core::phrase::{split_words, Phrase};
use crate::core::trie::PhraseTrie;
use crate::core::types::{AgentCode, Attachment};
use crate::error::LexiconError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDictionary {
    pub phrases: PhraseTrie<AgentCode>,
}

impl AgentDictionary {
    pub fn lookup(&self, phrase: &str) -> Option<&AgentCode> {
        self.phrases.find_words(&split_words(phrase)).first()
    }
}

pub fn compile_agent_dictionary(
    path: &Path,
    ctx: &mut CompileContext,
) -> Result<AgentDictionary, LexiconError> {
    tracing::info!(file = %path.display(), "reading agent dictionary");
    let mut source = LineSource::open(path, "agent")?;
    let dict = read_agents(&mut source, ctx)?;
    source.close();
    tracing::info!(phrases = dict.phrases.len(), "agent dictionary compiled");
    Ok(dict)
}

/// Substitution markers only live for the file that defines them.
pub fn read_agents<R: BufRead>(
    source: &mut LineSource<R>,
    ctx: &mut CompileContext,
) -> Result<AgentDictionary, LexiconError> {
    let mut builder = AgentBuilder::default();
    while let Some(line) = source.next_line()? {
        let outcome = builder.handle(line.trim());
        ctx.settle(source, outcome);
    }
    Ok(builder.dict)
}

#[derive(Default)]
struct AgentBuilder {
    dict: AgentDictionary,
    markers: HashMap<String, Vec<String>>,
}

impl AgentBuilder {
    fn handle(&mut self, line: &str) -> LineOutcome {
        if line.starts_with('!') && line.contains('=') {
            return self.define_marker(line);
        }

        let (body, code) = split_code(line);
        let Some(code) = code else {
            return Err(Skip::malformed("agent line has no [code]"));
        };
        let code = parse_agent_code(&code)?;

        let (phrase, plural) = match body.split_once('{') {
            Some((phrase, rest)) => {
                let Some((plural, _)) = rest.split_once('}') else {
                    return Err(Skip::malformed("missing '}' after plural"));
                };
                (phrase.trim(), Some(plural.trim()))
            }
            None => (body, None),
        };
        let phrase = phrase.trim_end_matches('_').to_uppercase();
        if phrase.is_empty() {
            return Err(Skip::malformed("agent line has no phrase"));
        }

        if phrase.contains('!') {
            return self.expand_marker(&phrase, &code);
        }

        self.store(&phrase, &code);
        match plural {
            None => self.store(&agent_plural(&phrase), &code),
            Some("") => {}
            Some(plural) => self.store(&plural.to_uppercase(), &code),
        }
        Ok(())
    }

    fn define_marker(&mut self, line: &str) -> LineOutcome {
        let Some((name, rest)) = line[1..].split_once('!') else {
            return Err(Skip::malformed("substitution marker is missing its closing '!'"));
        };
        let Some((_, items)) = rest.split_once('=') else {
            return Err(Skip::malformed("substitution marker is missing '='"));
        };
        let items: Vec<String> = items
            .split(',')
            .map(|item| item.trim().to_uppercase())
            .filter(|item| !item.is_empty())
            .collect();
        tracing::debug!(marker = %name, items = items.len(), "substitution marker defined");
        self.markers.insert(name.trim().to_uppercase(), items);
        Ok(())
    }

    /// One entry per marker item. Expansions never get plurals.
    fn expand_marker(&mut self, phrase: &str, code: &AgentCode) -> LineOutcome {
        let Some((head, rest)) = phrase.split_once('!') else {
            return Ok(());
        };
        let Some((name, tail)) = rest.split_once('!') else {
            return Err(Skip::malformed(format!("substitution marker in {phrase} is not closed")));
        };
        let Some(items) = self.markers.get(name).cloned() else {
            return Err(Skip::undefined(format!("substitution marker !{name}! has not been defined")));
        };
        for item in items {
            self.store(&format!("{head}{item}{tail}"), code);
        }
        Ok(())
    }

    fn store(&mut self, phrase: &str, code: &AgentCode) {
        let edges = Phrase::parse(phrase).rooted_edges();
        if !edges.is_empty() {
            self.dict.phrases.insert(edges, code.clone());
        }
    }
}

/// `~GOV` attaches after the actor code, `NGO~` before it.
fn parse_agent_code(raw: &str) -> LineOutcome<AgentCode> {
    let (code, attachment) = if let Some(code) = raw.strip_prefix('~') {
        (code, Attachment::Suffix)
    } else if let Some(code) = raw.strip_suffix('~') {
        (code, Attachment::Prefix)
    } else {
        tracing::debug!(code = raw, "agent code without '~', attaching as suffix");
        (raw, Attachment::Suffix)
    };
    let code = code.trim();
    if code.is_empty() || code.contains(char::is_whitespace) {
        return Err(Skip::malformed(format!("bad agent code {raw:?}")));
    }
    Ok(AgentCode { code: code.to_string(), attachment })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::DiagnosticKind;
    use std::io::Cursor;

    fn compile(text: &str) -> (AgentDictionary, CompileContext) {
        let mut ctx = CompileContext::default();
        let mut source = LineSource::from_reader(Cursor::new(text.to_string()), "test.agents");
        let dict = read_agents(&mut source, &mut ctx).unwrap();
        (dict, ctx)
    }

    fn suffix(code: &str) -> AgentCode {
        AgentCode { code: code.into(), attachment: Attachment::Suffix }
    }

    #[test]
    fn regular_plural_shares_code() {
        let (dict, ctx) = compile("PRESIDENT [~GOVPRS] # ns 6/26/01\n");
        assert!(ctx.diagnostics().is_empty());
        assert_eq!(dict.lookup("PRESIDENT"), Some(&suffix("GOVPRS")));
        assert_eq!(dict.lookup("presidents"), Some(&suffix("GOVPRS")));
        assert_eq!(dict.phrases.len(), 2);
    }

    #[test]
    fn plural_override_and_suppression() {
        let text = "ATTORNEY_GENERAL {ATTORNEYS_GENERAL} [~GOVATG]\nAIR_FORCE {} [~MIL]\n";
        let (dict, _) = compile(text);
        assert_eq!(dict.lookup("ATTORNEYS GENERAL"), Some(&suffix("GOVATG")));
        assert!(dict.lookup("ATTORNEY_GENERALS").is_none());
        assert_eq!(dict.lookup("AIR FORCE"), Some(&suffix("MIL")));
        assert!(dict.lookup("AIR FORCES").is_none());
    }

    #[test]
    fn prefix_attachment() {
        let (dict, _) = compile("HUMAN_RIGHTS_BODY  [NGO~]\n");
        let body = dict.lookup("HUMAN RIGHTS BODIES").unwrap();
        assert_eq!(body.attachment, Attachment::Prefix);
        assert_eq!(body.to_string(), "NGO~");
    }

    #[test]
    fn marker_expands_without_plurals() {
        let text = "!PERSON! = MAN, MEN, WOMAN\nCONGRESS!PERSON! [~LEG]\n";
        let (dict, ctx) = compile(text);
        assert!(ctx.diagnostics().is_empty());
        for word in ["CONGRESSMAN", "CONGRESSMEN", "CONGRESSWOMAN"] {
            assert_eq!(dict.lookup(word), Some(&suffix("LEG")), "{word}");
        }
        assert!(dict.lookup("CONGRESSMANS").is_none());
        assert_eq!(dict.phrases.len(), 3);
    }

    #[test]
    fn undefined_marker_and_missing_code_are_skipped() {
        let (dict, ctx) = compile("!MINIST!_OF_DEFENSE [~GOVDEF]\nTROOP\nTROOP [~MIL]\n");
        let kinds: Vec<_> = ctx.diagnostics().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![DiagnosticKind::UndefinedReference, DiagnosticKind::MalformedEntry]);
        assert_eq!(dict.lookup("TROOPS"), Some(&suffix("MIL")));
    }

    #[test]
    fn header_comment_block_is_not_compiled() {
        let (dict, ctx) = compile("<!-- header block\nSPY [~SPY]\n-->\nPRESIDENT [~GOVPRS]\n");
        assert!(ctx.diagnostics().is_empty(), "{:?}", ctx.diagnostics());
        assert!(dict.lookup("SPY").is_none());
        assert_eq!(dict.lookup("PRESIDENT"), Some(&suffix("GOVPRS")));
    }

    #[test]
    fn markers_do_not_leak_between_files() {
        let (_, _) = compile("!X! = A\n");
        let (dict, ctx) = compile("B!X! [~C]\n");
        assert_eq!(ctx.diagnostics().len(), 1);
        assert!(dict.phrases.is_empty());
    }
}
