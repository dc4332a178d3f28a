// src/compiler/verbs.rs
//! Verb dictionary: synonym blocks, synsets and event patterns.
//!
//! ```text
//! &CURRENCY
//! +DOLLARS
//! +SWISS FRANCS
//!
//! --- GRANT [070] ---
//! GRANT
//! GIVE {GAVE GIVEN GIVING}
//! WIRE_+TRANSFER
//! - * &CURRENCY [903]
//! - * RUPEES [071]
//! ```
//!
//! Surface forms are stored under their inflectable root word as
//! `root, following words.., #, preceding words (reversed).., #`. Patterns
//! use the same layout under the block anchor: `anchor, lower.., #, upper
//! reversed.., #`, so matching can proceed outward from the verb.

use crate::compiler::split_code;
use crate::core::context::{CompileContext, LineOutcome, Skip};
use crate::core::line_source::LineSource;
use crate::core::morphology::{synset_plural, verb_inflections};
use crate::core::phrase::{literal_edge, pattern_edge, split_words, Phrase};
use crate::core::trie::{Edge, NodeId, PhraseTrie};
use crate::core::types::{Code, Connector, PatternRecord, VerbForm, NULL_CODE};
use crate::error::LexiconError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::io::BufRead;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbDictionary {
    /// Surface forms keyed by their inflectable root word.
    pub forms: PhraseTrie<VerbForm>,
    /// Patterns keyed by block anchor.
    pub patterns: PhraseTrie<PatternRecord>,
    /// Synset member phrases, each resolving to its `&NAME`.
    pub synsets: PhraseTrie<String>,
    synset_names: BTreeSet<String>,
}

impl VerbDictionary {
    /// The stored entry for a single-word surface form.
    pub fn form(&self, word: &str) -> Option<&VerbForm> {
        self.forms
            .find(&[Edge::root(&word.to_uppercase()), Edge::Boundary])
            .first()
    }

    pub fn has_synset(&self, name: &str) -> bool {
        self.synset_names.contains(&name.to_uppercase())
    }

    pub fn synset_names(&self) -> impl Iterator<Item = &str> {
        self.synset_names.iter().map(String::as_str)
    }

    /// Synset names a literal member phrase resolves to.
    pub fn synsets_of(&self, phrase: &str) -> &[String] {
        self.synsets.find_words(&split_words(phrase))
    }

    /// Code for `verb` given the words right before and right after it.
    ///
    /// Only literal, contiguous context is followed; the longest lower match
    /// wins, then the longest upper match. Without a pattern match the
    /// surface form's own code is returned. `None` if `verb` is unknown.
    pub fn resolve(&self, verb: &str, preceding: &[&str], following: &[&str]) -> Option<&str> {
        let form = self.form(verb)?;
        let Some(anchor) = self.patterns.root(&form.meaning) else {
            return Some(&form.code);
        };

        let mut lower_path = vec![anchor];
        for word in following {
            match self.step(*lower_path.last()?, word) {
                Some(next) => lower_path.push(next),
                None => break,
            }
        }

        for (depth, &lower) in lower_path.iter().enumerate().rev() {
            let Some(mut upper) = self.patterns.child(lower, &Edge::Boundary) else {
                continue;
            };
            // the bare anchor entry is the block default, not a pattern
            let mut best = if depth > 0 { self.patterns.terminal(upper).first() } else { None };
            for word in preceding.iter().rev() {
                match self.step(upper, word) {
                    Some(next) => {
                        upper = next;
                        if let Some(record) = self.patterns.terminal(upper).first() {
                            best = Some(record);
                        }
                    }
                    None => break,
                }
            }
            if let Some(record) = best {
                return Some(&record.code);
            }
        }
        Some(&form.code)
    }

    fn step(&self, node: NodeId, word: &str) -> Option<NodeId> {
        let word = word.to_uppercase();
        self.patterns
            .child(node, &Edge::word(&word, Connector::Gap))
            .or_else(|| self.patterns.child(node, &Edge::word(&word, Connector::Adjacent)))
    }
}

/// Compiles the verb dictionary at `path`. Only a missing or unreadable
/// file is an error; bad lines are recorded in `ctx` and skipped.
pub fn compile_verb_dictionary(
    path: &Path,
    ctx: &mut CompileContext,
) -> Result<VerbDictionary, LexiconError> {
    tracing::info!(file = %path.display(), "reading verb dictionary");
    let mut source = LineSource::open(path, "verb")?;
    let dict = read_verbs(&mut source, ctx)?;
    source.close();
    tracing::info!(
        forms = dict.forms.len(),
        patterns = dict.patterns.len(),
        synsets = dict.synset_names.len(),
        "verb dictionary compiled"
    );
    Ok(dict)
}

pub fn read_verbs<R: BufRead>(
    source: &mut LineSource<R>,
    ctx: &mut CompileContext,
) -> Result<VerbDictionary, LexiconError> {
    let mut builder = VerbBuilder::default();
    while let Some(line) = source.next_line()? {
        let outcome = builder.handle(&line, source.line_number());
        ctx.settle(source, outcome);
    }
    Ok(builder.dict)
}

struct OpenSynset {
    name: String,
    plurals: bool,
}

struct VerbBuilder {
    dict: VerbDictionary,
    block_code: Code,
    awaiting_primary: bool,
    anchor: Option<String>,
    synset: Option<OpenSynset>,
}

impl Default for VerbBuilder {
    fn default() -> Self {
        Self {
            dict: VerbDictionary::default(),
            block_code: NULL_CODE.to_string(),
            awaiting_primary: true,
            anchor: None,
            synset: None,
        }
    }
}

impl VerbBuilder {
    fn handle(&mut self, line: &str, line_no: usize) -> LineOutcome {
        let trimmed = line.trim();

        if self.synset.is_some() {
            if let Some(member) = trimmed.strip_prefix('+') {
                return self.add_synset_member(member);
            }
            self.synset = None;
        }

        let (body, code) = split_code(trimmed);
        if body.starts_with("---") {
            self.block_code = code.unwrap_or_else(|| NULL_CODE.to_string());
            self.awaiting_primary = true;
            Ok(())
        } else if let Some(pattern) = body.strip_prefix('-') {
            self.add_pattern(pattern, code, line_no)
        } else if body.starts_with('&') {
            self.open_synset(body)
        } else {
            self.add_verb(body, code, line_no)
        }
    }

    fn open_synset(&mut self, header: &str) -> LineOutcome {
        let plurals = !header.ends_with('_');
        let name = header.trim_end_matches('_').to_uppercase();
        if name.len() < 2 || name.contains(char::is_whitespace) {
            return Err(Skip::malformed(format!("bad synset name {header:?}")));
        }
        tracing::debug!(synset = %name, plurals, "synset defined");
        self.dict.synset_names.insert(name.clone());
        self.synset = Some(OpenSynset { name, plurals });
        Ok(())
    }

    fn add_synset_member(&mut self, member: &str) -> LineOutcome {
        let Some(synset) = &self.synset else {
            return Ok(());
        };
        let member = member.trim();
        let singular_only = !synset.plurals || member.ends_with('_');
        let words = member.replace('_', " ").trim().to_uppercase();
        if words.is_empty() {
            return Err(Skip::malformed(format!("empty member in synset {}", synset.name)));
        }

        let name = synset.name.clone();
        self.dict
            .synsets
            .insert(Phrase::parse(&words).rooted_edges(), name.clone());
        if !singular_only {
            self.dict
                .synsets
                .insert(Phrase::parse(&synset_plural(&words)).rooted_edges(), name);
        }
        Ok(())
    }

    fn add_pattern(&mut self, pattern: &str, code: Option<Code>, line_no: usize) -> LineOutcome {
        let Some(anchor) = self.anchor.clone() else {
            return Err(Skip::malformed("pattern appears before any verb"));
        };
        if pattern.contains('{') {
            return Err(Skip::malformed("disjunctive {...} patterns are not supported"));
        }
        let Some(code) = code else {
            return Err(Skip::malformed("pattern has no [code]"));
        };

        let text = pattern.replace("_ ", " ");
        let text = text.strip_suffix('_').unwrap_or(&text);
        let Some((upper, lower)) = text.split_once('*') else {
            return Err(Skip::malformed("pattern has no '*' marking the verb"));
        };
        let upper = Phrase::parse(upper.trim_start());
        let lower = Phrase::parse(lower.trim_end());

        if let Some(missing) = upper
            .tokens
            .iter()
            .chain(&lower.tokens)
            .map(|t| t.text.to_uppercase())
            .find(|t| t.starts_with('&') && !self.dict.synset_names.contains(t))
        {
            return Err(Skip::undefined(format!("synset {missing} has not been defined")));
        }

        let mut path = vec![Edge::root(&anchor)];
        path.extend(lower.forward_edges(lower.lead.unwrap_or(Connector::Gap), pattern_edge));
        path.push(Edge::Boundary);
        path.extend(upper.reverse_edges(pattern_edge));
        self.dict.patterns.insert(path, PatternRecord { meaning: anchor, code, line: line_no });
        Ok(())
    }

    fn add_verb(&mut self, body: &str, code: Option<Code>, line_no: usize) -> LineOutcome {
        let code = code.unwrap_or_else(|| self.block_code.clone());
        let (base, explicit) = match body.split_once('{') {
            Some((base, rest)) => {
                let Some((forms, _)) = rest.split_once('}') else {
                    return Err(Skip::malformed("missing '}' after verb forms"));
                };
                (base, Some(forms.split_whitespace().map(str::to_uppercase).collect::<Vec<_>>()))
            }
            None => (body, None),
        };
        // anything after the first blank is legacy annotation
        let Some(verb) = base.split_whitespace().next().map(str::to_uppercase) else {
            return Err(Skip::malformed("verb line has no verb"));
        };

        if self.awaiting_primary || self.anchor.is_none() {
            self.dict.patterns.insert(
                [Edge::root(&verb), Edge::Boundary],
                PatternRecord { meaning: verb.clone(), code: code.clone(), line: line_no },
            );
            self.anchor = Some(verb.clone());
            self.awaiting_primary = false;
        }
        let form = VerbForm {
            meaning: self.anchor.clone().unwrap_or_else(|| verb.clone()),
            code,
            line: line_no,
        };

        if verb.contains('_') {
            return self.add_multi_word(&verb, explicit, form);
        }

        let root = verb.trim_start_matches('+');
        let mut surfaces = vec![root.to_string()];
        match explicit {
            Some(forms) => surfaces.extend(forms),
            None => surfaces.extend(verb_inflections(root)),
        }
        for surface in surfaces {
            self.dict
                .forms
                .insert([Edge::root(&surface), Edge::Boundary], form.clone());
        }
        Ok(())
    }

    fn add_multi_word(&mut self, verb: &str, explicit: Option<Vec<String>>, form: VerbForm) -> LineOutcome {
        let mut surfaces = vec![verb.to_string()];
        match explicit {
            Some(forms) => surfaces.extend(forms),
            None => {
                let words: Vec<&str> = verb.split('_').collect();
                let Some(idx) = words.iter().position(|w| w.starts_with('+')) else {
                    return Err(Skip::malformed(format!(
                        "multi-word verb {verb} has no '+' marking its root"
                    )));
                };
                for inflected in verb_inflections(&words[idx][1..]) {
                    let marked = format!("+{inflected}");
                    let mut parts = words.clone();
                    parts[idx] = &marked;
                    surfaces.push(parts.join("_"));
                }
            }
        }

        let mut unmarked = Vec::new();
        for surface in surfaces {
            let words: Vec<&str> = surface.split('_').filter(|w| !w.is_empty()).collect();
            let Some(idx) = words.iter().position(|w| w.starts_with('+')) else {
                unmarked.push(surface);
                continue;
            };
            let mut path = vec![Edge::root(&words[idx][1..])];
            path.extend(words[idx + 1..].iter().map(|w| literal_edge(w, Connector::Adjacent)));
            path.push(Edge::Boundary);
            path.extend(words[..idx].iter().rev().map(|w| literal_edge(w, Connector::Adjacent)));
            self.dict.forms.insert(path, form.clone());
        }

        if unmarked.is_empty() {
            Ok(())
        } else {
            Err(Skip::malformed(format!(
                "forms {} of multi-word verb {verb} lack a '+' root marker",
                unmarked.join(", ")
            )))
        }
    }
}
