// src/compiler/actors.rs
//! Actor dictionary: name clusters with date-restricted codes.
//!
//! ```text
//! HAMID_KARZAI_  [AFGMIL]; CountryInfo.txt
//! +BABRAK_KARMAL_
//!     [AFGGOV 791227-861124]
//!     [AFGELI <791227]
//! ```
//!
//! Restriction lines start with a tab. Everything after `;` is a legacy
//! comment.

use crate::compiler::split_code;
use crate::core::context::{CompileContext, LineOutcome, Skip};
use crate::core::date::to_ordinal;
use crate::core::line_source::LineSource;
use crate::core::phrase::{split_words, Phrase};
use crate::core::trie::PhraseTrie;
use crate::core::types::{ActorCodeList, ClusterId, CodeEntry, OrdinalDate};
use crate::error::LexiconError;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::{Path, PathBuf};

const STOP_MARKER: &str = "---STOP---";

/// Actor phrases and the code table their clusters index into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorDictionary {
    pub phrases: PhraseTrie<ClusterId>,
    pub codes: Vec<ActorCodeList>,
}

impl ActorDictionary {
    /// Code list of the cluster a phrase of running text belongs to.
    pub fn lookup(&self, phrase: &str) -> Option<&ActorCodeList> {
        let id = *self.phrases.find_words(&split_words(phrase)).first()?;
        self.codes.get(id)
    }

    /// Code that applies to `phrase` on `date`.
    pub fn code_on(&self, phrase: &str, date: OrdinalDate) -> Option<&str> {
        self.lookup(phrase)?.select(date)
    }

    pub fn cluster_count(&self) -> usize {
        self.codes.len()
    }
}

pub fn compile_actor_dictionary(
    path: &Path,
    ctx: &mut CompileContext,
) -> Result<ActorDictionary, LexiconError> {
    compile_actor_dictionaries(std::slice::from_ref(&path.to_path_buf()), ctx)
}

/// Compiles several actor files into one dictionary. Clusters from later
/// files are appended to the same code table.
pub fn compile_actor_dictionaries(
    paths: &[PathBuf],
    ctx: &mut CompileContext,
) -> Result<ActorDictionary, LexiconError> {
    let mut dict = ActorDictionary::default();
    for path in paths {
        tracing::info!(file = %path.display(), "reading actor dictionary");
        let mut source = LineSource::open(path, "actor")?;
        read_actors(&mut source, &mut dict, ctx)?;
        source.close();
    }
    tracing::info!(
        phrases = dict.phrases.len(),
        clusters = dict.codes.len(),
        "actor dictionary compiled"
    );
    Ok(dict)
}

/// Reads one actor file into `dict`. The last cluster in the file is
/// finalized on `---STOP---` and at end of input alike.
pub fn read_actors<R: BufRead>(
    source: &mut LineSource<R>,
    dict: &mut ActorDictionary,
    ctx: &mut CompileContext,
) -> Result<(), LexiconError> {
    let mut builder = ActorBuilder { dict, current: None, write_root: ctx.write_actor_root };
    while let Some(line) = source.next_line()? {
        if line.contains(STOP_MARKER) {
            tracing::debug!(file = source.file_name(), line = source.line_number(), "stop marker");
            break;
        }
        let outcome = builder.handle(&line);
        ctx.settle(source, outcome);
    }
    builder.finalize();
    Ok(())
}

struct OpenCluster {
    id: ClusterId,
    root: String,
}

struct ActorBuilder<'d> {
    dict: &'d mut ActorDictionary,
    current: Option<OpenCluster>,
    write_root: bool,
}

impl ActorBuilder<'_> {
    fn handle(&mut self, line: &str) -> LineOutcome {
        if line.starts_with('\t') {
            return self.add_restriction(line.trim());
        }
        // legacy `;` comments
        let text = line.split(';').next().unwrap_or_default().trim();
        match text.strip_prefix('+') {
            Some(synonym) => self.add_synonym(synonym),
            None => self.open_cluster(text),
        }
    }

    fn open_cluster(&mut self, text: &str) -> LineOutcome {
        let (phrase, code) = split_code(text);
        let edges = Phrase::parse(phrase).rooted_edges();
        if edges.is_empty() {
            return Err(Skip::malformed("actor line has no phrase"));
        }

        self.finalize();
        let id = self.dict.codes.len();
        self.dict.codes.push(ActorCodeList {
            entries: code.map(CodeEntry::Unrestricted).into_iter().collect(),
            root: None,
        });
        self.dict.phrases.insert(edges, id);
        self.current = Some(OpenCluster { id, root: phrase.to_string() });
        Ok(())
    }

    fn add_synonym(&mut self, text: &str) -> LineOutcome {
        let Some(cluster) = &self.current else {
            return Err(Skip::malformed("synonym appears before any actor"));
        };
        let (phrase, _) = split_code(text);
        let edges = Phrase::parse(phrase).rooted_edges();
        if edges.is_empty() {
            return Err(Skip::malformed("synonym line has no phrase"));
        }
        self.dict.phrases.insert(edges, cluster.id);
        Ok(())
    }

    fn add_restriction(&mut self, text: &str) -> LineOutcome {
        let Some(cluster) = &self.current else {
            return Err(Skip::malformed("date restriction appears before any actor"));
        };
        let entry = parse_restriction(text)?;
        self.dict.codes[cluster.id].entries.push(entry);
        Ok(())
    }

    fn finalize(&mut self) {
        let Some(cluster) = self.current.take() else {
            return;
        };
        let list = &mut self.dict.codes[cluster.id];
        tracing::debug!(root = %cluster.root, entries = list.entries.len(), "actor cluster finalized");
        if self.write_root {
            list.root = Some(cluster.root);
        }
    }
}

/// Parses `[CODE]`, `[CODE <date]`, `[CODE >date]` or `[CODE date-date]`.
pub fn parse_restriction(text: &str) -> LineOutcome<CodeEntry> {
    let inner = text
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
        .map(|(inner, _)| inner.trim())
        .ok_or_else(|| Skip::malformed("date restriction is not bracketed"))?;
    let (code, rest) = match inner.split_once(char::is_whitespace) {
        Some((code, rest)) => (code, rest.trim()),
        None => (inner, ""),
    };
    if code.is_empty() {
        return Err(Skip::malformed("date restriction has no code"));
    }
    let code = code.to_string();

    if rest.is_empty() {
        return Ok(CodeEntry::Unrestricted(code));
    }
    if let Some(date) = rest.strip_prefix('<') {
        return Ok(CodeEntry::Before(to_ordinal(leading_digits(date))?, code));
    }
    if let Some(date) = rest.strip_prefix('>') {
        return Ok(CodeEntry::After(to_ordinal(leading_digits(date))?, code));
    }
    if let Some((first, last)) = rest.split_once('-') {
        let start = to_ordinal(first.trim())?;
        let end = to_ordinal(last.trim())?;
        if end < start {
            return Err(Skip::malformed(format!("interval {rest} ends before it starts")));
        }
        return Ok(CodeEntry::Interval { start, end, code });
    }
    Err(Skip::malformed(format!("unrecognised date restriction {rest:?}")))
}

fn leading_digits(text: &str) -> &str {
    let text = text.trim_start();
    let end = text.find(|c: char| !c.is_ascii_digit()).unwrap_or(text.len());
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::context::DiagnosticKind;
    use std::io::Cursor;

    fn compile(text: &str, write_root: bool) -> (ActorDictionary, CompileContext) {
        let mut ctx = CompileContext::new(write_root);
        let mut dict = ActorDictionary::default();
        let mut source = LineSource::from_reader(Cursor::new(text.to_string()), "test.actors");
        read_actors(&mut source, &mut dict, &mut ctx).unwrap();
        (dict, ctx)
    }

    fn day(date: &str) -> OrdinalDate {
        to_ordinal(date).unwrap()
    }

    #[test]
    fn interval_selects_restricted_code() {
        let (dict, ctx) = compile("KARZAI [AFGMIL]\n\t[AFGGOV 791227-861124]\n", false);
        assert!(ctx.diagnostics().is_empty());
        assert_eq!(dict.code_on("KARZAI", day("19830101")), Some("AFGGOV"));
        assert_eq!(dict.code_on("KARZAI", day("19900101")), Some("AFGMIL"));
    }

    #[test]
    fn no_fallback_means_no_code() {
        let (dict, _) = compile("KARZAI\n\t[AFGGOV 791227-861124]\n", false);
        assert_eq!(dict.code_on("KARZAI", day("19900101")), None);
        assert_eq!(dict.code_on("KARZAI", day("861124")), Some("AFGGOV"));
    }

    #[test]
    fn synonyms_share_their_cluster() {
        let text = "\
HAMID_KARZAI_  [AFGMIL]; CountryInfo.txt
+BABRAK_KARMAL_  ; CountryInfo.txt
\t[AFGGOV 791227-861124]
ABDUL_QADIR_
\t[AFGELI]
";
        let (dict, _) = compile(text, true);
        assert_eq!(dict.cluster_count(), 2);
        let karmal = dict.lookup("Babrak Karmal").unwrap();
        assert_eq!(karmal, dict.lookup("HAMID_KARZAI").unwrap());
        assert_eq!(karmal.root.as_deref(), Some("HAMID_KARZAI_"));
        assert_eq!(dict.code_on("ABDUL QADIR", 1), Some("AFGELI"));
    }

    #[test]
    fn trailing_cluster_is_kept() {
        let (dict, _) = compile("A [X]\nB\n\t[Y >20010101]\n", true);
        let b = dict.lookup("B").unwrap();
        assert_eq!(b.entries, vec![CodeEntry::After(day("20010101"), "Y".into())]);
        assert_eq!(b.root.as_deref(), Some("B"));
    }

    #[test]
    fn stop_marker_ends_reading() {
        let (dict, _) = compile("A [X]\n\t[Z <20010101]\n---STOP---\nB [Y]\n", false);
        assert_eq!(dict.cluster_count(), 1);
        assert!(dict.lookup("B").is_none());
        assert_eq!(dict.lookup("A").unwrap().entries.len(), 2);
    }

    #[test]
    fn bad_restrictions_skip_only_themselves() {
        let text = "A [X]\n\t[Y 20100931-20110101]\n\t[Y 20110101-20100101]\n\t[Y ~soon]\n\t[Z 20100101-20100102]\n";
        let (dict, ctx) = compile(text, false);
        let kinds: Vec<_> = ctx.diagnostics().iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DiagnosticKind::DateError, DiagnosticKind::MalformedEntry, DiagnosticKind::MalformedEntry]
        );
        assert_eq!(ctx.diagnostics()[0].line, 2);
        assert_eq!(dict.lookup("A").unwrap().entries.len(), 2);
    }

    #[test]
    fn restriction_forms() {
        assert_eq!(parse_restriction("[AFG]").unwrap(), CodeEntry::Unrestricted("AFG".into()));
        assert_eq!(
            parse_restriction("[AFG < 450703]").unwrap(),
            CodeEntry::Before(day("19450703"), "AFG".into())
        );
        assert!(parse_restriction("AFG 450703").is_err());
        assert!(parse_restriction("[]").is_err());
    }

    #[test]
    fn bad_primary_line_leaves_open_cluster_alone() {
        let (dict, ctx) = compile("KARZAI [AFGMIL]\n[BROKEN]\n\t[AFGGOV 791227-861124]\n+HAMID_KARZAI\n", false);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].line, 2);
        assert_eq!(dict.cluster_count(), 1);
        assert_eq!(dict.lookup("KARZAI").unwrap().entries.len(), 2);
        assert_eq!(dict.code_on("HAMID KARZAI", day("19830101")), Some("AFGGOV"));
    }

    #[test]
    fn restriction_before_any_actor() {
        let (dict, ctx) = compile("\t[X]\n+Y\n", false);
        assert_eq!(ctx.diagnostics().len(), 2);
        assert_eq!(dict.cluster_count(), 0);
    }
}
