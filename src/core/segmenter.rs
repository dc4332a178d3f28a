// src/core/segmenter.rs
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Terminal punctuation, whitespace, then an uppercase letter or a quote.
static TERMINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[.?!]\s+[A-Z"]"#).expect("terminal pattern is valid"));

/// Titles, units and similar words whose period does not end a sentence.
static ABBREVIATIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "mrs.", "ms.", "mr.", "dr.", "gov.", "sr.", "rev.", "r.n.", "pres.", "treas.", "sect.",
        "maj.", "ph.d.", "proc.", "fr.", "asst.", "p.f.c.", "prof.", "admr.", "engr.", "mgr.",
        "supt.", "admin.", "assoc.", "voc.", "hon.", "m.d.", "dpty.", "sec.", "capt.", "c.e.o.",
        "c.f.o.", "c.i.o.", "c.o.o.", "c.p.a.", "c.n.a.", "acct.", "llc.", "inc.", "dir.",
        "esq.", "lt.", "d.d.", "ed.", "revd.", "psy.d.", "v.p.", "senr.", "gen.", "prov.",
        "cmdr.", "sgt.", "sen.", "col.", "lieut.", "cpl.", "pfc.", "k.p.h.", "cent.", "deg.",
        "doz.", "fahr.", "cel.", "f.", "c.", "k.", "ft.", "fur.", "gal.", "gr.", "in.", "kg.",
        "km.", "kw.", "l.", "lat.", "lb.", "long.", "mg.", "mm.", "m.p.g.", "m.p.h.", "cc.",
        "qr.", "qt.", "sq.", "t.", "vol.", "w.", "wt.",
    ]
    .into_iter()
    .collect()
});

/// Length bounds, in characters, for a segment to be kept. Both are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Segmenter {
    pub min_length: usize,
    pub max_length: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self { min_length: 100, max_length: 512 }
    }
}

impl Segmenter {
    pub fn segment<'a>(&self, text: &'a str) -> Sentences<'a> {
        Sentences { rest: text, search_from: 0, bounds: *self, exhausted: false }
    }

    /// Splits story text into sentences. Input that was already parsed
    /// upstream carries one sentence per line and is passed through.
    pub fn split_input<'a>(&self, text: &'a str, parsed: bool) -> Vec<&'a str> {
        if parsed {
            text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
        } else {
            self.segment(text).collect()
        }
    }

    /// Measured on the emitted span, punctuation and following character included.
    fn keeps(&self, candidate: &str) -> bool {
        let len = candidate.chars().count();
        len > self.min_length && len < self.max_length
    }
}

/// Segments `text` with the default 100–512 character bounds.
pub fn segment(text: &str) -> Sentences<'_> {
    Segmenter::default().segment(text)
}

/// Single pass over a paragraph. Candidates outside the length bounds are
/// dropped, never merged into a neighbour.
pub struct Sentences<'a> {
    rest: &'a str,
    search_from: usize,
    bounds: Segmenter,
    exhausted: bool,
}

impl<'a> Sentences<'a> {
    /// Whether the punctuation at byte `at` of the remaining text ends a sentence.
    fn ends_sentence(&self, at: usize) -> bool {
        let before = &self.rest[..at];
        if self.rest.as_bytes()[at] == b'.' {
            let mut prev = before.chars().rev();
            if let (Some(initial), Some(' ')) = (prev.next(), prev.next()) {
                if initial.is_uppercase() {
                    return false;
                }
            }
            let word_start = before.rfind(char::is_whitespace).map_or(0, |p| p + 1);
            let word = self.rest[word_start..=at].to_lowercase();
            if ABBREVIATIONS.contains(word.as_str()) {
                return false;
            }
        }
        if before.matches('(').count() != before.matches(')').count() {
            return false;
        }
        before.matches('"').count() % 2 == 0
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while !self.exhausted {
            let Some(found) = TERMINAL.find_at(self.rest, self.search_from) else {
                self.exhausted = true;
                let tail = self.rest;
                self.rest = "";
                if self.bounds.keeps(tail) {
                    return Some(tail);
                }
                break;
            };

            let at = found.start();
            if !self.ends_sentence(at) {
                self.search_from = at + 1;
                continue;
            }

            // keep the punctuation and the character after it
            let gap = self.rest[at + 1..].chars().next().map_or(0, char::len_utf8);
            let candidate = &self.rest[..at + 1 + gap];
            // the match ends on a one-byte capital or quote that opens the next sentence
            self.rest = &self.rest[found.end() - 1..];
            self.search_from = 0;
            if self.bounds.keeps(candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded(words: &str, len: usize) -> String {
        let mut s = String::from(words);
        while s.len() < len {
            s.push_str(" and more words");
        }
        s
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        let first = padded("The minister met the delegation in the capital", 120);
        let second = padded("Officials said the talks would continue next week", 120);
        let text = format!("{first}. {second}.");
        let sentences: Vec<_> = segment(&text).collect();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0], format!("{first}. "));
        assert_eq!(sentences[1], format!("{second}."));
    }

    #[test]
    fn abbreviation_and_initial_do_not_split() {
        let text = padded("Dr. Smith and J. Jones met Gen. Petraeus in the capital", 150);
        let sentences: Vec<_> = segment(&text).collect();
        assert_eq!(sentences, vec![text.as_str()]);
    }

    #[test]
    fn open_quote_or_parenthesis_blocks_split() {
        let inner = padded("\"We will not yield. Never", 110);
        let text = format!("{inner},\" he said (in a speech. Later) to reporters.");
        let sentences: Vec<_> = segment(&text).collect();
        assert_eq!(sentences, vec![text.as_str()]);
    }

    #[test]
    fn short_and_long_candidates_are_dropped() {
        let long = padded("A very long sentence", 600);
        let ok = padded("A sentence of reasonable size", 150);
        let text = format!("Too short. {long}. {ok}.");
        let sentences: Vec<_> = segment(&text).collect();
        assert_eq!(sentences, vec![format!("{ok}.")]);
    }

    #[test]
    fn bounds_apply_to_the_emitted_span() {
        let second = padded("Second sentence of the story", 150);
        // 99 characters plus ". " makes 101
        let kept = format!("A{}. {second}", "x".repeat(98));
        let sentences: Vec<_> = segment(&kept).collect();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].chars().count(), 101);

        let dropped = format!("A{}. {second}", "x".repeat(97));
        assert_eq!(segment(&dropped).collect::<Vec<_>>(), vec![second.as_str()]);
    }

    #[test]
    fn parsed_input_is_passed_through() {
        let seg = Segmenter::default();
        assert_eq!(seg.split_input("One.\n\n  Two. \n", true), vec!["One.", "Two."]);
    }

    #[test]
    fn custom_bounds() {
        let seg = Segmenter { min_length: 2, max_length: 50 };
        let sentences: Vec<_> = seg.segment("Rebels attacked. Troops responded!").collect();
        assert_eq!(sentences, vec!["Rebels attacked. ", "Troops responded!"]);
    }
}
