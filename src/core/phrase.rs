// src/core/phrase.rs
//! Splits dictionary phrases into tokens and turns them into trie paths.

use crate::core::trie::Edge;
use crate::core::types::Connector;

/// A token together with the connector that links it to the next token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub after: Connector,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phrase {
    /// Separator written before the first token, if any.
    pub lead: Option<Connector>,
    pub tokens: Vec<Token>,
}

fn separator(ch: char) -> Option<Connector> {
    if ch == '_' {
        Some(Connector::Adjacent)
    } else if ch.is_whitespace() {
        Some(Connector::Gap)
    } else {
        None
    }
}

impl Phrase {
    /// Breaks `text` on blanks and underscores. A run of separators counts as a
    /// gap if it contains any blank.
    pub fn parse(text: &str) -> Self {
        let mut phrase = Phrase::default();
        let mut current = String::new();
        let mut run: Option<Connector> = None;

        for ch in text.chars() {
            match separator(ch) {
                Some(sep) => {
                    if !current.is_empty() {
                        phrase.tokens.push(Token {
                            text: std::mem::take(&mut current),
                            after: Connector::Gap,
                        });
                    }
                    run = Some(match (run, sep) {
                        (Some(Connector::Gap), _) | (_, Connector::Gap) => Connector::Gap,
                        _ => Connector::Adjacent,
                    });
                }
                None => {
                    if let Some(sep) = run.take() {
                        match phrase.tokens.last_mut() {
                            Some(last) => last.after = sep,
                            None => phrase.lead = Some(sep),
                        }
                    }
                    current.push(ch);
                }
            }
        }

        if !current.is_empty() {
            phrase.tokens.push(Token { text: current, after: Connector::Gap });
        } else if let (Some(sep), Some(last)) = (run, phrase.tokens.last_mut()) {
            last.after = sep;
        }
        phrase
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.tokens.first().map(|t| t.text.as_str())
    }

    /// Path for a phrase stored under its own first word.
    pub fn rooted_edges(&self) -> Vec<Edge> {
        let Some((first, rest)) = self.tokens.split_first() else {
            return Vec::new();
        };
        let mut edges = vec![Edge::root(&first.text.to_uppercase())];
        edges.extend(forward(first.after, rest, literal_edge));
        edges
    }

    /// Edges in reading order for a phrase that follows an already-placed
    /// token, linked to it by `lead`.
    pub fn forward_edges(&self, lead: Connector, classify: fn(&str, Connector) -> Edge) -> Vec<Edge> {
        forward(lead, &self.tokens, classify)
    }

    /// Edges walking outward from the token that follows the phrase: last
    /// token first, each carrying the connector toward its right neighbour.
    pub fn reverse_edges(&self, classify: fn(&str, Connector) -> Edge) -> Vec<Edge> {
        self.tokens
            .iter()
            .rev()
            .map(|t| classify(&t.text, t.after))
            .collect()
    }
}

fn forward(lead: Connector, tokens: &[Token], classify: fn(&str, Connector) -> Edge) -> Vec<Edge> {
    let mut connector = lead;
    tokens
        .iter()
        .map(|t| {
            let edge = classify(&t.text, connector);
            connector = t.after;
            edge
        })
        .collect()
}

/// Words of a lookup phrase, ignoring how they were joined.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Plain word edge, uppercased.
pub fn literal_edge(text: &str, connector: Connector) -> Edge {
    Edge::word(&text.to_uppercase(), connector)
}

/// Edge for a verb-pattern token: `&NAME` synset references, `+ $ %` slots,
/// or a literal word.
pub fn pattern_edge(text: &str, connector: Connector) -> Edge {
    if text.starts_with('&') {
        Edge::Synset { name: text.to_uppercase(), connector }
    } else if matches!(text, "+" | "$" | "%") {
        Edge::Wildcard { marker: text.to_string(), connector }
    } else {
        literal_edge(text, connector)
    }
}
