// --- File: src/core/trie.rs
use crate::core::types::Connector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Index of a node in the trie arena.
pub type NodeId = usize;

/// Key of an edge between two trie nodes.
///
/// Word-like edges carry the connector that links the token to the token
/// before it on the path. Edges leaving the root carry `Gap`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Edge {
    Word { text: String, connector: Connector },
    /// Reference to a synset, stored under its `&NAME`.
    Synset { name: String, connector: Connector },
    /// Pattern slot matching any single token (`+`, `$`, `%`).
    Wildcard { marker: String, connector: Connector },
    /// Ends a path segment. The last edge of every inserted path is a boundary.
    Boundary,
}

impl Edge {
    pub fn root(word: &str) -> Self {
        Edge::Word { text: word.to_string(), connector: Connector::Gap }
    }

    pub fn word(text: &str, connector: Connector) -> Self {
        Edge::Word { text: text.to_string(), connector }
    }

    pub fn connector(&self) -> Option<Connector> {
        match self {
            Edge::Word { connector, .. }
            | Edge::Synset { connector, .. }
            | Edge::Wildcard { connector, .. } => Some(*connector),
            Edge::Boundary => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Edge::Word { text, .. } => Some(text),
            Edge::Synset { name, .. } => Some(name),
            Edge::Wildcard { marker, .. } => Some(marker),
            Edge::Boundary => None,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.text() {
            Some(text) => f.write_str(text),
            None => f.write_str("#"),
        }
    }
}

/// Renders a path the way dictionaries write phrases: `_` and ` ` between
/// tokens, `#` for boundaries.
pub fn render_path<'a, I>(path: I) -> String
where
    I: IntoIterator<Item = &'a Edge>,
{
    let mut out = String::new();
    for (i, edge) in path.into_iter().enumerate() {
        if i > 0 {
            out.push(edge.connector().unwrap_or(Connector::Gap).symbol());
        }
        out.push_str(&edge.to_string());
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct TrieNode<P> {
    children: BTreeMap<Edge, NodeId>,
    payloads: Vec<P>,
}

impl<P> TrieNode<P> {
    fn new() -> Self {
        Self { children: BTreeMap::new(), payloads: Vec::new() }
    }
}

/// One stored phrase, flattened for dumps.
#[derive(Debug, Clone, Serialize)]
pub struct PhraseEntry<'a, P> {
    pub path: String,
    pub payload: &'a P,
}

/// An arena trie of phrases keyed by uppercase tokens.
///
/// Nodes are never removed, so a `NodeId` stays valid for the trie's lifetime.
/// Children are ordered, which keeps node numbering and dumps deterministic
/// for a given insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseTrie<P> {
    nodes: Vec<TrieNode<P>>,
    phrases: usize,
}

impl<P> Default for PhraseTrie<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> PhraseTrie<P> {
    pub const ROOT: NodeId = 0;

    pub fn new() -> Self {
        Self { nodes: vec![TrieNode::new()], phrases: 0 }
    }

    /// Inserts `path` followed by a terminal boundary holding `payload`.
    /// Shared prefixes reuse existing nodes. O(k log b) for k edges.
    pub fn insert<I>(&mut self, path: I, payload: P) -> NodeId
    where
        I: IntoIterator<Item = Edge>,
    {
        let mut node_idx = Self::ROOT;
        for edge in path.into_iter().chain(std::iter::once(Edge::Boundary)) {
            node_idx = match self.nodes[node_idx].children.get(&edge) {
                Some(&id) => id,
                None => {
                    let new_node_id = self.nodes.len();
                    self.nodes.push(TrieNode::new());
                    self.nodes[node_idx].children.insert(edge, new_node_id);
                    new_node_id
                }
            };
        }
        self.nodes[node_idx].payloads.push(payload);
        self.phrases += 1;
        node_idx
    }

    pub fn child(&self, node: NodeId, edge: &Edge) -> Option<NodeId> {
        self.nodes.get(node)?.children.get(edge).copied()
    }

    /// Node reached from the root by `word`, if any phrase starts with it.
    pub fn root(&self, word: &str) -> Option<NodeId> {
        self.child(Self::ROOT, &Edge::root(word))
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = (&Edge, NodeId)> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|n| n.children.iter().map(|(edge, &id)| (edge, id)))
    }

    pub fn payloads(&self, node: NodeId) -> &[P] {
        self.nodes.get(node).map(|n| n.payloads.as_slice()).unwrap_or(&[])
    }

    /// Payloads of phrases that end exactly at `node`.
    pub fn terminal(&self, node: NodeId) -> &[P] {
        self.child(node, &Edge::Boundary)
            .map(|end| self.payloads(end))
            .unwrap_or(&[])
    }

    pub fn walk<'a, I>(&self, path: I) -> Option<NodeId>
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        path.into_iter()
            .try_fold(Self::ROOT, |node, edge| self.child(node, edge))
    }

    /// Payloads stored for exactly `path`.
    pub fn find<'a, I>(&self, path: I) -> &[P]
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        self.walk(path).map(|node| self.terminal(node)).unwrap_or(&[])
    }

    /// Payloads of a phrase spelled by consecutive `words` of running text.
    /// Consecutive words satisfy either connector, so both edge kinds are tried.
    pub fn find_words(&self, words: &[&str]) -> &[P] {
        self.words_from(Self::ROOT, words)
    }

    fn words_from(&self, node: NodeId, words: &[&str]) -> &[P] {
        let Some((first, rest)) = words.split_first() else {
            return self.terminal(node);
        };
        let text = first.to_uppercase();
        for connector in [Connector::Adjacent, Connector::Gap] {
            if let Some(next) = self.child(node, &Edge::word(&text, connector)) {
                let found = self.words_from(next, rest);
                if !found.is_empty() {
                    return found;
                }
            }
        }
        &[]
    }

    /// Distinct first words, in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.children(Self::ROOT).filter_map(|(edge, _)| edge.text())
    }

    /// Number of inserted phrases (including duplicates).
    pub fn len(&self) -> usize {
        self.phrases
    }

    pub fn is_empty(&self) -> bool {
        self.phrases == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Every stored phrase in depth-first, key order.
    pub fn entries(&self) -> Vec<PhraseEntry<'_, P>> {
        let mut out = Vec::with_capacity(self.phrases);
        let mut path = Vec::new();
        self.collect_entries(Self::ROOT, &mut path, &mut out);
        out
    }

    fn collect_entries<'a>(
        &'a self,
        node_idx: NodeId,
        path: &mut Vec<&'a Edge>,
        out: &mut Vec<PhraseEntry<'a, P>>,
    ) {
        let node = &self.nodes[node_idx];
        if !node.payloads.is_empty() {
            // the terminal boundary is implied
            let rendered = render_path(path[..path.len() - 1].iter().copied());
            for payload in &node.payloads {
                out.push(PhraseEntry { path: rendered.clone(), payload });
            }
        }
        for (edge, &child_idx) in &node.children {
            path.push(edge);
            self.collect_entries(child_idx, path, out);
            path.pop();
        }
    }
}
