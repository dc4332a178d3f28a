// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// A short category string assigned to a matched verb, actor or agent phrase.
pub type Code = String;

/// Day count where 1 Jan 1601 is day 1. Only ever compared, never rendered back.
pub type OrdinalDate = i64;

/// Index of a finalized code list in the actor table.
pub type ClusterId = usize;

/// Code used by a verb block that declares no code: the isolated verb yields no event.
pub const NULL_CODE: &str = "---";

/// Adjacency constraint between two consecutive tokens of a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Connector {
    /// Written `_`: no words may intervene.
    Adjacent,
    /// Written ` `: other words may intervene.
    Gap,
}

impl Connector {
    pub fn symbol(self) -> char {
        match self {
            Connector::Adjacent => '_',
            Connector::Gap => ' ',
        }
    }
}

/// Payload stored at the end of a verb surface-form path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbForm {
    /// The block anchor this form resolves to; indexes the pattern trie.
    pub meaning: String,
    pub code: Code,
    pub line: usize,
}

/// Payload stored at the end of a pattern path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub meaning: String,
    pub code: Code,
    pub line: usize,
}

/// One possibly date-restricted code of an actor cluster. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CodeEntry {
    Unrestricted(Code),
    Before(OrdinalDate, Code),
    After(OrdinalDate, Code),
    Interval {
        start: OrdinalDate,
        end: OrdinalDate,
        code: Code,
    },
}

impl CodeEntry {
    pub fn code(&self) -> &str {
        match self {
            CodeEntry::Unrestricted(code)
            | CodeEntry::Before(_, code)
            | CodeEntry::After(_, code)
            | CodeEntry::Interval { code, .. } => code,
        }
    }

    pub fn is_restricted(&self) -> bool {
        !matches!(self, CodeEntry::Unrestricted(_))
    }

    /// Whether the entry's date predicate holds. Unrestricted entries always hold.
    pub fn contains(&self, date: OrdinalDate) -> bool {
        match *self {
            CodeEntry::Unrestricted(_) => true,
            CodeEntry::Before(limit, _) => date <= limit,
            CodeEntry::After(limit, _) => date >= limit,
            CodeEntry::Interval { start, end, .. } => start <= date && date <= end,
        }
    }
}

/// The codes shared by a primary actor phrase and its synonyms.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorCodeList {
    pub entries: Vec<CodeEntry>,
    /// Literal text of the primary phrase, kept when `write_actor_root` is set.
    pub root: Option<String>,
}

impl ActorCodeList {
    /// Picks the code that applies on `date`.
    ///
    /// Date restrictions are tried in file order and the first one containing
    /// the date wins; otherwise the first unrestricted entry is the default.
    /// Returns `None` when nothing applies.
    pub fn select(&self, date: OrdinalDate) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.is_restricted() && entry.contains(date))
            .or_else(|| self.entries.iter().find(|entry| !entry.is_restricted()))
            .map(CodeEntry::code)
    }
}

/// Which side of the actor code an agent code is written on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attachment {
    /// Source form `CODE~`, e.g. `NGO~`.
    Prefix,
    /// Source form `~CODE`, e.g. `~GOV`.
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCode {
    pub code: Code,
    pub attachment: Attachment,
}

impl fmt::Display for AgentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attachment {
            Attachment::Prefix => write!(f, "{}~", self.code),
            Attachment::Suffix => write!(f, "~{}", self.code),
        }
    }
}
