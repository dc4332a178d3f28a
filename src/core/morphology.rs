// src/core/morphology.rs
//! Regular English forms generated for dictionary roots. Roots are expected
//! in uppercase, as dictionaries are written.

/// Third-person, past and progressive forms of a regular verb root.
pub fn verb_inflections(root: &str) -> [String; 3] {
    let third = if root.ends_with(['S', 'X', 'Z']) {
        format!("{root}ES")
    } else {
        format!("{root}S")
    };
    match root.strip_suffix('E') {
        Some(stem) => [third, format!("{root}D"), format!("{stem}ING")],
        None => [third, format!("{root}ED"), format!("{root}ING")],
    }
}

/// Plural of a synset member: `Y` becomes `IES`, anything else takes `S`.
pub fn synset_plural(phrase: &str) -> String {
    match phrase.strip_suffix('Y') {
        Some(stem) => format!("{stem}IES"),
        None => format!("{phrase}S"),
    }
}

/// Plural of an agent phrase: `Y` becomes `IES`, a final `S` takes `ES`,
/// anything else takes `S`.
pub fn agent_plural(phrase: &str) -> String {
    if let Some(stem) = phrase.strip_suffix('Y') {
        format!("{stem}IES")
    } else if phrase.ends_with('S') {
        format!("{phrase}ES")
    } else {
        format!("{phrase}S")
    }
}
