// File: src/persistence.rs
use crate::compiler::{ActorDictionary, AgentDictionary, VerbDictionary};
use crate::core::engine::Lexicon;
use crate::error::LexiconError;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Bumped whenever the layout of a compiled dictionary changes.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    verbs: &'a VerbDictionary,
    actors: &'a ActorDictionary,
    agents: &'a AgentDictionary,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    verbs: VerbDictionary,
    actors: ActorDictionary,
    agents: AgentDictionary,
}

/// Writes the compiled dictionaries. The snapshot is written to a temporary
/// file next to `path` and moved into place, so readers never see half a file.
pub fn save_to_disk(lexicon: &Lexicon, path: &Path) -> Result<(), LexiconError> {
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let state = SnapshotRef {
        version: SNAPSHOT_VERSION,
        verbs: &lexicon.verbs,
        actors: &lexicon.actors,
        agents: &lexicon.agents,
    };

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    let mut writer = BufWriter::new(&temp_file);
    bincode::serialize_into(&mut writer, &state)?;
    writer.flush()?;
    drop(writer);

    temp_file.persist(path).map_err(|e| e.error)?;
    tracing::info!(path = %path.display(), "lexicon snapshot written");
    Ok(())
}

pub fn load_from_disk(path: &Path) -> Result<Lexicon, LexiconError> {
    let file = File::open(path)?;
    let state: Snapshot = bincode::deserialize_from(BufReader::new(file))?;
    if state.version != SNAPSHOT_VERSION {
        return Err(LexiconError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("snapshot version {} is not supported", state.version),
        )));
    }

    Ok(Lexicon {
        verbs: state.verbs,
        actors: state.actors,
        agents: state.agents,
        diagnostics: Vec::new(),
    })
}
