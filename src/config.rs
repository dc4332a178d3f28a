// src/config.rs
use crate::core::segmenter::Segmenter;
use crate::error::LexiconError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Run configuration for the `lexicon` tool.
///
/// ```toml
/// verb_file = "CAMEO.verbs.txt"
/// agent_file = "agents.txt"
/// actor_files = ["Phoenix.Countries.actors.txt", "Phoenix.International.actors.txt"]
/// write_actor_root = true
///
/// [segmenter]
/// min_length = 100
/// max_length = 512
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LexiconConfig {
    pub verb_file: PathBuf,
    pub agent_file: PathBuf,
    #[serde(default)]
    pub actor_files: Vec<PathBuf>,
    #[serde(default)]
    pub write_actor_root: bool,
    /// Input text is already one sentence per line.
    #[serde(default)]
    pub parsed_input: bool,
    #[serde(default)]
    pub segmenter: Segmenter,
}

impl LexiconConfig {
    /// Loads a TOML configuration. Relative dictionary paths are taken
    /// relative to the directory holding the configuration file.
    pub fn from_file(path: &Path) -> Result<Self, LexiconError> {
        let contents = fs::read_to_string(path).map_err(|e| LexiconError::Config {
            path: path.to_path_buf(),
            message: format!("failed to read: {e}"),
        })?;
        let mut config = Self::from_toml(&contents).map_err(|message| LexiconError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, String> {
        let config: Self = toml::from_str(contents).map_err(|e| format!("failed to parse: {e}"))?;
        if config.segmenter.min_length >= config.segmenter.max_length {
            return Err(format!(
                "segmenter min_length {} must be below max_length {}",
                config.segmenter.min_length, config.segmenter.max_length
            ));
        }
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.verb_file);
        resolve(&mut self.agent_file);
        self.actor_files.iter_mut().for_each(resolve);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_and_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexicon.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "verb_file = \"dict/test.verbs\"\nagent_file = \"/abs/test.agents\"\nactor_files = [\"a.actors\"]").unwrap();

        let config = LexiconConfig::from_file(&path).unwrap();
        assert_eq!(config.verb_file, dir.path().join("dict/test.verbs"));
        assert_eq!(config.agent_file, PathBuf::from("/abs/test.agents"));
        assert_eq!(config.actor_files, vec![dir.path().join("a.actors")]);
        assert!(!config.write_actor_root);
        assert!(!config.parsed_input);
        assert_eq!(config.segmenter, Segmenter::default());
    }

    #[test]
    fn segmenter_bounds_are_checked() {
        let toml = "verb_file = \"v\"\nagent_file = \"a\"\n[segmenter]\nmin_length = 600\n";
        assert!(LexiconConfig::from_toml(toml).unwrap_err().contains("min_length"));
        let toml = "verb_file = \"v\"\nagent_file = \"a\"\n[segmenter]\nmax_length = 300\n";
        assert_eq!(LexiconConfig::from_toml(toml).unwrap().segmenter.max_length, 300);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = LexiconConfig::from_file(Path::new("/no/such/lexicon.toml")).unwrap_err();
        assert!(matches!(err, LexiconError::Config { .. }));
    }
}
