use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;
use crate::mode::ProjectionMode;
use crate::scheduler::Timings;
use crate::vocabulary::{VocabularyStore, DEFAULT_DECK};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub mode: ProjectionMode,
    pub number_of_words: usize,
    pub deck: String,
    pub vocabulary_file: Option<PathBuf>,
    pub timings: Timings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::default(),
            number_of_words: 5,
            deck: DEFAULT_DECK.to_string(),
            vocabulary_file: None,
            timings: Timings::default(),
        }
    }
}

impl Config {
    /// A vocabulary file on disk wins over the embedded deck name.
    pub fn load_vocabulary(&self) -> Result<VocabularyStore> {
        match &self.vocabulary_file {
            Some(path) => VocabularyStore::from_path(path),
            None => VocabularyStore::builtin(&self.deck),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "hanzi-cards") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("hanzi_cards_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
