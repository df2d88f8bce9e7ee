use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::sentences::{BuiltinSet, SentenceError, SentenceSet};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Sentences(#[from] SentenceError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sentence_set: BuiltinSet,
    /// replaces the built-in set when present
    pub sentences: Option<Vec<String>>,
}

impl Config {
    /// CLI values win over the file; custom sentences win over any built-in set
    pub fn resolve(
        &self,
        set_override: Option<BuiltinSet>,
        prompts: &[String],
    ) -> Result<SentenceSet, ConfigError> {
        if !prompts.is_empty() {
            return Ok(SentenceSet::new("custom", prompts.to_vec())?);
        }
        if let Some(set) = set_override {
            return Ok(set.load()?);
        }
        match &self.sentences {
            Some(sentences) => Ok(SentenceSet::new("custom", sentences.clone())?),
            None => Ok(self.sentence_set.load()?),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Result<Config, ConfigError>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typist") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typist_config.json")
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
    /// A missing file means defaults; anything else unreadable is an error
    fn load(&self) -> Result<Config, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
