//! resolver settings
//!
//! Usually read from a yaml file:
//!
//! ```yaml
//! path: /srv/saltclass
//! extension: yml
//! opts:
//!   environment_default: base
//! grains:
//!   os: Debian
//! pillar:
//!   site: dc1
//! ```
use crate::error::{Error, Result};
use crate::storage::{Storage, DEFAULT_EXTENSION};
use crate::value::{Map, Value};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// storage root containing `classes/` and `nodes/`
    pub path: PathBuf,
    /// file extension of class and node documents
    pub extension: String,
    /// exposed to templates as `opts`
    pub opts: Value,
    /// exposed to templates as `grains`
    pub grains: Value,
    /// initial content of the pillar accumulator
    pub pillar: Map,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
            opts: Value::default(),
            grains: Value::default(),
            pillar: Map::new(),
        }
    }
}

impl Settings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn from_file(file: &Path) -> Result<Self> {
        tracing::info!(path=%file.display(), "loading settings");
        let source = std::fs::read_to_string(file).map_err(|source| Error::Io {
            path: file.to_owned(),
            source,
        })?;

        serde_yaml::from_str(&source).map_err(|source| Error::Parse {
            path: file.to_owned(),
            source,
        })
    }

    pub fn storage(&self) -> Storage {
        Storage::new(&self.path, &self.extension)
    }
}
