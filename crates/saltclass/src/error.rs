//! errors that abort the resolution of a node
//!
//! Missing classes, missing nodes and globs without matches are not errors. They are logged
//! and skipped, a missing node resolves to an empty document.
use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Unable to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to render template {}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Unable to parse yaml document {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("Document {} is a {kind}, expected a mapping", path.display())]
    NotAMapping { path: PathBuf, kind: &'static str },
    #[error("Invalid class glob {pattern}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Unable to walk storage directory")]
    Walk(#[from] walkdir::Error),
    #[error("Unable to read glob match")]
    Glob(#[from] glob::GlobError),
}
