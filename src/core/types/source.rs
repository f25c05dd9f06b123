use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::types::{AppError, AppResult};

/// Where an input document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Inline(String),
}

impl Source {
    pub async fn read(&self) -> AppResult<String> {
        match self {
            Source::Path(path) => {
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| AppError::Read {
                        origin: self.to_string(),
                        source,
                    })
            }
            Source::Inline(text) => Ok(text.clone()),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Inline(_) => write!(f, "<inline>"),
        }
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&str> for Source {
    fn from(path: &str) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

/// Either one source map used for every compiled module, or one source map
/// per module key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMaps<T = Source> {
    Single(T),
    Keyed(BTreeMap<String, T>),
}

impl<T> SourceMaps<T> {
    /// The map that translates positions of the module with this key.
    pub fn get(&self, key: &str) -> Option<&T> {
        match self {
            SourceMaps::Single(map) => Some(map),
            SourceMaps::Keyed(maps) => maps.get(key),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SourceMaps::Single(_) => 1,
            SourceMaps::Keyed(maps) => maps.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Inputs of one remapping run.
#[derive(Debug, Clone)]
pub struct Options {
    pub lcov: Source,
    pub sourcemaps: SourceMaps,
    /// Base for the existence check of original files; defaults to the cwd
    pub source_dir: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
}

impl Options {
    pub fn new(lcov: impl Into<Source>, sourcemaps: SourceMaps) -> Self {
        Self {
            lcov: lcov.into(),
            sourcemaps,
            source_dir: None,
            output_file: None,
        }
    }

    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = Some(dir.into());
        self
    }

    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }
}
