use std::path::PathBuf;

use regex::Regex;

use crate::error::Result;

/// Which declarations end up in the documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Exported identifiers only
    #[default]
    Exported,
    /// Every declaration, exported or not
    All,
}

/// Run configuration, built once from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    pub directory: PathBuf,
    /// Import path reported for the package; the directory as given
    pub import_path: String,
    /// Files whose base name matches are skipped
    pub exclude: Option<Regex>,
    pub mode: ExtractMode,
}

impl Config {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        Self {
            import_path: directory.display().to_string(),
            directory,
            exclude: None,
            mode: ExtractMode::default(),
        }
    }

    /// Set the exclusion regex. An empty pattern disables filtering.
    pub fn with_exclude(mut self, pattern: &str) -> Result<Self> {
        self.exclude = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern)?)
        };
        Ok(self)
    }

    pub fn with_mode(mut self, mode: ExtractMode) -> Self {
        self.mode = mode;
        self
    }
}
