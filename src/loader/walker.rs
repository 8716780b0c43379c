use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::WalkBuilder;
use regex::Regex;

use crate::error::{DocError, Result};
use crate::languages::{GoGrammar, LanguageGrammar};

/// Lists the source files directly inside one directory.
pub struct DirectoryWalker {
    grammar: Arc<dyn LanguageGrammar>,
    exclude: Option<Regex>,
}

impl DirectoryWalker {
    pub fn new(exclude: Option<Regex>) -> Self {
        Self {
            grammar: Arc::new(GoGrammar),
            exclude,
        }
    }

    /// Source files of `dir`, sorted by file name.
    ///
    /// Subdirectories are not entered. Hidden files and ignore files are not
    /// consulted: every `.go` file counts unless the exclude pattern matches
    /// its base name.
    pub fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(DocError::NotADirectory(dir.to_path_buf()));
        }

        let walker = WalkBuilder::new(dir)
            .max_depth(Some(1))
            .standard_filters(false)
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if entry.depth() == 0 || !path.is_file() || !self.grammar.supports(path) {
                continue;
            }
            if self.is_excluded(path) {
                tracing::debug!("Excluding {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(re) = &self.exclude else {
            return false;
        };
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| re.is_match(name))
    }
}
