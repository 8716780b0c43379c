pub mod fileset;
pub mod parser;
pub mod paths;
pub mod walker;

pub use fileset::{FileSet, Pos, Position};
pub use parser::{ParsedFile, Parser};
pub use paths::clean_path;
pub use walker::DirectoryWalker;

use std::collections::BTreeMap;

use crate::config::Config;
use crate::error::Result;
use crate::syntax::{lower_file, File};

/// Lowered files of one Go package.
#[derive(Debug)]
pub struct SourcePackage {
    pub name: String,
    /// Files in filename order
    pub files: Vec<File>,
}

/// Everything parsed from the target directory.
#[derive(Debug)]
pub struct LoadedDirectory {
    pub fileset: FileSet,
    /// Packages sorted by name
    pub packages: Vec<SourcePackage>,
}

/// Parse every source file of the configured directory and group the
/// results by package clause.
pub fn load_directory(config: &Config) -> Result<LoadedDirectory> {
    let walker = DirectoryWalker::new(config.exclude.clone());
    let paths = walker.walk(&config.directory)?;
    tracing::debug!("Found {} source files in {}", paths.len(), config.directory.display());

    let parser = Parser::new();
    let mut fileset = FileSet::new();
    let mut by_package: BTreeMap<String, Vec<File>> = BTreeMap::new();

    for path in &paths {
        let parsed = parser.parse_file(path, &mut fileset)?;
        let file = lower_file(&parsed)?;
        by_package
            .entry(file.package_name.clone())
            .or_default()
            .push(file);
    }

    let packages = by_package
        .into_iter()
        .map(|(name, files)| SourcePackage { name, files })
        .collect();

    Ok(LoadedDirectory { fileset, packages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_groups_by_package() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("b.go"), "package p\n\nfunc B() {}\n").unwrap();
        fs::write(temp_dir.path().join("a.go"), "package p\n\nfunc A() {}\n").unwrap();
        fs::write(temp_dir.path().join("a_test.go"), "package p_test\n").unwrap();

        let config = Config::new(temp_dir.path());
        let loaded = load_directory(&config).unwrap();

        assert_eq!(loaded.fileset.file_count(), 3);
        let names: Vec<&str> = loaded.packages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["p", "p_test"]);

        let files: Vec<&str> = loaded.packages[0].files.iter().map(|f| f.filename.as_str()).collect();
        assert!(files[0].ends_with("a.go"));
        assert!(files[1].ends_with("b.go"));
    }

    #[test]
    fn test_load_cleans_filenames() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.go"), "package p\n").unwrap();
        let messy = format!("{}/./", temp_dir.path().display());

        let config = Config::new(&messy);
        let loaded = load_directory(&config).unwrap();

        let expected = temp_dir.path().join("a.go").display().to_string();
        assert_eq!(loaded.packages[0].files[0].filename, expected);
        assert_eq!(config.import_path, messy);
    }

    #[test]
    fn test_load_respects_exclude() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.go"), "package p\n").unwrap();
        fs::write(temp_dir.path().join("a_test.go"), "package p_test\n").unwrap();

        let config = Config::new(temp_dir.path()).with_exclude("_test\\.go$").unwrap();
        let loaded = load_directory(&config).unwrap();

        assert_eq!(loaded.packages.len(), 1);
        assert_eq!(loaded.packages[0].name, "p");
    }

    #[test]
    fn test_load_propagates_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("a.go"), "package p\n\nfunc {\n").unwrap();

        let config = Config::new(temp_dir.path());
        assert!(matches!(
            load_directory(&config),
            Err(crate::error::DocError::Parse { .. })
        ));
    }
}
