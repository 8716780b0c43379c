use std::io::Write;

use crate::config::Config;
use crate::doc;
use crate::error::{DocError, Result};
use crate::loader::load_directory;
use crate::output::{self, copy_package};

/// Parse the configured directory and build its output document.
///
/// Returns no package for a directory without Go files. Files declaring
/// different packages are rejected.
pub fn document_directory(config: &Config) -> Result<Vec<output::Package>> {
    let loaded = load_directory(config)?;

    if loaded.packages.len() > 1 {
        let names = loaded.packages.iter().map(|p| p.name.clone()).collect();
        return Err(DocError::MultiplePackages(names));
    }

    let mut documents = Vec::with_capacity(loaded.packages.len());
    for source in loaded.packages {
        tracing::debug!("Reading documentation of package {} ({} files)", source.name, source.files.len());
        let package = doc::new(&source.name, source.files, &config.import_path, config.mode);
        documents.push(copy_package(&package, &loaded.fileset)?);
    }
    Ok(documents)
}

/// Run the whole pipeline and write the JSON documents to `writer`.
///
/// Nothing is written unless every step succeeds. Returns the number of
/// documents written.
pub fn generate<W: Write>(config: &Config, writer: &mut W) -> Result<usize> {
    let documents = document_directory(config)?;
    output::write_packages(&documents, writer)?;
    Ok(documents.len())
}
