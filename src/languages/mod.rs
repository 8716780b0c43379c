pub mod go;

pub use go::GoGrammar;

use std::path::Path;

use tree_sitter::Query;

pub trait LanguageGrammar: Send + Sync {
    fn name(&self) -> &'static str;
    fn file_extensions(&self) -> &[&'static str];
    fn language(&self) -> tree_sitter::Language;

    /// Query capturing top-level declarations and comments
    fn declarations_query(&self) -> &str;

    /// Get cached declarations query (compiled once)
    fn cached_declarations_query(&self) -> Option<&'static Query> {
        None
    }

    fn supports(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.file_extensions().contains(&ext))
    }
}
