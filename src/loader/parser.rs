use std::path::Path;
use std::sync::Arc;

use crate::error::{DocError, Result};
use crate::languages::{GoGrammar, LanguageGrammar};

use super::fileset::FileSet;
use super::paths::clean_display_path;

pub struct Parser {
    grammar: Arc<dyn LanguageGrammar>,
}

impl Parser {
    pub fn new() -> Self {
        Self::with_grammar(Arc::new(GoGrammar))
    }

    pub fn with_grammar(grammar: Arc<dyn LanguageGrammar>) -> Self {
        Self { grammar }
    }

    pub fn grammar(&self) -> &Arc<dyn LanguageGrammar> {
        &self.grammar
    }

    /// Read and parse a file, registering it in `fset` under its lexically
    /// cleaned path.
    pub fn parse_file(&self, path: &Path, fset: &mut FileSet) -> Result<ParsedFile> {
        let source = std::fs::read_to_string(path)?;
        self.parse_source(&clean_display_path(path), &source, fset)
    }

    pub fn parse_source(&self, filename: &str, source: &str, fset: &mut FileSet) -> Result<ParsedFile> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.grammar.language())
            .map_err(|e| DocError::Language(e.to_string()))?;

        let tree = parser.parse(source, None).ok_or_else(|| DocError::Parse {
            filename: filename.to_string(),
            line: 1,
            column: 1,
            message: "Failed to parse source".to_string(),
        })?;

        if let Some(node) = first_error(tree.root_node()) {
            let position = node.start_position();
            let message = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                let snippet = node
                    .utf8_text(source.as_bytes())
                    .unwrap_or("")
                    .lines()
                    .next()
                    .unwrap_or("");
                let snippet: String = snippet.chars().take(40).collect();
                format!("syntax error near `{}`", snippet)
            };
            return Err(DocError::Parse {
                filename: filename.to_string(),
                line: position.row + 1,
                column: position.column + 1,
                message,
            });
        }

        let base = fset.add_file(filename, source);
        tracing::debug!("Parsed {} (base {})", filename, base);

        Ok(ParsedFile {
            filename: filename.to_string(),
            tree,
            source: source.to_string(),
            base,
            grammar: Arc::clone(&self.grammar),
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// First `ERROR` or `MISSING` node in document order.
fn first_error(node: tree_sitter::Node) -> Option<tree_sitter::Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

pub struct ParsedFile {
    pub filename: String,
    pub tree: tree_sitter::Tree,
    pub source: String,
    /// Base offset of this file in its [`FileSet`]
    pub base: usize,
    pub grammar: Arc<dyn LanguageGrammar>,
}

impl std::fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedFile")
            .field("filename", &self.filename)
            .field("base", &self.base)
            .field("grammar", &self.grammar.name())
            .finish_non_exhaustive()
    }
}

impl ParsedFile {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    pub fn source_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    pub fn node_text(&self, node: &tree_sitter::Node) -> &str {
        node.utf8_text(self.source_bytes()).unwrap_or("")
    }
}
