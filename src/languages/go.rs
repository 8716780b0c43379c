use once_cell::sync::OnceCell;
use tree_sitter::Query;

use super::LanguageGrammar;

pub struct GoGrammar;

static GO_DECLARATIONS_QUERY: OnceCell<Query> = OnceCell::new();

/// Capture names used by [`GoGrammar::declarations_query`].
pub mod captures {
    pub const PACKAGE: &str = "package";
    pub const IMPORT: &str = "import";
    pub const CONST: &str = "const";
    pub const VAR: &str = "var";
    pub const TYPE: &str = "type";
    pub const FUNCTION: &str = "function";
    pub const METHOD: &str = "method";
    pub const COMMENT: &str = "comment";
}

impl LanguageGrammar for GoGrammar {
    fn name(&self) -> &'static str {
        "go"
    }

    fn file_extensions(&self) -> &[&'static str] {
        &["go"]
    }

    fn language(&self) -> tree_sitter::Language {
        tree_sitter_go::LANGUAGE.into()
    }

    fn declarations_query(&self) -> &str {
        r#"
        (source_file (package_clause) @package)
        (source_file (import_declaration) @import)
        (source_file (const_declaration) @const)
        (source_file (var_declaration) @var)
        (source_file (type_declaration) @type)
        (source_file (function_declaration) @function)
        (source_file (method_declaration) @method)

        ; Every comment in the file, nested ones included (notes live anywhere)
        (comment) @comment
        "#
    }

    fn cached_declarations_query(&self) -> Option<&'static Query> {
        GO_DECLARATIONS_QUERY
            .get_or_try_init(|| Query::new(&self.language(), self.declarations_query()))
            .ok()
    }
}
