//! Owned Go syntax model.
//!
//! tree-sitter trees borrow their source, so each parsed file is lowered once
//! into these plain types. The documentation reader and the JSON copier only
//! ever see this model.

pub mod ast;
pub mod comments;
pub mod lower;
pub mod types;

pub use ast::{Decl, Field, File, FuncDecl, FuncType, GenDecl, ImportSpec, Spec, Token, TypeSpec, ValueSpec};
pub use comments::{Comment, CommentGroup};
pub use lower::lower_file;
pub use types::TypeExpr;
