//! Owned Go syntax model produced by lowering tree-sitter trees.

use crate::loader::Pos;

use super::comments::CommentGroup;
use super::types::TypeExpr;

/// A parameter, result, receiver, struct field or interface element.
///
/// Unnamed parameters and embedded fields have no names.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: Vec<String>,
    pub ty: TypeExpr,
}

impl Field {
    pub fn new(names: Vec<String>, ty: TypeExpr) -> Self {
        Self { names, ty }
    }

    pub fn unnamed(ty: TypeExpr) -> Self {
        Self {
            names: Vec::new(),
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuncType {
    /// Names of the declared type parameters
    pub type_params: Vec<String>,
    pub params: Vec<Field>,
    pub results: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Const,
    Var,
    Type,
}

impl Token {
    pub fn as_str(&self) -> &'static str {
        match self {
            Token::Const => "const",
            Token::Var => "var",
            Token::Type => "type",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: Vec<String>,
    pub ty: Option<TypeExpr>,
    /// Number of initializer expressions
    pub values: usize,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub doc: Option<CommentGroup>,
    pub name: String,
    pub type_params: Vec<String>,
    pub ty: TypeExpr,
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `const`, `var` or `type` declaration, possibly parenthesized.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub doc: Option<CommentGroup>,
    pub tok: Token,
    /// Position of the keyword
    pub pos: Pos,
    pub parenthesized: bool,
    pub specs: Vec<Spec>,
}

impl GenDecl {
    pub fn value_specs(&self) -> impl Iterator<Item = &ValueSpec> {
        self.specs.iter().filter_map(|spec| match spec {
            Spec::Value(v) => Some(v),
            Spec::Type(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroup>,
    /// Receiver of a method, `None` for plain functions
    pub recv: Option<Field>,
    pub name: String,
    pub ty: FuncType,
    /// Position of the `func` keyword
    pub pos: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub name: Option<String>,
    pub path: String,
}

impl ImportSpec {
    pub fn is_dot_import(&self) -> bool {
        self.name.as_deref() == Some(".")
    }
}

/// One lowered source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub filename: String,
    pub package_name: String,
    /// Comment group directly above the package clause
    pub doc: Option<CommentGroup>,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
    /// Every comment group of the file in source order
    pub comments: Vec<CommentGroup>,
}
