//! Structured package documentation.
//!
//! [`new`] reads the lowered files of one package and builds a [`Package`]:
//! declarations filtered by [`ExtractMode`], values and factory functions
//! attached to the type they produce, methods attached to their receiver
//! (including methods promoted through embedded structs), and `MARKER(uid)`
//! notes collected from every comment.

mod filter;
mod notes;
mod reader;

use std::collections::BTreeMap;

use crate::config::ExtractMode;
use crate::loader::Pos;
use crate::syntax::{File, FuncDecl, Token};

pub use notes::{clean_note_body, NOTE_COMMENT_RE, NOTE_MARKER_RE};
pub use reader::PackageReader;

// =====================================================
// Documentation model
// =====================================================

/// Documentation of one package.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Package {
    pub doc: String,
    pub name: String,
    pub import_path: String,
    /// Sorted, unique
    pub imports: Vec<String>,
    /// Sorted
    pub filenames: Vec<String>,
    pub notes: BTreeMap<String, Vec<Note>>,
    /// Bodies of the `BUG` notes
    pub bugs: Vec<String>,
    pub consts: Vec<Value>,
    pub types: Vec<Type>,
    pub vars: Vec<Value>,
    pub funcs: Vec<Func>,
}

/// A const or var declaration group.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub doc: String,
    /// Declaration order; unexported names may appear as `_`
    pub names: Vec<String>,
    pub tok: Token,
    /// Position of the `const`/`var` keyword
    pub pos: Pos,
    pub(crate) sorting_name: String,
    pub(crate) order: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub doc: String,
    pub name: String,
    pub pos: Pos,
    /// Constants and variables of this type
    pub consts: Vec<Value>,
    pub vars: Vec<Value>,
    /// Factory functions returning this type
    pub funcs: Vec<Func>,
    pub methods: Vec<Func>,
}

/// A function or method.
#[derive(Debug, Clone, PartialEq)]
pub struct Func {
    pub doc: String,
    pub name: String,
    pub decl: FuncDecl,
    /// Receiver as seen from the documented type; empty for functions
    pub recv: String,
    /// Receiver as written in the source
    pub orig: String,
    /// Embedding depth, 0 for methods declared on the type itself
    pub level: usize,
}

/// A `MARKER(uid): body` annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    /// Start of the first comment of the note
    pub pos: Pos,
    /// End of the last comment of the note
    pub end: Pos,
    pub uid: String,
    pub body: String,
}

/// Build the documentation of package `name` from its files.
pub fn new(name: &str, files: Vec<File>, import_path: &str, mode: ExtractMode) -> Package {
    let mut reader = PackageReader::new(mode);
    reader.read_package(files);
    reader.into_package(name, import_path)
}

/// Go's notion of an exported identifier: the first character is an upper
/// case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

const PREDECLARED_TYPES: &[&str] = &[
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
];

pub fn is_predeclared_type(name: &str) -> bool {
    PREDECLARED_TYPES.contains(&name)
}
