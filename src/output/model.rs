use std::collections::BTreeMap;

use serde::Serialize;

use crate::loader::Pos;

/// Package document, one per JSON object on the output stream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Always `"package"`
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub doc: String,
    pub name: String,
    pub import_path: String,
    pub imports: Vec<String>,
    pub filenames: Vec<String>,
    pub notes: BTreeMap<String, Vec<Note>>,
    /// Bodies of the `BUG` notes, kept for older consumers
    pub bugs: Vec<String>,
    pub consts: Vec<Value>,
    pub types: Vec<Type>,
    pub vars: Vec<Value>,
    pub funcs: Vec<Func>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub pos: Pos,
    pub end: Pos,
    pub uid: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    pub package_name: String,
    pub package_import_path: String,
    pub doc: String,
    pub name: String,
    /// Always `"type"`
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub filename: String,
    pub line: usize,
    pub consts: Vec<Value>,
    pub vars: Vec<Value>,
    pub funcs: Vec<Func>,
    pub methods: Vec<Func>,
}

/// A const or var group.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Value {
    pub package_name: String,
    pub package_import_path: String,
    pub doc: String,
    pub names: Vec<String>,
    /// `"const"` or `"var"`
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub filename: String,
    pub line: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Func {
    pub doc: String,
    pub name: String,
    pub package_name: String,
    pub package_import_path: String,
    /// Always `"func"`
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub filename: String,
    pub line: usize,
    pub parameters: Vec<FuncParam>,
    pub recv: String,
    pub orig: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FuncParam {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}
