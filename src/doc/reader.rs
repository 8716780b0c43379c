use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::config::ExtractMode;
use crate::loader::Pos;
use crate::syntax::{Decl, File, FuncDecl, GenDecl, Spec, Token, TypeExpr, TypeSpec};

use super::filter::file_exports;
use super::notes::read_notes;
use super::{is_exported, is_predeclared_type, Func, Note, Package, Type, Value};

/// Fraction of specs in a group that must name a type for the group to be
/// listed under that type.
const VALUE_TYPE_THRESHOLD: f64 = 0.75;

#[derive(Debug, Clone)]
enum Slot {
    Func(Func),
    /// Two promoted methods with the same name at the same depth
    Conflict { level: usize },
}

impl Slot {
    fn level(&self) -> usize {
        match self {
            Slot::Func(f) => f.level,
            Slot::Conflict { level } => *level,
        }
    }
}

/// Functions or methods keyed by name.
#[derive(Debug, Clone, Default)]
struct MethodSet(BTreeMap<String, Slot>);

impl MethodSet {
    /// Register a declaration. A documented entry of the same name is kept.
    fn set(&mut self, decl: &FuncDecl) {
        if let Some(Slot::Func(existing)) = self.0.get(&decl.name) {
            if !existing.doc.is_empty() {
                return;
            }
        }

        let recv = decl
            .recv
            .as_ref()
            .map(|field| field.ty.receiver_string())
            .unwrap_or_default();
        let func = Func {
            doc: decl.doc.as_ref().map(|d| d.text()).unwrap_or_default(),
            name: decl.name.clone(),
            decl: decl.clone(),
            orig: recv.clone(),
            recv,
            level: 0,
        };
        self.0.insert(decl.name.clone(), Slot::Func(func));
    }

    /// Register a promoted method. Shallower methods win; equal depth is a
    /// conflict.
    fn add(&mut self, func: Func) {
        let level = func.level;
        match self.0.get(&func.name).map(Slot::level) {
            Some(old) if level > old => {}
            Some(old) if level == old => {
                self.0.insert(func.name, Slot::Conflict { level });
            }
            _ => {
                self.0.insert(func.name.clone(), Slot::Func(func));
            }
        }
    }

    fn declared(&self) -> impl Iterator<Item = &Func> {
        self.0.values().filter_map(|slot| match slot {
            Slot::Func(f) if f.level == 0 => Some(f),
            _ => None,
        })
    }

    /// Functions sorted by name. Conflicts are dropped; promoted methods
    /// are dropped when their original receiver is exported unless
    /// `all_methods` is set.
    fn sorted(self, all_methods: bool) -> Vec<Func> {
        self.0
            .into_values()
            .filter_map(|slot| match slot {
                Slot::Func(f) => {
                    let orig = f.orig.strip_prefix('*').unwrap_or(&f.orig);
                    let keep = all_methods || f.level == 0 || !is_exported(orig);
                    keep.then_some(f)
                }
                Slot::Conflict { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
struct NamedType {
    doc: String,
    pos: Pos,
    declared: bool,
    is_embedded: bool,
    is_struct: bool,
    /// Embedded type name to whether it is embedded by pointer
    embedded: BTreeMap<String, bool>,
    values: Vec<Value>,
    funcs: MethodSet,
    methods: MethodSet,
}

/// Accumulates the declarations of a package's files.
pub struct PackageReader {
    mode: ExtractMode,
    doc: String,
    filenames: Vec<String>,
    imports: BTreeSet<String>,
    has_dot_import: bool,
    values: Vec<Value>,
    order: usize,
    types: BTreeMap<String, NamedType>,
    funcs: MethodSet,
    notes: BTreeMap<String, Vec<Note>>,
}

impl PackageReader {
    pub fn new(mode: ExtractMode) -> Self {
        Self {
            mode,
            doc: String::new(),
            filenames: Vec::new(),
            imports: BTreeSet::new(),
            has_dot_import: false,
            values: Vec::new(),
            order: 0,
            types: BTreeMap::new(),
            funcs: MethodSet::default(),
            notes: BTreeMap::new(),
        }
    }

    /// Read all files of the package. Functions are read after every type
    /// declaration so factories can find types declared in other files.
    pub fn read_package(&mut self, mut files: Vec<File>) {
        files.sort_by(|a, b| a.filename.cmp(&b.filename));

        for file in files.iter_mut() {
            self.filenames.push(file.filename.clone());
            if self.mode == ExtractMode::Exported {
                file_exports(file);
            }
            self.read_file(file);
        }

        for file in &files {
            for decl in &file.decls {
                if let Decl::Func(func) = decl {
                    self.read_func(func);
                }
            }
        }

        self.compute_method_sets();
        self.cleanup_types();
    }

    fn read_file(&mut self, file: &File) {
        if let Some(doc) = &file.doc {
            let text = doc.text();
            if self.doc.is_empty() {
                self.doc = text;
            } else {
                self.doc.push('\n');
                self.doc.push_str(&text);
            }
        }

        for import in &file.imports {
            self.imports.insert(import.path.clone());
            if import.is_dot_import() {
                self.has_dot_import = true;
            }
        }

        for decl in &file.decls {
            let Decl::Gen(gen) = decl else {
                continue;
            };
            match gen.tok {
                Token::Const | Token::Var => self.read_value(gen),
                Token::Type => {
                    for spec in &gen.specs {
                        if let Spec::Type(spec) = spec {
                            self.read_type(gen, spec);
                        }
                    }
                }
            }
        }

        read_notes(&file.comments, &mut self.notes);
    }

    fn is_visible(&self, name: &str) -> bool {
        self.mode == ExtractMode::All || is_exported(name)
    }

    fn is_predeclared(&self, name: &str) -> bool {
        is_predeclared_type(name) && !self.types.contains_key(name)
    }

    /// Entry for `name`, created without a declaration if missing.
    fn lookup_type(&mut self, name: &str) -> Option<&mut NamedType> {
        if name.is_empty() || name == "_" {
            return None;
        }
        Some(self.types.entry(name.to_string()).or_default())
    }

    fn read_value(&mut self, decl: &GenDecl) {
        let mut dom_name = String::new();
        let mut dom_freq = 0usize;
        let mut prev = String::new();
        let mut count = 0usize;

        for spec in decl.value_specs() {
            let name = match &spec.ty {
                Some(ty) => match ty.base_type_name() {
                    (Some(n), false) => n.to_string(),
                    _ => String::new(),
                },
                None if decl.tok == Token::Const && spec.values == 0 => prev.clone(),
                None => String::new(),
            };
            if !name.is_empty() {
                if !dom_name.is_empty() && dom_name != name {
                    dom_name.clear();
                    break;
                }
                dom_name = name.clone();
                dom_freq += 1;
            }
            prev = name;
            count += 1;
        }
        if count == 0 {
            return;
        }

        let specs: Vec<_> = decl.value_specs().collect();
        let value = Value {
            doc: decl.doc.as_ref().map(|d| d.text()).unwrap_or_default(),
            names: specs.iter().flat_map(|s| s.names.iter().cloned()).collect(),
            tok: decl.tok,
            pos: decl.pos,
            sorting_name: match specs.as_slice() {
                [single] => single.names.first().cloned().unwrap_or_default(),
                _ => String::new(),
            },
            order: self.order,
        };
        self.order += 1;

        let threshold = (decl.specs.len() as f64 * VALUE_TYPE_THRESHOLD) as usize;
        if !dom_name.is_empty() && self.is_visible(&dom_name) && dom_freq >= threshold {
            if let Some(typ) = self.lookup_type(&dom_name) {
                typ.values.push(value);
                return;
            }
        }
        self.values.push(value);
    }

    fn read_type(&mut self, decl: &GenDecl, spec: &TypeSpec) {
        let doc = spec
            .doc
            .as_ref()
            .or(decl.doc.as_ref())
            .map(|d| d.text())
            .unwrap_or_default();
        let pos = if decl.parenthesized { spec.pos } else { decl.pos };

        let (fields, is_struct) = match &spec.ty {
            TypeExpr::Struct(fields) => (fields.as_slice(), true),
            TypeExpr::Interface(elems) => (elems.as_slice(), false),
            _ => (&[][..], false),
        };
        let embedded: Vec<(String, bool)> = fields
            .iter()
            .filter(|field| field.names.is_empty())
            .filter_map(|field| match field.ty.base_type_name() {
                (Some(name), false) => {
                    let is_ptr = matches!(field.ty, TypeExpr::Pointer(_));
                    Some((name.to_string(), is_ptr))
                }
                _ => None,
            })
            .collect();

        let Some(typ) = self.lookup_type(&spec.name) else {
            return;
        };
        typ.declared = true;
        typ.doc = doc;
        typ.pos = pos;
        typ.is_struct = is_struct;

        let mut recorded = Vec::with_capacity(embedded.len());
        for (name, is_ptr) in embedded {
            if let Some(embedded_type) = self.lookup_type(&name) {
                embedded_type.is_embedded = true;
                recorded.push((name, is_ptr));
            }
        }
        if let Some(typ) = self.types.get_mut(&spec.name) {
            typ.embedded.extend(recorded);
        }
    }

    fn read_func(&mut self, func: &FuncDecl) {
        if let Some(recv) = &func.recv {
            let (Some(name), false) = recv.ty.base_type_name() else {
                return;
            };
            if let Some(typ) = self.lookup_type(name) {
                typ.methods.set(func);
            }
            return;
        }

        let mut factory_of: Option<String> = None;
        let mut result_types = 0;
        for result in &func.ty.results {
            let ty = match &result.ty {
                TypeExpr::Array(elem) => elem.as_ref(),
                other => other,
            };
            let (Some(name), false) = ty.base_type_name() else {
                continue;
            };
            if !self.is_visible(name) || self.is_predeclared(name) {
                continue;
            }
            if func.ty.type_params.iter().any(|p| p == name) {
                continue;
            }
            if self.lookup_type(name).is_some() {
                factory_of = Some(name.to_string());
                result_types += 1;
                if result_types > 1 {
                    break;
                }
            }
        }

        if result_types == 1 {
            if let Some(typ) = factory_of.and_then(|name| self.types.get_mut(&name)) {
                typ.funcs.set(func);
                return;
            }
        }
        self.funcs.set(func);
    }

    fn compute_method_sets(&mut self) {
        let structs: Vec<String> = self
            .types
            .iter()
            .filter(|(_, t)| t.is_struct)
            .map(|(name, _)| name.clone())
            .collect();

        for name in structs {
            let Some(mut methods) = self.types.get(&name).map(|t| t.methods.clone()) else {
                continue;
            };
            let mut visited = HashSet::new();
            self.collect_embedded_methods(&mut methods, &name, &name, false, 1, &mut visited);
            if let Some(typ) = self.types.get_mut(&name) {
                typ.methods = methods;
            }
        }
    }

    fn collect_embedded_methods(
        &self,
        methods: &mut MethodSet,
        type_name: &str,
        recv_type_name: &str,
        embedded_is_ptr: bool,
        level: usize,
        visited: &mut HashSet<String>,
    ) {
        visited.insert(type_name.to_string());

        if let Some(typ) = self.types.get(type_name) {
            for (embedded, &is_ptr) in &typ.embedded {
                let this_is_ptr = embedded_is_ptr || is_ptr;
                if let Some(embedded_type) = self.types.get(embedded) {
                    for method in embedded_type.methods.declared() {
                        methods.add(customize_recv(method, recv_type_name, this_is_ptr, level));
                    }
                }
                if !visited.contains(embedded) {
                    self.collect_embedded_methods(methods, embedded, recv_type_name, this_is_ptr, level + 1, visited);
                }
            }
        }

        visited.remove(type_name);
    }

    /// Hand the values and functions of undeclared types back to the
    /// package and drop types that should not be documented.
    fn cleanup_types(&mut self) {
        let names: Vec<String> = self.types.keys().cloned().collect();
        for name in names {
            let visible = self.is_visible(&name);
            let predeclared = is_predeclared_type(&name);
            let Some(typ) = self.types.get(&name) else {
                continue;
            };
            if typ.declared && visible {
                continue;
            }
            let lost = !typ.declared && (predeclared || visible && (typ.is_embedded || self.has_dot_import));

            let Some(typ) = self.types.remove(&name) else {
                continue;
            };
            if !lost {
                tracing::debug!("Dropping type {}", name);
                continue;
            }

            tracing::debug!("Moving declarations of undeclared type {} to package level", name);
            self.values.extend(typ.values);
            self.funcs.0.extend(typ.funcs.0);
            if !predeclared {
                for (method_name, slot) in typ.methods.0 {
                    self.funcs.0.entry(method_name).or_insert(slot);
                }
            }
        }
    }

    pub fn into_package(self, name: &str, import_path: &str) -> Package {
        let bugs: Vec<String> = self
            .notes
            .get("BUG")
            .map(|notes| notes.iter().map(|n| n.body.clone()).collect())
            .unwrap_or_default();

        let types = self
            .types
            .into_iter()
            .map(|(type_name, t)| Type {
                doc: t.doc,
                name: type_name,
                pos: t.pos,
                consts: sorted_values(&t.values, Token::Const),
                vars: sorted_values(&t.values, Token::Var),
                funcs: t.funcs.sorted(true),
                methods: t.methods.sorted(false),
            })
            .collect();

        Package {
            doc: self.doc,
            name: name.to_string(),
            import_path: import_path.to_string(),
            imports: self.imports.into_iter().collect(),
            filenames: self.filenames,
            notes: self.notes,
            bugs,
            consts: sorted_values(&self.values, Token::Const),
            types,
            vars: sorted_values(&self.values, Token::Var),
            funcs: self.funcs.sorted(true),
        }
    }
}

/// Method promoted from an embedded type, seen from `recv_type_name`.
fn customize_recv(func: &Func, recv_type_name: &str, embedded_is_ptr: bool, level: usize) -> Func {
    let mut promoted = func.clone();
    let Some(recv) = &func.decl.recv else {
        return promoted;
    };

    let orig_is_ptr = matches!(recv.ty, TypeExpr::Pointer(_));
    let ty = if !embedded_is_ptr && orig_is_ptr {
        TypeExpr::pointer(TypeExpr::ident(recv_type_name))
    } else {
        TypeExpr::ident(recv_type_name)
    };

    promoted.recv = ty.receiver_string();
    if let Some(field) = promoted.decl.recv.as_mut() {
        field.ty = ty;
    }
    promoted.level = level;
    promoted
}

/// Values declared with `tok`. Groups of one spec sort by their first name,
/// larger groups come first; ties keep source order.
fn sorted_values(values: &[Value], tok: Token) -> Vec<Value> {
    let mut list: Vec<Value> = values.iter().filter(|v| v.tok == tok).cloned().collect();
    list.sort_by(|a, b| a.sorting_name.cmp(&b.sorting_name).then(a.order.cmp(&b.order)));
    list
}
