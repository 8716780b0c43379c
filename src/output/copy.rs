//! Projection of the documentation model onto the output model.
//!
//! Every entry is tagged with its package's name and import path and located
//! through the [`FileSet`]. Type expressions are rendered with
//! [`TypeExpr::signature`](crate::syntax::TypeExpr::signature); a type it
//! cannot render aborts the copy.

use crate::doc;
use crate::error::Result;
use crate::loader::{FileSet, Pos};
use crate::syntax::Field;

use super::model::{Func, FuncParam, Note, Package, Type, Value};

pub fn copy_package(pkg: &doc::Package, fset: &FileSet) -> Result<Package> {
    let name = pkg.name.as_str();
    let import_path = pkg.import_path.as_str();

    let notes = pkg
        .notes
        .iter()
        .map(|(marker, notes)| (marker.clone(), notes.iter().map(copy_note).collect()))
        .collect();

    Ok(Package {
        kind: "package",
        doc: pkg.doc.clone(),
        name: pkg.name.clone(),
        import_path: pkg.import_path.clone(),
        imports: pkg.imports.clone(),
        filenames: pkg.filenames.clone(),
        notes,
        bugs: pkg.bugs.clone(),
        consts: copy_values(&pkg.consts, name, import_path, fset),
        types: copy_types(&pkg.types, name, import_path, fset)?,
        vars: copy_values(&pkg.vars, name, import_path, fset),
        funcs: copy_funcs(&pkg.funcs, name, import_path, fset)?,
    })
}

fn copy_note(note: &doc::Note) -> Note {
    Note {
        pos: note.pos,
        end: note.end,
        uid: note.uid.clone(),
        body: note.body.clone(),
    }
}

pub fn copy_types(
    types: &[doc::Type],
    package_name: &str,
    import_path: &str,
    fset: &FileSet,
) -> Result<Vec<Type>> {
    types
        .iter()
        .map(|t| -> Result<Type> {
            let (filename, line) = locate(fset, t.pos);
            Ok(Type {
                package_name: package_name.to_string(),
                package_import_path: import_path.to_string(),
                doc: t.doc.clone(),
                name: t.name.clone(),
                kind: "type",
                filename,
                line,
                consts: copy_values(&t.consts, package_name, import_path, fset),
                vars: copy_values(&t.vars, package_name, import_path, fset),
                funcs: copy_funcs(&t.funcs, package_name, import_path, fset)?,
                methods: copy_funcs(&t.methods, package_name, import_path, fset)?,
            })
        })
        .collect()
}

pub fn copy_values(
    values: &[doc::Value],
    package_name: &str,
    import_path: &str,
    fset: &FileSet,
) -> Vec<Value> {
    values
        .iter()
        .map(|v| {
            let (filename, line) = locate(fset, v.pos);
            Value {
                package_name: package_name.to_string(),
                package_import_path: import_path.to_string(),
                doc: v.doc.clone(),
                names: v.names.clone(),
                kind: v.tok.as_str(),
                filename,
                line,
            }
        })
        .collect()
}

pub fn copy_funcs(
    funcs: &[doc::Func],
    package_name: &str,
    import_path: &str,
    fset: &FileSet,
) -> Result<Vec<Func>> {
    funcs
        .iter()
        .map(|f| -> Result<Func> {
            let (filename, line) = locate(fset, f.decl.pos);
            let parameters = copy_func_params(&f.decl.ty.params).inspect_err(|e| {
                tracing::error!("Cannot render parameters of {} ({}:{}): {}", f.name, filename, line, e);
            })?;
            Ok(Func {
                doc: f.doc.clone(),
                name: f.name.clone(),
                package_name: package_name.to_string(),
                package_import_path: import_path.to_string(),
                kind: "func",
                filename,
                line,
                parameters,
                recv: f.recv.clone(),
                orig: f.orig.clone(),
            })
        })
        .collect()
}

/// One entry per parameter name, in declaration order. Unnamed parameters
/// contribute nothing, but their type must still render.
pub fn copy_func_params(params: &[Field]) -> Result<Vec<FuncParam>> {
    let mut out = Vec::new();
    for field in params {
        let ty = field.ty.signature()?;
        out.extend(field.names.iter().map(|name| FuncParam {
            ty: ty.clone(),
            name: name.clone(),
        }));
    }
    Ok(out)
}

fn locate(fset: &FileSet, pos: Pos) -> (String, usize) {
    let position = fset.position(pos);
    (position.filename, position.line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractMode;
    use crate::loader::Parser;
    use crate::syntax::{lower_file, TypeExpr};

    fn load(source: &str) -> (doc::Package, FileSet) {
        let mut fset = FileSet::new();
        let parsed = Parser::new().parse_source("pkg/a.go", source, &mut fset).unwrap();
        let file = lower_file(&parsed).unwrap();
        (doc::new("p", vec![file], "./pkg", ExtractMode::Exported), fset)
    }

    #[test]
    fn test_param_groups_flatten_per_name() {
        let params = vec![
            Field::new(vec!["a".to_string(), "b".to_string()], TypeExpr::ident("int")),
            Field::new(vec!["c".to_string()], TypeExpr::ident("string")),
        ];

        let flat = copy_func_params(&params).unwrap();

        let pairs: Vec<(&str, &str)> = flat.iter().map(|p| (p.ty.as_str(), p.name.as_str())).collect();
        assert_eq!(pairs, vec![("int", "a"), ("int", "b"), ("string", "c")]);
    }

    #[test]
    fn test_unnamed_params_contribute_nothing() {
        let params = vec![Field::unnamed(TypeExpr::ident("int")), Field::unnamed(TypeExpr::ident("error"))];

        assert!(copy_func_params(&params).unwrap().is_empty());
    }

    #[test]
    fn test_unsupported_param_type_fails() {
        let params = vec![Field::new(
            vec!["ch".to_string()],
            TypeExpr::Unsupported {
                kind: "channel_type".to_string(),
                text: "chan int".to_string(),
            },
        )];

        assert!(copy_func_params(&params).is_err());
    }

    #[test]
    fn test_copy_package_tags_owner_and_location() {
        let (pkg, fset) = load(
            "package p\n\n// T is a thing.\ntype T struct{}\n\n// New makes a T.\nfunc New(name string, opts ...int) *T { return nil }\n\nfunc (t *T) Run() {}\n\nconst Max = 3\n",
        );

        let out = copy_package(&pkg, &fset).unwrap();

        assert_eq!(out.kind, "package");
        assert_eq!(out.import_path, "./pkg");
        assert_eq!(out.consts[0].kind, "const");
        assert_eq!(out.consts[0].line, 11);
        assert_eq!(out.consts[0].package_name, "p");

        let t = &out.types[0];
        assert_eq!(t.kind, "type");
        assert_eq!(t.filename, "pkg/a.go");
        assert_eq!(t.line, 4);
        assert_eq!(t.package_import_path, "./pkg");

        let new = &t.funcs[0];
        assert_eq!(new.name, "New");
        assert_eq!(new.line, 7);
        assert_eq!(
            new.parameters,
            vec![
                FuncParam { ty: "string".to_string(), name: "name".to_string() },
                FuncParam { ty: "...int".to_string(), name: "opts".to_string() },
            ]
        );
        assert_eq!(new.recv, "");

        let run = &t.methods[0];
        assert_eq!(run.recv, "*T");
        assert_eq!(run.orig, "*T");
        assert_eq!(run.package_name, "p");
    }

    #[test]
    fn test_channel_parameter_aborts_copy() {
        let (pkg, fset) = load("package p\n\nfunc Drain(ch chan int) {}\n");

        let err = copy_package(&pkg, &fset).unwrap_err();

        assert!(err.to_string().contains("chan int"), "unexpected error: {}", err);
    }

    #[test]
    fn test_unnamed_channel_parameter_aborts_copy() {
        let (pkg, fset) = load("package p\n\nfunc Drain(chan int) {}\n");

        let err = copy_package(&pkg, &fset).unwrap_err();

        assert!(matches!(err, crate::error::DocError::UnsupportedTypeExpr { .. }), "unexpected error: {}", err);
    }

    #[test]
    fn test_unnamed_unsupported_param_fails() {
        let params = vec![Field::unnamed(TypeExpr::Unsupported {
            kind: "channel_type".to_string(),
            text: "chan int".to_string(),
        })];

        assert!(copy_func_params(&params).is_err());
    }
}
