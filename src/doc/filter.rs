//! Exported-only view of a file.

use crate::syntax::{Decl, File, GenDecl, Spec, Token, TypeExpr, ValueSpec};

use super::is_exported;

/// Drop every declaration that is not exported.
///
/// Value specs with initializers keep their unexported names as `_` so the
/// shape of the group survives; constant types of removed specs carry over
/// to the implicit specs that follow them.
pub fn file_exports(file: &mut File) {
    let decls = std::mem::take(&mut file.decls);
    file.decls = decls
        .into_iter()
        .filter_map(|decl| match decl {
            Decl::Func(func) => is_exported(&func.name).then_some(Decl::Func(func)),
            Decl::Gen(gen) => filter_gen_decl(gen).map(Decl::Gen),
        })
        .collect();
}

fn filter_gen_decl(mut decl: GenDecl) -> Option<GenDecl> {
    if decl.tok == Token::Const {
        propagate_const_types(&mut decl.specs);
    }

    let specs = std::mem::take(&mut decl.specs);
    decl.specs = specs.into_iter().filter_map(filter_spec).collect();

    if decl.specs.is_empty() {
        None
    } else {
        Some(decl)
    }
}

fn propagate_const_types(specs: &mut [Spec]) {
    let mut prev_type: Option<TypeExpr> = None;
    for spec in specs.iter_mut() {
        let Spec::Value(spec) = spec else {
            continue;
        };
        if spec.ty.is_none() && spec.values == 0 {
            if let Some(prev) = &prev_type {
                spec.ty = copy_const_type(prev);
            }
        }
        prev_type = if spec.names.iter().any(|n| is_exported(n)) {
            None
        } else {
            spec.ty.clone()
        };
    }
}

/// Only plain and qualified identifiers are carried over.
fn copy_const_type(ty: &TypeExpr) -> Option<TypeExpr> {
    match ty {
        TypeExpr::Ident(_) => Some(ty.clone()),
        TypeExpr::Selector { package, .. } if matches!(**package, TypeExpr::Ident(_)) => Some(ty.clone()),
        _ => None,
    }
}

fn filter_spec(spec: Spec) -> Option<Spec> {
    match spec {
        Spec::Type(spec) => is_exported(&spec.name).then_some(Spec::Type(spec)),
        Spec::Value(spec) => filter_value_spec(spec).map(Spec::Value),
    }
}

fn filter_value_spec(mut spec: ValueSpec) -> Option<ValueSpec> {
    if spec.values > 0 || spec.ty.is_none() {
        let mut exported = false;
        for name in spec.names.iter_mut() {
            if is_exported(name) {
                exported = true;
            } else {
                *name = "_".to_string();
            }
        }
        exported.then_some(spec)
    } else {
        spec.names.retain(|name| is_exported(name));
        (!spec.names.is_empty()).then_some(spec)
    }
}
