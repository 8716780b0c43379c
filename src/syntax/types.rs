//! Go type expressions and their canonical signature strings.

use crate::error::{DocError, Result};

use super::ast::{Field, FuncType};

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `int`, `error`, `T`
    Ident(String),
    /// `[]T` or `[N]T`
    Array(Box<TypeExpr>),
    Struct(Vec<Field>),
    /// Methods (function-typed fields) and embedded elements
    Interface(Vec<Field>),
    /// `pkg.Name`
    Selector { package: Box<TypeExpr>, name: String },
    /// `...T` of a variadic parameter
    Ellipsis(Box<TypeExpr>),
    Pointer(Box<TypeExpr>),
    Func(FuncType),
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Instantiated generic type such as `List[T]`
    Generic {
        base: Box<TypeExpr>,
        args: Vec<TypeExpr>,
    },
    /// Any other syntax (channels, parenthesized types, constraints, ...)
    Unsupported { kind: String, text: String },
}

impl TypeExpr {
    pub fn ident(name: impl Into<String>) -> Self {
        TypeExpr::Ident(name.into())
    }

    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    pub fn array(elem: TypeExpr) -> Self {
        TypeExpr::Array(Box::new(elem))
    }

    /// Canonical signature string of this type.
    ///
    /// Fails with [`DocError::UnsupportedTypeExpr`] on any variant outside
    /// the supported grammar.
    pub fn signature(&self) -> Result<String> {
        match self {
            TypeExpr::Ident(name) => Ok(name.clone()),
            TypeExpr::Array(elem) => Ok(format!("[]{}", elem.signature()?)),
            TypeExpr::Pointer(inner) => Ok(format!("*{}", inner.signature()?)),
            TypeExpr::Ellipsis(elem) => Ok(format!("...{}", elem.signature()?)),
            TypeExpr::Selector { package, name } => Ok(format!("{}.{}", package.signature()?, name)),
            TypeExpr::Struct(fields) => {
                let mut parts = Vec::with_capacity(fields.len());
                for field in fields {
                    let ty = field.ty.signature()?;
                    if field.names.is_empty() {
                        parts.push(ty);
                    } else {
                        parts.extend(field.names.iter().map(|name| format!("{} {}", name, ty)));
                    }
                }
                Ok(format!("struct{{{}}}", parts.join(",")))
            }
            TypeExpr::Interface(elems) => {
                let parts = elems
                    .iter()
                    .map(|elem| elem.ty.signature())
                    .collect::<Result<Vec<_>>>()?;
                Ok(format!("interface{{{}}}", parts.join(",")))
            }
            TypeExpr::Map { key, value } => {
                Ok(format!("map [{}]{}", key.signature()?, value.signature()?))
            }
            TypeExpr::Func(func) => Ok(format!(
                "func({}){}",
                field_types(&func.params)?.join(","),
                field_types(&func.results)?.join("")
            )),
            TypeExpr::Generic { .. } => Err(DocError::UnsupportedTypeExpr {
                kind: "generic_type".to_string(),
                text: self.display_text(),
            }),
            TypeExpr::Unsupported { kind, text } => Err(DocError::UnsupportedTypeExpr {
                kind: kind.clone(),
                text: text.clone(),
            }),
        }
    }

    /// Name of the underlying named type, ignoring pointers and type
    /// arguments. The flag is true when the name comes from another package.
    pub fn base_type_name(&self) -> (Option<&str>, bool) {
        match self {
            TypeExpr::Ident(name) => (Some(name.as_str()), false),
            TypeExpr::Pointer(inner) => inner.base_type_name(),
            TypeExpr::Generic { base, .. } => base.base_type_name(),
            TypeExpr::Selector { package, name } if matches!(**package, TypeExpr::Ident(_)) => {
                (Some(name.as_str()), true)
            }
            _ => (None, false),
        }
    }

    /// Receiver formatting: `T`, `*T` or `T[P, Q]`.
    pub fn receiver_string(&self) -> String {
        match self {
            TypeExpr::Ident(name) => name.clone(),
            TypeExpr::Pointer(inner) => format!("*{}", inner.receiver_string()),
            TypeExpr::Generic { base, args } if !args.is_empty() => {
                let params: Vec<&str> = args
                    .iter()
                    .map(|arg| match arg {
                        TypeExpr::Ident(name) => name.as_str(),
                        _ => "BADPARAM",
                    })
                    .collect();
                format!("{}[{}]", base.receiver_string(), params.join(", "))
            }
            _ => "BADRECV".to_string(),
        }
    }

    fn display_text(&self) -> String {
        match self {
            TypeExpr::Generic { base, args } => {
                let args: Vec<String> = args.iter().map(|a| a.display_text()).collect();
                format!("{}[{}]", base.display_text(), args.join(", "))
            }
            TypeExpr::Unsupported { text, .. } => text.clone(),
            other => other.signature().unwrap_or_else(|_| "?".to_string()),
        }
    }
}

/// One signature per declared name, or one for an unnamed field.
fn field_types(fields: &[Field]) -> Result<Vec<String>> {
    let mut types = Vec::with_capacity(fields.len());
    for field in fields {
        let ty = field.ty.signature()?;
        let count = field.names.len().max(1);
        types.extend(std::iter::repeat(ty).take(count));
    }
    Ok(types)
}
