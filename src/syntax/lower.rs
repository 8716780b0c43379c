//! Lowering of tree-sitter Go trees into the owned syntax model.

use tree_sitter::{Node, QueryCursor, StreamingIterator};

use crate::error::{DocError, Result};
use crate::languages::go::captures;
use crate::loader::parser::ParsedFile;
use crate::loader::Pos;

use super::ast::{Decl, Field, File, FuncDecl, FuncType, GenDecl, ImportSpec, Spec, Token, TypeSpec, ValueSpec};
use super::comments::{Comment, CommentGroup};
use super::types::TypeExpr;

/// Comment group plus the layout facts needed to attach it to declarations.
#[derive(Debug)]
struct GroupInfo {
    group: CommentGroup,
    end_byte: usize,
    end_row: usize,
    /// Group started on the same line as a preceding token
    line_comment: bool,
}

pub fn lower_file(parsed: &ParsedFile) -> Result<File> {
    let query = parsed
        .grammar
        .cached_declarations_query()
        .ok_or_else(|| DocError::Language(format!("Invalid declarations query for {}", parsed.grammar.name())))?;

    let mut nodes: Vec<(&str, Node)> = Vec::new();
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, parsed.root_node(), parsed.source_bytes());
    while let Some(m) = matches.next() {
        for capture in m.captures {
            nodes.push((query.capture_names()[capture.index as usize], capture.node));
        }
    }
    nodes.sort_by_key(|(_, node)| node.start_byte());

    let comments: Vec<Node> = nodes
        .iter()
        .filter(|(name, _)| *name == captures::COMMENT)
        .map(|(_, node)| *node)
        .collect();

    let lowerer = Lowerer {
        parsed,
        groups: group_comments(parsed, &comments),
    };

    let mut package: Option<(String, Option<CommentGroup>)> = None;
    let mut imports = Vec::new();
    let mut decls = Vec::new();

    for (name, node) in &nodes {
        match *name {
            captures::PACKAGE => {
                if package.is_none() {
                    let ident = named_children(*node)
                        .into_iter()
                        .find(|c| c.kind() == "package_identifier")
                        .map(|c| lowerer.text(c).to_string())
                        .unwrap_or_default();
                    package = Some((ident, lowerer.lead_doc(*node)));
                }
            }
            captures::IMPORT => lowerer.lower_imports(*node, &mut imports),
            captures::CONST => decls.push(Decl::Gen(lowerer.lower_value_decl(*node, Token::Const))),
            captures::VAR => decls.push(Decl::Gen(lowerer.lower_value_decl(*node, Token::Var))),
            captures::TYPE => decls.push(Decl::Gen(lowerer.lower_type_decl(*node))),
            captures::FUNCTION | captures::METHOD => {
                if let Some(func) = lowerer.lower_func(*node) {
                    decls.push(Decl::Func(func));
                } else {
                    tracing::debug!("Skipping method without receiver in {}", parsed.filename);
                }
            }
            _ => {}
        }
    }

    let (package_name, doc) = package.ok_or_else(|| DocError::Parse {
        filename: parsed.filename.clone(),
        line: 1,
        column: 1,
        message: "expected 'package', found EOF".to_string(),
    })?;

    Ok(File {
        filename: parsed.filename.clone(),
        package_name,
        doc,
        imports,
        decls,
        comments: lowerer.groups.into_iter().map(|g| g.group).collect(),
    })
}

struct Lowerer<'a> {
    parsed: &'a ParsedFile,
    groups: Vec<GroupInfo>,
}

impl<'a> Lowerer<'a> {
    fn text(&self, node: Node) -> &'a str {
        self.parsed.node_text(&node)
    }

    fn pos(&self, node: Node) -> Pos {
        Pos(self.parsed.base + node.start_byte())
    }

    /// Comment group ending on the line directly above `node`.
    fn lead_doc(&self, node: Node) -> Option<CommentGroup> {
        let start = node.start_byte();
        let index = self.groups.partition_point(|g| g.end_byte <= start);
        let info = self.groups.get(index.checked_sub(1)?)?;
        if info.line_comment || info.end_row + 1 != node.start_position().row {
            return None;
        }
        Some(info.group.clone())
    }

    fn lower_imports(&self, node: Node, imports: &mut Vec<ImportSpec>) {
        for child in named_children(node) {
            match child.kind() {
                "import_spec" => imports.push(self.lower_import_spec(child)),
                "import_spec_list" => imports.extend(
                    named_children(child)
                        .into_iter()
                        .filter(|spec| spec.kind() == "import_spec")
                        .map(|spec| self.lower_import_spec(spec)),
                ),
                _ => {}
            }
        }
    }

    fn lower_import_spec(&self, node: Node) -> ImportSpec {
        let name = node.child_by_field_name("name").map(|n| self.text(n).to_string());
        let path = node
            .child_by_field_name("path")
            .map(|p| unquote(self.text(p)))
            .unwrap_or_default();
        ImportSpec { name, path }
    }

    fn lower_value_decl(&self, node: Node, tok: Token) -> GenDecl {
        let spec_kind = match tok {
            Token::Const => "const_spec",
            _ => "var_spec",
        };

        let mut parenthesized = has_child(node, "(");
        let mut spec_nodes = Vec::new();
        for child in named_children(node) {
            if child.kind() == spec_kind {
                spec_nodes.push(child);
            } else if child.kind() == "var_spec_list" {
                parenthesized = true;
                spec_nodes.extend(named_children(child).into_iter().filter(|s| s.kind() == spec_kind));
            }
        }

        let specs = spec_nodes
            .into_iter()
            .map(|spec| {
                Spec::Value(ValueSpec {
                    names: field_children(spec, "name")
                        .into_iter()
                        .map(|n| self.text(n).to_string())
                        .collect(),
                    ty: spec.child_by_field_name("type").map(|t| self.lower_type(t)),
                    values: spec
                        .child_by_field_name("value")
                        .map(|list| {
                            if list.kind() == "expression_list" {
                                named_children(list).len()
                            } else {
                                1
                            }
                        })
                        .unwrap_or(0),
                    pos: self.pos(spec),
                })
            })
            .collect();

        GenDecl {
            doc: self.lead_doc(node),
            tok,
            pos: self.pos(node),
            parenthesized,
            specs,
        }
    }

    fn lower_type_decl(&self, node: Node) -> GenDecl {
        let parenthesized = has_child(node, "(");
        let specs = named_children(node)
            .into_iter()
            .filter(|c| matches!(c.kind(), "type_spec" | "type_alias"))
            .map(|spec| {
                Spec::Type(TypeSpec {
                    doc: if parenthesized { self.lead_doc(spec) } else { None },
                    name: spec
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default(),
                    type_params: self.type_param_names(spec),
                    ty: self.lower_opt_type(spec.child_by_field_name("type")),
                    pos: self.pos(spec),
                })
            })
            .collect();

        GenDecl {
            doc: self.lead_doc(node),
            tok: Token::Type,
            pos: self.pos(node),
            parenthesized,
            specs,
        }
    }

    fn lower_func(&self, node: Node) -> Option<FuncDecl> {
        let recv = match node.child_by_field_name("receiver") {
            Some(list) => Some(self.lower_parameter_list(list).into_iter().next()?),
            None => None,
        };

        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();

        Some(FuncDecl {
            doc: self.lead_doc(node),
            recv,
            name,
            ty: FuncType {
                type_params: self.type_param_names(node),
                params: node
                    .child_by_field_name("parameters")
                    .map(|p| self.lower_parameter_list(p))
                    .unwrap_or_default(),
                results: self.lower_result(node.child_by_field_name("result")),
            },
            pos: self.pos(node),
        })
    }

    fn type_param_names(&self, node: Node) -> Vec<String> {
        let Some(list) = node.child_by_field_name("type_parameters") else {
            return Vec::new();
        };
        named_children(list)
            .into_iter()
            .filter(|decl| decl.kind() == "type_parameter_declaration")
            .flat_map(|decl| field_children(decl, "name"))
            .map(|n| self.text(n).to_string())
            .collect()
    }

    fn lower_parameter_list(&self, node: Node) -> Vec<Field> {
        named_children(node)
            .into_iter()
            .filter_map(|param| match param.kind() {
                "parameter_declaration" => Some(Field::new(
                    field_children(param, "name")
                        .into_iter()
                        .map(|n| self.text(n).to_string())
                        .collect(),
                    self.lower_opt_type(param.child_by_field_name("type")),
                )),
                "variadic_parameter_declaration" => Some(Field::new(
                    param
                        .child_by_field_name("name")
                        .map(|n| vec![self.text(n).to_string()])
                        .unwrap_or_default(),
                    TypeExpr::Ellipsis(Box::new(self.lower_opt_type(param.child_by_field_name("type")))),
                )),
                _ => None,
            })
            .collect()
    }

    fn lower_result(&self, node: Option<Node>) -> Vec<Field> {
        match node {
            Some(list) if list.kind() == "parameter_list" => self.lower_parameter_list(list),
            Some(ty) => vec![Field::unnamed(self.lower_type(ty))],
            None => Vec::new(),
        }
    }

    fn lower_opt_type(&self, node: Option<Node>) -> TypeExpr {
        match node {
            Some(ty) => self.lower_type(ty),
            None => TypeExpr::Unsupported {
                kind: "missing".to_string(),
                text: String::new(),
            },
        }
    }

    fn lower_type(&self, node: Node) -> TypeExpr {
        match node.kind() {
            "type_identifier" | "identifier" | "package_identifier" | "field_identifier" => {
                TypeExpr::ident(self.text(node))
            }
            "qualified_type" => TypeExpr::Selector {
                package: Box::new(TypeExpr::ident(
                    node.child_by_field_name("package").map(|p| self.text(p)).unwrap_or_default(),
                )),
                name: node
                    .child_by_field_name("name")
                    .map(|n| self.text(n).to_string())
                    .unwrap_or_default(),
            },
            "pointer_type" => TypeExpr::pointer(self.lower_opt_type(first_named_child(node))),
            "slice_type" | "array_type" | "implicit_length_array_type" => {
                TypeExpr::array(self.lower_opt_type(node.child_by_field_name("element")))
            }
            "map_type" => TypeExpr::Map {
                key: Box::new(self.lower_opt_type(node.child_by_field_name("key"))),
                value: Box::new(self.lower_opt_type(node.child_by_field_name("value"))),
            },
            "struct_type" => TypeExpr::Struct(self.lower_struct_fields(node)),
            "interface_type" => TypeExpr::Interface(self.lower_interface_elems(node)),
            "function_type" => TypeExpr::Func(FuncType {
                type_params: Vec::new(),
                params: node
                    .child_by_field_name("parameters")
                    .map(|p| self.lower_parameter_list(p))
                    .unwrap_or_default(),
                results: self.lower_result(node.child_by_field_name("result")),
            }),
            "generic_type" => TypeExpr::Generic {
                base: Box::new(self.lower_opt_type(node.child_by_field_name("type"))),
                args: node
                    .child_by_field_name("type_arguments")
                    .map(|args| {
                        named_children(args)
                            .into_iter()
                            .map(|arg| self.lower_type(arg))
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            "type_elem" => {
                let members = named_children(node);
                match members.as_slice() {
                    [single] => self.lower_type(*single),
                    _ => self.unsupported(node),
                }
            }
            _ => self.unsupported(node),
        }
    }

    fn unsupported(&self, node: Node) -> TypeExpr {
        TypeExpr::Unsupported {
            kind: node.kind().to_string(),
            text: self.text(node).to_string(),
        }
    }

    fn lower_struct_fields(&self, node: Node) -> Vec<Field> {
        let Some(list) = named_children(node)
            .into_iter()
            .find(|c| c.kind() == "field_declaration_list")
        else {
            return Vec::new();
        };

        named_children(list)
            .into_iter()
            .filter(|f| f.kind() == "field_declaration")
            .map(|field| {
                let names: Vec<String> = field_children(field, "name")
                    .into_iter()
                    .map(|n| self.text(n).to_string())
                    .collect();
                let mut ty = self.lower_opt_type(field.child_by_field_name("type"));
                if names.is_empty() && has_child(field, "*") {
                    ty = TypeExpr::pointer(ty);
                }
                Field::new(names, ty)
            })
            .collect()
    }

    fn lower_interface_elems(&self, node: Node) -> Vec<Field> {
        named_children(node)
            .into_iter()
            .filter_map(|elem| match elem.kind() {
                "method_elem" | "method_spec" => {
                    let name = elem
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string())
                        .unwrap_or_default();
                    Some(Field::new(
                        vec![name],
                        TypeExpr::Func(FuncType {
                            type_params: Vec::new(),
                            params: elem
                                .child_by_field_name("parameters")
                                .map(|p| self.lower_parameter_list(p))
                                .unwrap_or_default(),
                            results: self.lower_result(elem.child_by_field_name("result")),
                        }),
                    ))
                }
                "comment" => None,
                _ => Some(Field::unnamed(self.lower_type(elem))),
            })
            .collect()
    }
}

/// Group comments the way Go's scanner does: adjacent lines form one group,
/// and a comment trailing a token on the same line only groups with other
/// comments on that line.
fn group_comments(parsed: &ParsedFile, comments: &[Node]) -> Vec<GroupInfo> {
    let mut groups: Vec<GroupInfo> = Vec::new();

    for node in comments {
        let start_row = node.start_position().row;
        let line_comment = trails_token(*node);
        let comment = Comment {
            text: parsed.node_text(node).to_string(),
            pos: Pos(parsed.base + node.start_byte()),
            end: Pos(parsed.base + node.end_byte()),
        };

        let joins = match groups.last() {
            Some(g) if g.line_comment => start_row == g.end_row,
            Some(g) => !line_comment && start_row <= g.end_row + 1,
            None => false,
        };

        match groups.last_mut() {
            Some(g) if joins => {
                g.group.list.push(comment);
                g.end_byte = node.end_byte();
                g.end_row = node.end_position().row;
            }
            _ => groups.push(GroupInfo {
                group: CommentGroup::new(vec![comment]),
                end_byte: node.end_byte(),
                end_row: node.end_position().row,
                line_comment,
            }),
        }
    }

    groups
}

/// True when a non-comment token precedes `node` on the same line.
///
/// Comments after the package clause do not belong to it and stay
/// available as documentation for the first declaration.
fn trails_token(node: Node) -> bool {
    let mut prev = node.prev_sibling();
    while let Some(p) = prev {
        if p.kind() != "comment" {
            break;
        }
        prev = p.prev_sibling();
    }

    let Some(mut token) = prev else {
        return false;
    };
    if token.kind() == "\n" {
        return false;
    }
    if token.end_position().row != node.start_position().row {
        return false;
    }
    if token.kind() == ";" {
        match token.prev_sibling() {
            Some(before) => token = before,
            None => return true,
        }
    }
    token.kind() != "package_clause"
}

fn unquote(literal: &str) -> String {
    let trimmed = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')));
    trimmed.unwrap_or(literal).to_string()
}

fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect()
}

fn first_named_child(node: Node) -> Option<Node> {
    named_children(node).into_iter().next()
}

fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

fn has_child(node: Node, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}
