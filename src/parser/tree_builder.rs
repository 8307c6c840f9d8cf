use super::positions::Span;
use crate::ast::*;
use crate::error::{ErrorKind, ParseError};
use std::sync::Arc;
use tree_sitter::Node;

/// Lowers a tree-sitter Go syntax tree into a `SourceUnit`
pub struct TreeBuilder {
    source: Arc<str>,
}

impl TreeBuilder {
    pub fn new(source: Arc<str>) -> Self {
        Self { source }
    }

    pub fn build(&self, root: Node) -> Result<SourceUnit, ParseError> {
        if let Some(node) = first_error(root) {
            return Err(error_at(node, &self.source));
        }

        let mut package = None;
        let mut imports = Vec::new();
        let mut groups = Vec::new();

        // Comments directly above the next declaration
        let mut pending_doc: Vec<Comment> = Vec::new();
        let mut prev_end_line: Option<usize> = None;

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            if child.kind() == "comment" {
                let comment = Comment {
                    text: self.text(child).to_string(),
                    span: self.span(child),
                };
                let start_line = comment.span.start.line;

                if prev_end_line == Some(start_line) {
                    // Trailing comment on a code line
                    pending_doc.clear();
                } else if pending_doc.last().is_some_and(|c| c.span.end.line + 1 == start_line) {
                    pending_doc.push(comment);
                } else {
                    pending_doc = vec![comment];
                }
                continue;
            }

            match child.kind() {
                "package_clause" => package = Some(self.package_name(child)),
                "import_declaration" => self.collect_imports(child, &mut imports),
                "type_declaration" => {
                    let start_line = child.start_position().row;
                    let doc = if pending_doc.last().is_some_and(|c| c.span.end.line + 1 == start_line) {
                        std::mem::take(&mut pending_doc)
                    } else {
                        Vec::new()
                    };
                    groups.push(self.type_group(child, doc));
                }
                _ => {}
            }

            pending_doc.clear();
            prev_end_line = Some(child.end_position().row);
        }

        let package = package.ok_or_else(|| {
            ParseError::new(ErrorKind::MissingPackage, "source file has no package clause", Span::default())
                .with_help("start the file with `package <name>`")
        })?;

        Ok(SourceUnit {
            package,
            imports,
            groups,
            source: self.source.clone(),
        })
    }

    fn package_name(&self, node: Node) -> String {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|c| c.kind() == "package_identifier")
            .map(|c| self.text(c).to_string());
        name.unwrap_or_default()
    }

    fn collect_imports(&self, node: Node, imports: &mut Vec<ImportSpec>) {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => imports.push(self.import_spec(child)),
                "import_spec_list" => {
                    let mut list_cursor = child.walk();
                    for spec in child.named_children(&mut list_cursor) {
                        if spec.kind() == "import_spec" {
                            imports.push(self.import_spec(spec));
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn import_spec(&self, node: Node) -> ImportSpec {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string());
        let raw = node
            .child_by_field_name("path")
            .map(|n| self.text(n))
            .unwrap_or_default();
        let path = unquote(raw).to_string();

        ImportSpec { name, path }
    }

    fn type_group(&self, node: Node, doc: Vec<Comment>) -> TypeGroup {
        let mut specs = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "type_spec" => specs.push(self.type_spec(child, false)),
                "type_alias" => specs.push(self.type_spec(child, true)),
                _ => {}
            }
        }

        TypeGroup { doc, specs }
    }

    fn type_spec(&self, node: Node, alias: bool) -> TypeSpec {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let generic = node.child_by_field_name("type_parameters").is_some();

        let kind = match node.child_by_field_name("type") {
            Some(ty) if ty.kind() == "struct_type" && !alias => TypeSpecKind::Struct(self.struct_fields(ty)),
            Some(ty) => TypeSpecKind::Other {
                shape: ty.kind().to_string(),
                alias,
            },
            None => TypeSpecKind::Other {
                shape: "missing".to_string(),
                alias,
            },
        };

        TypeSpec {
            name,
            generic,
            kind,
            span: self.span(node),
        }
    }

    fn struct_fields(&self, node: Node) -> Vec<Field> {
        let mut fields = Vec::new();
        let mut cursor = node.walk();
        for list in node.named_children(&mut cursor) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            let mut list_cursor = list.walk();
            for decl in list.named_children(&mut list_cursor) {
                if decl.kind() == "field_declaration" {
                    fields.push(self.field(decl));
                }
            }
        }
        fields
    }

    fn field(&self, node: Node) -> Field {
        let mut cursor = node.walk();
        let names = node
            .children_by_field_name("name", &mut cursor)
            .map(|n| self.text(n).to_string())
            .collect();

        Field {
            names,
            ty: self.field_type(node, "type"),
            span: self.span(node),
        }
    }

    fn field_type(&self, node: Node, field: &str) -> TypeExpr {
        match node.child_by_field_name(field) {
            Some(child) => self.type_expr(child),
            None => TypeExpr::Unsupported {
                shape: "missing type".to_string(),
                text: self.text(node).to_string(),
            },
        }
    }

    fn type_expr(&self, node: Node) -> TypeExpr {
        match node.kind() {
            "type_identifier" => TypeExpr::Identifier(self.text(node).to_string()),
            "pointer_type" => {
                let mut cursor = node.walk();
                let inner = node.named_children(&mut cursor).next();
                match inner {
                    Some(inner) => TypeExpr::Pointer(Box::new(self.type_expr(inner))),
                    None => self.unsupported(node),
                }
            }
            "qualified_type" => match (node.child_by_field_name("package"), node.child_by_field_name("name")) {
                (Some(package), Some(name)) => TypeExpr::Qualified {
                    package: self.text(package).to_string(),
                    name: self.text(name).to_string(),
                },
                _ => self.unsupported(node),
            },
            "slice_type" => TypeExpr::Slice {
                len: None,
                elem: Box::new(self.field_type(node, "element")),
            },
            "array_type" => TypeExpr::Slice {
                len: node.child_by_field_name("length").map(|n| self.text(n).to_string()),
                elem: Box::new(self.field_type(node, "element")),
            },
            "map_type" => TypeExpr::Map {
                key: Box::new(self.field_type(node, "key")),
                value: Box::new(self.field_type(node, "value")),
            },
            "interface_type" => {
                let mut cursor = node.walk();
                let has_members = node.named_children(&mut cursor).any(|member| member.kind() != "comment");
                // Only the empty interface is `any`; literals with members are not supported
                if has_members {
                    self.unsupported(node)
                } else {
                    TypeExpr::Any
                }
            }
            "channel_type" => TypeExpr::Channel(Box::new(self.field_type(node, "value"))),
            "variadic_parameter_declaration" => TypeExpr::Variadic(Box::new(self.field_type(node, "type"))),
            _ => self.unsupported(node),
        }
    }

    fn unsupported(&self, node: Node) -> TypeExpr {
        TypeExpr::Unsupported {
            shape: node.kind().replace('_', " "),
            text: self.text(node).to_string(),
        }
    }

    fn text(&self, node: Node) -> &str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    fn span(&self, node: Node) -> Span {
        Span::of(&node, &self.source)
    }
}

/// Strip the quotes of an interpreted or raw string literal
fn unquote(literal: &str) -> &str {
    let mut chars = literal.chars();
    match (chars.next(), chars.next_back()) {
        (Some('"'), Some('"')) | (Some('`'), Some('`')) => chars.as_str(),
        _ => literal,
    }
}

/// First `ERROR` or missing node in document order
pub(super) fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }

    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children.into_iter().find_map(first_error)
}

pub(super) fn error_at(node: Node, source: &str) -> ParseError {
    let span = Span::of(&node, source);
    if node.is_missing() {
        return ParseError::new(ErrorKind::MissingToken, format!("missing `{}`", node.kind()), span);
    }

    let text = source.get(node.byte_range()).unwrap_or_default();
    let snippet = text.lines().next().unwrap_or_default().trim();
    ParseError::new(ErrorKind::InvalidSyntax, format!("unexpected `{}`", snippet), span)
}
