use std::sync::Arc;

pub use crate::parser::positions::{Position, Span};

/// One parsed Go source file
#[derive(Debug, Clone)]
pub struct SourceUnit {
    /// Package name from the package clause
    pub package: String,
    pub imports: Vec<ImportSpec>,
    /// Top-level `type` declaration groups, in source order
    pub groups: Vec<TypeGroup>,
    pub source: Arc<str>,
}

/// A single import line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit import name (`u "github.com/google/uuid"`, `_`, `.`)
    pub name: Option<String>,
    /// Unquoted import path
    pub path: String,
}

/// A line comment or block comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Full comment text including the `//` or `/*` marker
    pub text: String,
    pub span: Span,
}

/// A `type` declaration, either `type X ...` or `type ( ... )`
#[derive(Debug, Clone)]
pub struct TypeGroup {
    /// Comment block directly above the `type` keyword
    pub doc: Vec<Comment>,
    pub specs: Vec<TypeSpec>,
}

#[derive(Debug, Clone)]
pub struct TypeSpec {
    pub name: String,
    /// Declared with type parameters (`type Box[T any] struct`)
    pub generic: bool,
    pub kind: TypeSpecKind,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum TypeSpecKind {
    Struct(Vec<Field>),
    /// Any other definition or alias, with its grammar node kind
    Other { shape: String, alias: bool },
}

impl TypeSpec {
    pub fn fields(&self) -> Option<&[Field]> {
        match &self.kind {
            TypeSpecKind::Struct(fields) => Some(fields),
            TypeSpecKind::Other { .. } => None,
        }
    }
}

/// Struct field declaration
#[derive(Debug, Clone)]
pub struct Field {
    /// Declared names; empty for embedded fields, several for `a, b int`
    pub names: Vec<String>,
    pub ty: TypeExpr,
    pub span: Span,
}

/// Type expression of a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Identifier(String),
    Pointer(Box<TypeExpr>),
    Qualified { package: String, name: String },
    /// Slice when `len` is `None`, array otherwise
    Slice { len: Option<String>, elem: Box<TypeExpr> },
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    /// Any interface type
    Any,
    Channel(Box<TypeExpr>),
    Variadic(Box<TypeExpr>),
    /// Shape the generator cannot express, with its grammar kind and raw text
    Unsupported { shape: String, text: String },
}

impl TypeExpr {
    pub fn pointer(inner: TypeExpr) -> Self {
        TypeExpr::Pointer(Box::new(inner))
    }

    pub fn slice(elem: TypeExpr) -> Self {
        TypeExpr::Slice { len: None, elem: Box::new(elem) }
    }

    pub fn map(key: TypeExpr, value: TypeExpr) -> Self {
        TypeExpr::Map { key: Box::new(key), value: Box::new(value) }
    }

    pub fn qualified(package: &str, name: &str) -> Self {
        TypeExpr::Qualified { package: package.to_string(), name: name.to_string() }
    }

    pub fn ident(name: &str) -> Self {
        TypeExpr::Identifier(name.to_string())
    }
}
