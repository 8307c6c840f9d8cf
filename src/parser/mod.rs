pub mod positions;
mod tree_builder;

pub use positions::{Position, Span};
use tree_builder::TreeBuilder;

use crate::ast::SourceUnit;
use crate::error::{ErrorKind, ParseError};
use std::sync::Arc;

/// Parser trait - converts source code to AST
pub trait Parser {
    fn parse(&self, source: &str) -> Result<SourceUnit, ParseError>;
}

/// Go source parser backed by tree-sitter
pub struct GoParser {
    // Configuration only, no state
}

impl GoParser {
    pub fn new() -> Self {
        Self {}
    }

    /// Parse `source` and report the first syntax error, without lowering.
    pub fn check(&self, source: &str) -> Result<(), ParseError> {
        let tree = syntax_tree(source)?;
        match tree_builder::first_error(tree.root_node()) {
            Some(node) => Err(tree_builder::error_at(node, source)),
            None => Ok(()),
        }
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GoParser {
    fn parse(&self, source: &str) -> Result<SourceUnit, ParseError> {
        let tree = syntax_tree(source)?;

        let source_arc: Arc<str> = Arc::from(source);
        let builder = TreeBuilder::new(source_arc.clone());
        builder.build(tree.root_node())
    }
}

fn syntax_tree(source: &str) -> Result<tree_sitter::Tree, ParseError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_go::LANGUAGE.into())
        .map_err(|e| ParseError::new(ErrorKind::GrammarUnavailable, e.to_string(), Span::default()))?;

    parser.parse(source, None).ok_or_else(|| {
        ParseError::new(ErrorKind::InvalidSyntax, "parser produced no syntax tree", Span::default())
    })
}
