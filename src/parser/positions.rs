//! Source positions.
//!
//! tree-sitter reports rows and byte columns. Diagnostics underline with
//! character columns, so byte columns are converted against the source line.

/// Position in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Byte offset in source
    pub byte: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column number (0-indexed, in characters)
    pub col: usize,
}

impl Position {
    /// Build a position from a byte offset and a tree-sitter point.
    pub fn from_point(source: &str, byte: usize, point: tree_sitter::Point) -> Self {
        let line_start = byte.saturating_sub(point.column);
        let col = source
            .get(line_start..byte)
            .map_or(point.column, |prefix| prefix.chars().count());
        Self { byte, line: point.row, col }
    }
}

/// Span in source code (a range from start position to end position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Span covering a tree-sitter node.
    pub fn of(node: &tree_sitter::Node, source: &str) -> Self {
        Self {
            start: Position::from_point(source, node.start_byte(), node.start_position()),
            end: Position::from_point(source, node.end_byte(), node.end_position()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Point;

    #[test]
    fn test_ascii_column() {
        let source = "package main\ntype User struct{}";
        let pos = Position::from_point(source, 18, Point { row: 1, column: 5 });
        assert_eq!(pos.line, 1);
        assert_eq!(pos.col, 5);
    }

    #[test]
    fn test_multibyte_column() {
        let source = "// café x";
        // é is 2 bytes but 1 character
        let pos = Position::from_point(source, 9, Point { row: 0, column: 9 });
        assert_eq!(pos.col, 8);
    }

    #[test]
    fn test_out_of_range_falls_back_to_byte_column() {
        let pos = Position::from_point("ab", 40, Point { row: 3, column: 7 });
        assert_eq!(pos.col, 7);
    }
}
