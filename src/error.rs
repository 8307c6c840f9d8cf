use crate::ast::Span;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Kind of parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSyntax,
    MissingToken,
    MissingPackage,
    GrammarUnavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidSyntax => "Invalid syntax",
            ErrorKind::MissingToken => "Missing token",
            ErrorKind::MissingPackage => "Missing package clause",
            ErrorKind::GrammarUnavailable => "Grammar unavailable",
        }
    }
}

/// Error during parsing
#[derive(Debug, Clone)]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            help: None,
        }
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        self.render_inner(source, filename, true)
    }

    fn render_inner(&self, source: &str, filename: &str, color: bool) -> String {
        let red = if color { "\x1b[1;31m" } else { "" };
        let dim = if color { "\x1b[2m" } else { "" };
        let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
        let reset = if color { "\x1b[0m" } else { "" };

        let mut output = String::new();

        let line = self.span.start.line + 1;
        let col = self.span.start.col + 1;
        output.push_str(&format!(" {}file:{} {}:{}:{}\n", dim, reset, filename, line, col));
        output.push_str(&format!("{}error:{} {}\n", red, reset, self.message));

        if let Some(source_line) = source.lines().nth(self.span.start.line) {
            let width = format!("{}", line).len().max(2);
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = width));
            output.push_str(&format!(
                "{}{:>width$} |{} {}\n",
                dim,
                line,
                reset,
                source_line,
                width = width
            ));

            let underline_start = self.span.start.col;
            let underline_len = if self.span.end.line == self.span.start.line {
                self.span.end.col.saturating_sub(self.span.start.col).max(1)
            } else {
                source_line.chars().count().saturating_sub(underline_start).max(1)
            };
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{}{}\n",
                dim,
                "",
                reset,
                " ".repeat(underline_start),
                red,
                "^".repeat(underline_len),
                reset,
                width = width
            ));
        }

        if let Some(ref help) = self.help {
            output.push('\n');
            output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help));
        }

        output
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}: {}",
            self.kind.as_str(),
            self.span.start.line + 1,
            self.span.start.col + 1,
            self.message
        )
    }
}

impl std::error::Error for ParseError {}

/// Errors raised while generating getters for one source file
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("unsupported field type for field `{field}` of `{owner}`: {shape} `{text}`")]
    UnsupportedFieldType {
        owner: String,
        field: String,
        shape: String,
        text: String,
    },

    #[error("unsupported field in `{owner}`: {reason}")]
    UnsupportedField { owner: String, reason: String },

    #[error("unsupported declaration `{name}`: {reason}")]
    UnsupportedDeclaration { name: String, reason: String },

    #[error("accessor `{method}` of `{owner}` collides with {with}")]
    MethodCollision {
        owner: String,
        method: String,
        with: String,
    },

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("formatter rejected generated source: {message}\n--- generated source ---\n{source_text}")]
    Format { message: String, source_text: String },

    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to serialize accessor model: {0}")]
    Json(#[from] serde_json::Error),
}

/// A generation error tied to the file that caused it
#[derive(Debug, Error)]
#[error("{}: {source}", .path.display())]
pub struct FileError {
    pub path: PathBuf,
    #[source]
    pub source: GenerateError,
}

impl FileError {
    pub fn new(path: impl Into<PathBuf>, source: GenerateError) -> Self {
        Self { path: path.into(), source }
    }

    /// Render the error, with source context for parse errors
    pub fn render(&self, color: bool) -> String {
        match &self.source {
            GenerateError::Parse(err) => {
                let filename = self.path.display().to_string();
                match std::fs::read_to_string(&self.path) {
                    Ok(source) if color => err.render_color(&source, &filename),
                    Ok(source) => err.render(&source, &filename),
                    Err(_) => format!("error: {}\n", self),
                }
            }
            _ if color => format!("\x1b[1;31merror\x1b[0m: {}\n", self),
            _ => format!("error: {}\n", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Position;

    fn span(line: usize, col: usize, len: usize) -> Span {
        Span {
            start: Position { byte: 0, line, col },
            end: Position { byte: 0, line, col: col + len },
        }
    }

    #[test]
    fn test_render_underlines_span() {
        let source = "package main\n\ntype User struct {\n\tid uuid.UUID,,\n}\n";
        let err = ParseError::new(ErrorKind::InvalidSyntax, "unexpected `,`", span(3, 13, 2));
        let rendered = err.render(source, "user.go");

        assert!(rendered.contains(" file: user.go:4:14"));
        assert!(rendered.contains("error: unexpected `,`"));
        assert!(rendered.contains(" 4 | \tid uuid.UUID,,"));
        assert!(rendered.contains(&format!("{}^^", " ".repeat(13))));
    }

    #[test]
    fn test_render_includes_help() {
        let err = ParseError::new(ErrorKind::MissingPackage, "no package clause", span(0, 0, 1))
            .with_help("start the file with `package <name>`");
        let rendered = err.render("type A struct{}", "a.go");
        assert!(rendered.contains("help: start the file with `package <name>`"));
    }

    #[test]
    fn test_display_mentions_location() {
        let err = ParseError::new(ErrorKind::MissingToken, "missing `}`", span(1, 4, 1));
        assert_eq!(err.to_string(), "Missing token at 2:5: missing `}`");
    }

    #[test]
    fn test_file_error_display() {
        let err = FileError::new(
            "model/user.go",
            GenerateError::UnsupportedField {
                owner: "User".to_string(),
                reason: "embedded field `Base`".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "model/user.go: unsupported field in `User`: embedded field `Base`"
        );
    }
}
