use crate::error::GenerateError;
use crate::parser::GoParser;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Validates and normalizes generated source
pub trait Formatter {
    fn format(&self, source: &str) -> Result<String, GenerateError>;
}

/// Which formatter a pipeline uses
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormatterKind {
    #[default]
    Canonical,
    /// External program reading source on stdin and printing it on stdout
    External(PathBuf),
}

impl FormatterKind {
    pub fn build(&self) -> Box<dyn Formatter> {
        match self {
            FormatterKind::Canonical => Box::new(CanonicalFormatter::new()),
            FormatterKind::External(program) => Box::new(GofmtFormatter::new(program.clone())),
        }
    }
}

fn rejected(message: impl Into<String>, source: &str) -> GenerateError {
    GenerateError::Format {
        message: message.into(),
        source_text: source.to_string(),
    }
}

/// Built-in formatter: rejects text that does not parse as Go, then
/// normalizes layout.
pub struct CanonicalFormatter {
    parser: GoParser,
}

impl CanonicalFormatter {
    pub fn new() -> Self {
        Self { parser: GoParser::new() }
    }
}

impl Default for CanonicalFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter for CanonicalFormatter {
    fn format(&self, source: &str) -> Result<String, GenerateError> {
        self.parser
            .check(source)
            .map_err(|err| rejected(err.to_string(), source))?;
        Ok(normalize(source))
    }
}

/// Strip trailing whitespace, collapse blank-line runs, drop leading and
/// trailing blank lines and end with exactly one newline.
pub fn normalize(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut pending_blank = false;

    for line in source.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            pending_blank = !out.is_empty();
            continue;
        }
        if pending_blank {
            out.push('\n');
            pending_blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }

    out
}

/// Pipes generated source through an external formatter such as `gofmt`
pub struct GofmtFormatter {
    program: PathBuf,
}

impl GofmtFormatter {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self { program: program.into() }
    }
}

impl Formatter for GofmtFormatter {
    fn format(&self, source: &str) -> Result<String, GenerateError> {
        let program = self.program.display();
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| rejected(format!("failed to start `{}`: {}", program, e), source))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(source.as_bytes())
                .map_err(|e| rejected(format!("failed to write to `{}`: {}", program, e), source))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| rejected(format!("`{}` did not finish: {}", program, e), source))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(rejected(format!("`{}` failed: {}", program, stderr.trim()), source));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| rejected(format!("`{}` printed invalid UTF-8: {}", program, e), source))
    }
}
