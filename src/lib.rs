//! Generate read-only accessor methods for Go structs.
//!
//! A `type` group preceded by `//go:generate getters` gets one accessor per
//! struct field, written to a sibling `<name>_getters.go` file.

pub mod ast;
pub mod error;
pub mod generate;
pub mod parser;
pub mod transform;

pub use error::{FileError, GenerateError, ParseError};
pub use generate::{Emitter, FormatterKind, DEFAULT_TEMPLATE, output_path};
pub use parser::{GoParser, Parser};
pub use transform::{AccessorField, AccessorModel, CollisionPolicy, ExportFn, export_ascii, export_title};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use transform::AccessorModelBuilder;
use walkdir::WalkDir;

/// What a run does when one file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first failing file
    #[default]
    AbortOnFirst,
    /// Report the failure and move on to the next file
    ContinueOnError,
}

/// Configuration for generation.
#[derive(Debug, Clone)]
pub struct Options {
    /// Turns a field name into its accessor name
    pub export: ExportFn,
    pub collisions: CollisionPolicy,
    pub on_error: ErrorPolicy,
    /// Receiver name in generated methods (default: "n")
    pub receiver: String,
    pub formatter: FormatterKind,
    /// Template text; the bundled template when `None`
    pub template: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            export: export_ascii,
            collisions: CollisionPolicy::default(),
            on_error: ErrorPolicy::default(),
            receiver: generate::DEFAULT_RECEIVER.to_string(),
            formatter: FormatterKind::default(),
            template: None,
        }
    }
}

/// Outcome of a directory run
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Number of `.go` files inspected
    pub scanned: usize,
    /// Files written, in walk order
    pub generated: Vec<PathBuf>,
    /// Failures skipped under `ErrorPolicy::ContinueOnError`
    pub failures: Vec<FileError>,
}

/// Parse, analyze and emit, configured once and reused for every file
pub struct Pipeline {
    parser: GoParser,
    builder: AccessorModelBuilder,
    emitter: Emitter,
    on_error: ErrorPolicy,
}

impl Pipeline {
    pub fn new(options: Options) -> Result<Self, GenerateError> {
        let template = options.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let emitter = Emitter::new(template)?
            .with_receiver(options.receiver)
            .with_formatter(options.formatter.build());

        Ok(Self {
            parser: GoParser::new(),
            builder: AccessorModelBuilder::new(options.export, options.collisions),
            emitter,
            on_error: options.on_error,
        })
    }

    /// Pipeline with default options
    pub fn standard() -> Result<Self, GenerateError> {
        Self::new(Options::default())
    }

    /// Accessor model for `source`, or `None` when nothing is marked
    pub fn model(&self, source: &str) -> Result<Option<AccessorModel>, GenerateError> {
        let unit = self.parser.parse(source)?;
        let scanned = transform::scan(&unit);
        if scanned.is_empty() {
            return Ok(None);
        }
        debug!(
            package = %scanned.package,
            declarations = scanned.declarations.len(),
            "found marked declarations"
        );
        self.builder.build(&scanned).map(Some)
    }

    /// Generated source for `source`, or `None` when nothing is marked
    pub fn compile(&self, source: &str) -> Result<Option<String>, GenerateError> {
        match self.model(source)? {
            Some(model) => self.emitter.emit(&model).map(Some),
            None => Ok(None),
        }
    }

    /// Generate the sibling file of `path`; returns the written path
    pub fn generate_file(&self, path: &Path) -> Result<Option<PathBuf>, GenerateError> {
        let source = fs::read_to_string(path).map_err(|source| GenerateError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(code) = self.compile(&source)? else {
            return Ok(None);
        };

        let output = output_path(path);
        generate::write_output(&output, &code)?;
        info!(input = %path.display(), output = %output.display(), "generated getters");
        Ok(Some(output))
    }

    /// Generate getters for every `.go` file below `dir`
    pub fn run(&self, dir: &Path) -> Result<RunSummary, FileError> {
        self.run_with(dir, |_| {})
    }

    /// Like `run`, calling `on_generated` after each file is written
    pub fn run_with(&self, dir: &Path, mut on_generated: impl FnMut(&Path)) -> Result<RunSummary, FileError> {
        let mut summary = RunSummary::default();

        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(dir).to_path_buf();
                    self.fail(&mut summary, FileError::new(path, GenerateError::Walk(err)))?;
                    continue;
                }
            };

            let path = entry.path();
            if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "go") {
                continue;
            }

            summary.scanned += 1;
            debug!(file = %path.display(), "scanning");

            match self.generate_file(path) {
                Ok(Some(output)) => {
                    on_generated(&output);
                    summary.generated.push(output);
                }
                Ok(None) => {}
                Err(err) => self.fail(&mut summary, FileError::new(path, err))?,
            }
        }

        Ok(summary)
    }

    fn fail(&self, summary: &mut RunSummary, err: FileError) -> Result<(), FileError> {
        match self.on_error {
            ErrorPolicy::AbortOnFirst => Err(err),
            ErrorPolicy::ContinueOnError => {
                warn!(file = %err.path.display(), error = %err.source, "skipping file");
                summary.failures.push(err);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER: &str = r#"package example

import (
	"go/ast"
	"math/rand"
	"time"

	"github.com/google/uuid"
)

//go:generate getters
type User struct {
	id        uuid.UUID
	name      string
	age       int
	birthday  time.Time
	children  []User
	createdAt time.Time
	updatedAt time.Time
}

type Ast struct {
	node *ast.Node
	num  int
}

func (a Ast) RandomNum() int {
	seed := time.Now().UnixNano()
	rand.Seed(seed)
	val := rand.Intn(100)

	return val
}
"#;

    const USER_GETTERS: &str = r#"// Code generated. DO NOT EDIT.
package example

import (
	"time"

	"github.com/google/uuid"
)

func (n User) Id() uuid.UUID {
	return n.id
}

func (n User) Name() string {
	return n.name
}

func (n User) Age() int {
	return n.age
}

func (n User) Birthday() time.Time {
	return n.birthday
}

func (n User) Children() []User {
	return n.children
}

func (n User) CreatedAt() time.Time {
	return n.createdAt
}

func (n User) UpdatedAt() time.Time {
	return n.updatedAt
}
"#;

    #[test]
    fn test_compile_user_example() {
        let pipeline = Pipeline::standard().unwrap();
        let code = pipeline.compile(USER).unwrap().unwrap();
        assert_eq!(code, USER_GETTERS);
    }

    #[test]
    fn test_compile_unmarked_source() {
        let pipeline = Pipeline::standard().unwrap();
        let source = "package p\n\ntype A struct {\n\tx int\n}\n";
        assert!(pipeline.compile(source).unwrap().is_none());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let pipeline = Pipeline::standard().unwrap();
        let first = pipeline.compile(USER).unwrap();
        for _ in 0..5 {
            assert_eq!(pipeline.compile(USER).unwrap(), first);
        }
    }

    #[test]
    fn test_title_case_export_option() {
        let options = Options {
            export: export_title,
            ..Options::default()
        };
        let pipeline = Pipeline::new(options).unwrap();
        let source = "package p\n\n//go:generate getters\ntype A struct {\n\télan int\n}\n";
        let code = pipeline.compile(source).unwrap().unwrap();
        assert!(code.contains("func (n A) Élan() int {"));
    }

    #[test]
    fn test_custom_template_option() {
        let options = Options {
            template: Some("package {{ package }}\n// {{ fields | length }} accessors\n".to_string()),
            ..Options::default()
        };
        let pipeline = Pipeline::new(options).unwrap();
        let code = pipeline.compile(USER).unwrap().unwrap();
        assert_eq!(code, "package example\n// 7 accessors\n");
    }

    #[test]
    fn test_interface_literal_field_rejected() {
        let pipeline = Pipeline::standard().unwrap();
        let source = "package p\n\n//go:generate getters\ntype A struct {\n\ts interface{ String() string }\n}\n";
        let err = pipeline.compile(source).unwrap_err();
        assert!(matches!(
            err,
            GenerateError::UnsupportedFieldType { ref field, ref shape, .. } if field == "s" && shape == "interface type"
        ));
    }

    #[test]
    fn test_model_serializes_for_json_output() {
        let pipeline = Pipeline::standard().unwrap();
        let model = pipeline.model(USER).unwrap().unwrap();
        let value = serde_json::to_value(&model).unwrap();

        assert_eq!(value["package"], "example");
        assert_eq!(value["imports"][0]["path"], "time");
        assert_eq!(value["imports"][1]["path"], "github.com/google/uuid");
        assert!(value["imports"][1]["name"].is_null());
        assert_eq!(value["fields"][0]["owner"], "User");
        assert_eq!(value["fields"][0]["method"], "Id");
        assert_eq!(value["fields"][0]["field"], "id");
        assert_eq!(value["fields"][0]["field_type"], "uuid.UUID");
        assert_eq!(value["fields"].as_array().map(Vec::len), Some(7));
    }

    #[test]
    fn test_parse_error_propagates() {
        let pipeline = Pipeline::standard().unwrap();
        let err = pipeline.compile("package p\n\n//go:generate getters\ntype A struct {\n").unwrap_err();
        assert!(matches!(err, GenerateError::Parse(_)));
    }
}
