mod format;
mod output;

pub use format::{CanonicalFormatter, Formatter, FormatterKind, GofmtFormatter, normalize};
pub use output::{output_path, write_output};

use crate::error::GenerateError;
use crate::transform::{AccessorModel, UsedImport};
use minijinja::{Environment, context};
use serde::Serialize;

/// Template shipped with the crate
pub const DEFAULT_TEMPLATE: &str = include_str!("../../templates/getters.go.tmpl");

/// Receiver name used in generated methods
pub const DEFAULT_RECEIVER: &str = "n";

const TEMPLATE_NAME: &str = "getters.go";

/// One line of the generated import block
#[derive(Debug, Clone, Serialize)]
struct ImportLine<'a> {
    /// Explicit name, empty when the import has none
    name: &'a str,
    path: &'a str,
}

/// Renders accessor models into Go source
pub struct Emitter {
    env: Environment<'static>,
    receiver: String,
    formatter: Box<dyn Formatter>,
}

impl Emitter {
    /// Compile `template` once; it is not reloaded afterwards.
    pub fn new(template: &str) -> Result<Self, GenerateError> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.add_template_owned(TEMPLATE_NAME, template.to_string())?;

        Ok(Self {
            env,
            receiver: DEFAULT_RECEIVER.to_string(),
            formatter: Box::new(CanonicalFormatter::new()),
        })
    }

    pub fn with_receiver(mut self, receiver: impl Into<String>) -> Self {
        self.receiver = receiver.into();
        self
    }

    pub fn with_formatter(mut self, formatter: Box<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    /// Render the template without formatting
    pub fn render(&self, model: &AccessorModel) -> Result<String, GenerateError> {
        let template = self.env.get_template(TEMPLATE_NAME)?;
        let rendered = template.render(context! {
            package => &model.package,
            import_groups => import_groups(&model.imports),
            fields => &model.fields,
            receiver => &self.receiver,
        })?;
        Ok(rendered)
    }

    /// Render and format; a formatter rejection carries the raw rendering
    pub fn emit(&self, model: &AccessorModel) -> Result<String, GenerateError> {
        let rendered = self.render(model)?;
        self.formatter.format(&rendered)
    }
}

/// Standard library imports first, then everything else
fn import_groups(imports: &[UsedImport]) -> Vec<Vec<ImportLine<'_>>> {
    let std: Vec<ImportLine> = imports.iter().filter(|i| i.is_std()).map(import_line).collect();
    let others: Vec<ImportLine> = imports.iter().filter(|i| !i.is_std()).map(import_line).collect();

    [std, others].into_iter().filter(|group| !group.is_empty()).collect()
}

fn import_line(import: &UsedImport) -> ImportLine<'_> {
    ImportLine {
        name: import.name.as_deref().unwrap_or_default(),
        path: &import.path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::AccessorField;

    fn field(owner: &str, method: &str, name: &str, ty: &str) -> AccessorField {
        AccessorField {
            owner: owner.to_string(),
            method: method.to_string(),
            field: name.to_string(),
            field_type: ty.to_string(),
        }
    }

    fn import(name: Option<&str>, path: &str) -> UsedImport {
        UsedImport {
            name: name.map(str::to_string),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_emit_with_grouped_imports() {
        let model = AccessorModel {
            package: "example".to_string(),
            imports: vec![import(None, "time"), import(None, "github.com/google/uuid")],
            fields: vec![
                field("User", "Id", "id", "uuid.UUID"),
                field("User", "Birthday", "birthday", "time.Time"),
            ],
        };
        let code = Emitter::new(DEFAULT_TEMPLATE).unwrap().emit(&model).unwrap();

        assert_eq!(
            code,
            "// Code generated. DO NOT EDIT.\n\
             package example\n\
             \n\
             import (\n\
             \t\"time\"\n\
             \n\
             \t\"github.com/google/uuid\"\n\
             )\n\
             \n\
             func (n User) Id() uuid.UUID {\n\
             \treturn n.id\n\
             }\n\
             \n\
             func (n User) Birthday() time.Time {\n\
             \treturn n.birthday\n\
             }\n"
        );
    }

    #[test]
    fn test_emit_without_imports() {
        let model = AccessorModel {
            package: "p".to_string(),
            imports: Vec::new(),
            fields: vec![field("A", "X", "x", "int")],
        };
        let code = Emitter::new(DEFAULT_TEMPLATE).unwrap().emit(&model).unwrap();
        assert_eq!(
            code,
            "// Code generated. DO NOT EDIT.\npackage p\n\nfunc (n A) X() int {\n\treturn n.x\n}\n"
        );
    }

    #[test]
    fn test_named_import_line() {
        let model = AccessorModel {
            package: "p".to_string(),
            imports: vec![import(Some("guuid"), "github.com/google/uuid")],
            fields: vec![field("A", "Id", "id", "guuid.UUID")],
        };
        let code = Emitter::new(DEFAULT_TEMPLATE).unwrap().emit(&model).unwrap();
        assert!(code.contains("import (\n\tguuid \"github.com/google/uuid\"\n)\n"));
    }

    #[test]
    fn test_custom_receiver() {
        let model = AccessorModel {
            package: "p".to_string(),
            imports: Vec::new(),
            fields: vec![field("A", "X", "x", "int")],
        };
        let code = Emitter::new(DEFAULT_TEMPLATE)
            .unwrap()
            .with_receiver("a")
            .emit(&model)
            .unwrap();
        assert!(code.contains("func (a A) X() int {\n\treturn a.x\n}"));
    }

    #[test]
    fn test_custom_template() {
        let template = "package {{ package }}\n{% for field in fields %}\n\nfunc (r *{{ field.owner }}) {{ field.method }}() {{ field.field_type }} { return r.{{ field.field }} }\n{% endfor %}\n";
        let model = AccessorModel {
            package: "p".to_string(),
            imports: Vec::new(),
            fields: vec![field("A", "X", "x", "int")],
        };
        let code = Emitter::new(template).unwrap().emit(&model).unwrap();
        assert_eq!(code, "package p\n\nfunc (r *A) X() int { return r.x }\n");
    }

    #[test]
    fn test_broken_template_rejected_at_construction() {
        assert!(matches!(
            Emitter::new("{% for x in %}"),
            Err(GenerateError::Template(_))
        ));
    }

    #[test]
    fn test_channel_field_rejected_by_formatter() {
        let model = AccessorModel {
            package: "p".to_string(),
            imports: Vec::new(),
            fields: vec![field("A", "Events", "events", "chann int")],
        };
        match Emitter::new(DEFAULT_TEMPLATE).unwrap().emit(&model) {
            Err(GenerateError::Format { source_text, .. }) => {
                assert!(source_text.contains("func (n A) Events() chann int {"));
            }
            other => panic!("expected formatter rejection, got {other:?}"),
        }
    }
}
