use super::imports::{ImportUsageTracker, UsedImport};
use super::scan::ScanResult;
use super::signature;
use crate::ast::{Field, TypeSpec};
use crate::error::GenerateError;
use serde::Serialize;
use std::collections::HashSet;

/// Turns a field name into the name of its accessor
pub type ExportFn = fn(&str) -> String;

/// One generated accessor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorField {
    /// Name of the struct the accessor is declared on
    pub owner: String,
    pub method: String,
    pub field: String,
    pub field_type: String,
}

/// Everything the emitter needs for one generated file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessorModel {
    pub package: String,
    pub imports: Vec<UsedImport>,
    pub fields: Vec<AccessorField>,
}

/// What to do when two accessors of a struct share a name, or an accessor
/// shares its name with a field of the same struct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    #[default]
    Reject,
    Allow,
}

/// Uppercase the first character if it is ASCII, keep the rest.
pub fn export_ascii(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Uppercase the first character with full Unicode case mapping, keep the rest.
pub fn export_title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds the accessor model for one file
#[derive(Debug, Clone)]
pub struct AccessorModelBuilder {
    export: ExportFn,
    collisions: CollisionPolicy,
}

impl AccessorModelBuilder {
    pub fn new(export: ExportFn, collisions: CollisionPolicy) -> Self {
        Self { export, collisions }
    }

    pub fn build(&self, scan: &ScanResult<'_>) -> Result<AccessorModel, GenerateError> {
        let mut tracker = ImportUsageTracker::new(&scan.imports);
        let mut fields = Vec::new();

        for decl in &scan.declarations {
            let accessors = self.declaration(decl)?;
            for accessor in &accessors {
                tracker.mark(&accessor.field_type);
            }
            fields.extend(accessors);
        }

        Ok(AccessorModel {
            package: scan.package.clone(),
            imports: tracker.used(),
            fields,
        })
    }

    fn declaration(&self, decl: &TypeSpec) -> Result<Vec<AccessorField>, GenerateError> {
        if decl.generic {
            return Err(GenerateError::UnsupportedDeclaration {
                name: decl.name.clone(),
                reason: format!("type parameters are not supported (line {})", decl.span.start.line + 1),
            });
        }

        let Some(fields) = decl.fields() else {
            return Ok(Vec::new());
        };

        let field_names: HashSet<&str> = fields
            .iter()
            .flat_map(|f| f.names.iter().map(String::as_str))
            .collect();
        let mut methods: HashSet<String> = HashSet::new();
        let mut accessors = Vec::with_capacity(fields.len());

        for field in fields {
            let name = field_name(&decl.name, field)?;
            let field_type = signature::resolve(&field.ty).map_err(|u| GenerateError::UnsupportedFieldType {
                owner: decl.name.clone(),
                field: name.to_string(),
                shape: u.shape.to_string(),
                text: u.text.to_string(),
            })?;
            let method = (self.export)(name);

            if self.collisions == CollisionPolicy::Reject {
                if field_names.contains(method.as_str()) {
                    return Err(GenerateError::MethodCollision {
                        owner: decl.name.clone(),
                        with: format!("field `{}`", method),
                        method,
                    });
                }
                if !methods.insert(method.clone()) {
                    return Err(GenerateError::MethodCollision {
                        owner: decl.name.clone(),
                        with: "another accessor".to_string(),
                        method,
                    });
                }
            }

            accessors.push(AccessorField {
                owner: decl.name.clone(),
                method,
                field: name.to_string(),
                field_type,
            });
        }

        Ok(accessors)
    }
}

impl Default for AccessorModelBuilder {
    fn default() -> Self {
        Self::new(export_ascii, CollisionPolicy::default())
    }
}

fn field_name<'a>(owner: &str, field: &'a Field) -> Result<&'a str, GenerateError> {
    match field.names.as_slice() {
        [name] if name == "_" => Err(GenerateError::UnsupportedField {
            owner: owner.to_string(),
            reason: format!("blank field on line {}", field.span.start.line + 1),
        }),
        [name] => Ok(name.as_str()),
        [] => Err(GenerateError::UnsupportedField {
            owner: owner.to_string(),
            reason: format!("embedded field on line {}", field.span.start.line + 1),
        }),
        names => Err(GenerateError::UnsupportedField {
            owner: owner.to_string(),
            reason: format!("field declares several names: {}", names.join(", ")),
        }),
    }
}
