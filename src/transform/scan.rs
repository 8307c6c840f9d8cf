use crate::ast::{Comment, ImportSpec, SourceUnit, TypeGroup, TypeSpec};

/// Comment literal that marks a `type` group for generation
pub const DIRECTIVE: &str = "//go:generate getters";

/// Declarations collected from one source file
#[derive(Debug, Default)]
pub struct ScanResult<'a> {
    pub package: String,
    pub imports: Vec<ImportSpec>,
    /// Struct declarations from marked groups, in source order
    pub declarations: Vec<&'a TypeSpec>,
}

impl ScanResult<'_> {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Find struct declarations in groups marked with the directive.
///
/// Package name and imports are file-scoped and only captured once a group
/// matches, so a file without marked groups yields an empty result.
pub fn scan(unit: &SourceUnit) -> ScanResult<'_> {
    let mut result = ScanResult::default();

    for group in unit.groups.iter().filter(|g| is_marked(g)) {
        result.package = unit.package.clone();
        result.imports = unit.imports.clone();

        // Aliases and named non-struct types in the same group are skipped
        result
            .declarations
            .extend(group.specs.iter().filter(|spec| spec.fields().is_some()));
    }

    result
}

/// Whether the group's doc block carries the directive
pub fn is_marked(group: &TypeGroup) -> bool {
    group.doc.iter().any(has_directive)
}

fn has_directive(comment: &Comment) -> bool {
    comment.text.lines().any(|line| {
        line.trim_end()
            .strip_prefix(DIRECTIVE)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
    })
}
