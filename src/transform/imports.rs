use crate::ast::ImportSpec;
use serde::Serialize;
use std::collections::HashMap;

/// An import that the generated file needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsedImport {
    /// Explicit import name, carried over from the source file
    pub name: Option<String>,
    pub path: String,
}

impl UsedImport {
    /// Standard library paths have no dot in their first segment
    pub fn is_std(&self) -> bool {
        !self.path.split('/').next().unwrap_or_default().contains('.')
    }
}

#[derive(Debug, Clone)]
struct TrackedImport {
    import: UsedImport,
    used: bool,
}

/// Tracks which imports are referenced by resolved field types.
#[derive(Debug, Default)]
pub struct ImportUsageTracker {
    by_alias: HashMap<String, TrackedImport>,
}

impl ImportUsageTracker {
    pub fn new(imports: &[ImportSpec]) -> Self {
        let mut by_alias = HashMap::new();
        for spec in imports {
            let alias = match spec.name.as_deref() {
                // Blank and dot imports never appear as qualifiers
                Some("_") | Some(".") => continue,
                Some(name) => name,
                None => short_alias(&spec.path),
            };

            // A later import with the same alias replaces the earlier one
            by_alias.insert(
                alias.to_string(),
                TrackedImport {
                    import: UsedImport {
                        name: spec.name.clone(),
                        path: spec.path.clone(),
                    },
                    used: false,
                },
            );
        }
        Self { by_alias }
    }

    /// Mark every alias that qualifies a name in `type_text` as used.
    pub fn mark(&mut self, type_text: &str) {
        for qualifier in qualifiers(type_text) {
            if let Some(tracked) = self.by_alias.get_mut(qualifier) {
                tracked.used = true;
            }
        }
    }

    pub fn is_used(&self, alias: &str) -> bool {
        self.by_alias.get(alias).is_some_and(|t| t.used)
    }

    /// Used imports, standard library first, each group sorted by path
    pub fn used(&self) -> Vec<UsedImport> {
        let mut used: Vec<UsedImport> = self
            .by_alias
            .values()
            .filter(|t| t.used)
            .map(|t| t.import.clone())
            .collect();
        used.sort_by(|a, b| {
            b.is_std()
                .cmp(&a.is_std())
                .then_with(|| a.path.cmp(&b.path))
                .then_with(|| a.name.cmp(&b.name))
        });
        used
    }
}

/// Last segment of an import path
pub fn short_alias(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Identifiers directly followed by `.` and another identifier.
///
/// For `uuid.UUID` this is the text before the first dot; composite types
/// such as `map[string]*time.Time` yield every qualifier they contain.
pub fn qualifiers(text: &str) -> Vec<&str> {
    let mut found = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if is_ident_char(c) {
            start.get_or_insert(i);
            continue;
        }

        if c == '.' {
            let followed_by_ident = chars.peek().is_some_and(|&(_, next)| next == '_' || next.is_alphabetic());
            if let Some(qualifier) = start.and_then(|s| text.get(s..i)) {
                if followed_by_ident && qualifier.starts_with(|ch: char| ch == '_' || ch.is_alphabetic()) {
                    found.push(qualifier);
                }
            }
        }
        start = None;
    }

    found
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}
