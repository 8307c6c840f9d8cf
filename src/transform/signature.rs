//! Canonical text for field type expressions.

use crate::ast::TypeExpr;

/// Text emitted for any interface type
pub const ANY_TYPE: &str = "interface{}";

/// Prefix emitted for channel types, kept verbatim for every direction.
pub const CHANNEL_PREFIX: &str = "chann ";

/// A type shape with no textual form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported<'a> {
    pub shape: &'a str,
    pub text: &'a str,
}

/// Resolve a type expression into the text used as an accessor return type.
pub fn resolve(ty: &TypeExpr) -> Result<String, Unsupported<'_>> {
    let mut out = String::new();
    write_type(ty, &mut out)?;
    Ok(out)
}

fn write_type<'a>(ty: &'a TypeExpr, out: &mut String) -> Result<(), Unsupported<'a>> {
    match ty {
        TypeExpr::Identifier(name) => out.push_str(name),
        TypeExpr::Pointer(inner) => {
            out.push('*');
            write_type(inner, out)?;
        }
        TypeExpr::Qualified { package, name } => {
            out.push_str(package);
            out.push('.');
            out.push_str(name);
        }
        TypeExpr::Slice { len, elem } => {
            out.push('[');
            if let Some(len) = len {
                out.push_str(len);
            }
            out.push(']');
            write_type(elem, out)?;
        }
        TypeExpr::Map { key, value } => {
            out.push_str("map[");
            write_type(key, out)?;
            out.push(']');
            write_type(value, out)?;
        }
        TypeExpr::Any => out.push_str(ANY_TYPE),
        TypeExpr::Channel(value) => {
            out.push_str(CHANNEL_PREFIX);
            write_type(value, out)?;
        }
        TypeExpr::Variadic(elem) => {
            out.push_str("...");
            write_type(elem, out)?;
        }
        TypeExpr::Unsupported { shape, text } => return Err(Unsupported { shape, text }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{GoParser, Parser};

    /// Parse `ty` as the type of a single struct field
    fn parse_field_type(ty: &str) -> TypeExpr {
        let source = format!("package p\n\ntype T struct {{\n\tf {}\n}}\n", ty);
        let unit = GoParser::new().parse(&source).unwrap();
        unit.groups[0].specs[0].fields().unwrap()[0].ty.clone()
    }

    #[test]
    fn test_simple_shapes() {
        assert_eq!(resolve(&TypeExpr::ident("string")).unwrap(), "string");
        assert_eq!(resolve(&TypeExpr::pointer(TypeExpr::ident("User"))).unwrap(), "*User");
        assert_eq!(resolve(&TypeExpr::qualified("uuid", "UUID")).unwrap(), "uuid.UUID");
        assert_eq!(resolve(&TypeExpr::slice(TypeExpr::ident("User"))).unwrap(), "[]User");
        assert_eq!(resolve(&TypeExpr::Any).unwrap(), "interface{}");
    }

    #[test]
    fn test_nested_shapes() {
        let ty = TypeExpr::map(
            TypeExpr::ident("string"),
            TypeExpr::slice(TypeExpr::pointer(TypeExpr::qualified("time", "Time"))),
        );
        assert_eq!(resolve(&ty).unwrap(), "map[string][]*time.Time");
    }

    #[test]
    fn test_array_keeps_length() {
        let ty = TypeExpr::Slice {
            len: Some("16".to_string()),
            elem: Box::new(TypeExpr::ident("byte")),
        };
        assert_eq!(resolve(&ty).unwrap(), "[16]byte");
    }

    #[test]
    fn test_channel_prefix_verbatim() {
        let ty = TypeExpr::Channel(Box::new(TypeExpr::ident("int")));
        assert_eq!(resolve(&ty).unwrap(), "chann int");
        assert_eq!(resolve(&parse_field_type("<-chan string")).unwrap(), "chann string");
    }

    #[test]
    fn test_variadic() {
        let ty = TypeExpr::Variadic(Box::new(TypeExpr::qualified("ast", "Node")));
        assert_eq!(resolve(&ty).unwrap(), "...ast.Node");
    }

    #[test]
    fn test_interface_literal_with_members_unsupported() {
        let ty = parse_field_type("interface{ String() string }");
        let err = resolve(&ty).unwrap_err();
        assert_eq!(err.shape, "interface type");
        assert_eq!(err.text, "interface{ String() string }");

        let ty = parse_field_type("interface{ ~int | ~string }");
        let err = resolve(&ty).unwrap_err();
        assert_eq!(err.shape, "interface type");
    }

    #[test]
    fn test_empty_interface_is_any() {
        assert_eq!(parse_field_type("interface{}"), TypeExpr::Any);
        assert_eq!(parse_field_type("interface{ /* nothing */ }"), TypeExpr::Any);
    }

    #[test]
    fn test_unsupported_reports_shape() {
        let ty = parse_field_type("func(int) error");
        let err = resolve(&ty).unwrap_err();
        assert_eq!(err.shape, "function type");
        assert_eq!(err.text, "func(int) error");
    }

    #[test]
    fn test_unsupported_nested_inside_supported() {
        let ty = parse_field_type("map[string]struct{ x int }");
        assert_eq!(resolve(&ty).unwrap_err().shape, "struct type");
    }

    #[test]
    fn test_round_trip_through_parser() {
        let cases = [
            "int",
            "*User",
            "uuid.UUID",
            "[]User",
            "[4]byte",
            "**pkg.Thing",
            "map[string]int",
            "map[uuid.UUID][]*time.Time",
            "[][]map[string]interface{}",
            "interface{}",
            "any",
        ];
        for case in cases {
            let original = parse_field_type(case);
            let text = resolve(&original).unwrap();
            assert_eq!(text, case);
            assert_eq!(parse_field_type(&text), original, "round trip of {case}");
        }
    }
}
