//! Canonical type name composition.
//!
//! Pure and deterministic: the same syntactic type node always renders to
//! the same canonical string. The canonical name is the flat resolution key
//! used everywhere downstream, so the rules here are deliberately simple:
//! primitives map to the builtin Ecore datatype names, qualified names join
//! with dots, type arguments render in angle brackets, array suffixes are
//! preserved verbatim.

use crate::parser::{PrimitiveType, TypeArg, TypeRef, TypeRefKind, WildcardBound};

/// Canonical name of the absent type.
pub const SENTINEL_NAME: &str = "EObject";

/// Ecore datatype name for a Java primitive keyword.
pub fn primitive_name(primitive: PrimitiveType) -> &'static str {
    match primitive {
        PrimitiveType::Int => "EInt",
        PrimitiveType::Boolean => "EBoolean",
        PrimitiveType::Byte => "EByte",
        PrimitiveType::Short => "EShort",
        PrimitiveType::Long => "ELong",
        PrimitiveType::Float => "EFloat",
        PrimitiveType::Double => "EDouble",
        PrimitiveType::Char => "EChar",
    }
}

/// Render a syntactic type reference to its canonical name.
///
/// `None` stands for an absent type node and renders as the sentinel name.
pub fn type_name(ty: Option<&TypeRef>) -> String {
    let Some(ty) = ty else {
        return SENTINEL_NAME.to_string();
    };

    let mut name = match &ty.kind {
        TypeRefKind::Primitive(primitive) => primitive_name(*primitive).to_string(),
        TypeRefKind::Named { path, args } => {
            let mut base = if path.len() == 1 && path[0] == "String" {
                // `String` maps into the primitive table like the keywords do.
                "EString".to_string()
            } else {
                path.iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(".")
            };
            if !args.is_empty() {
                base.push('<');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        base.push_str(", ");
                    }
                    base.push_str(&type_arg_name(arg));
                }
                base.push('>');
            }
            base
        }
    };

    for _ in 0..ty.dims {
        name.push_str("[]");
    }
    name
}

fn type_arg_name(arg: &TypeArg) -> String {
    match arg {
        TypeArg::Type(ty) => type_name(Some(ty)),
        TypeArg::Wildcard(None) => "?".to_string(),
        TypeArg::Wildcard(Some((bound, ty))) => {
            let keyword = match bound {
                WildcardBound::Extends => "extends",
                WildcardBound::Super => "super",
            };
            format!("? {keyword} {}", type_name(Some(ty)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_java, TypeDecl};
    use rstest::rstest;

    fn field_type(source: &str) -> TypeRef {
        let unit = parse_java(&format!("class T {{ {source} f; }}")).expect("parse");
        match unit.types.into_iter().next() {
            Some(TypeDecl::Class(c)) => c.fields.into_iter().next().expect("field").ty,
            other => panic!("expected class, got {other:?}"),
        }
    }

    #[rstest]
    #[case("int", "EInt")]
    #[case("boolean", "EBoolean")]
    #[case("double", "EDouble")]
    #[case("String", "EString")]
    #[case("int[]", "EInt[]")]
    #[case("String[][]", "EString[][]")]
    #[case("Order", "Order")]
    #[case("com.example.Order", "com.example.Order")]
    #[case("List<Order>", "List<Order>")]
    #[case("Map<String, Order>", "Map<EString, Order>")]
    #[case("List<?>", "List<?>")]
    #[case("List<? extends Number>", "List<? extends Number>")]
    #[case("List<? super Order>", "List<? super Order>")]
    #[case("Map<String, List<Order>>", "Map<EString, List<Order>>")]
    fn canonical_names(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(type_name(Some(&field_type(source))), expected);
    }

    #[test]
    fn absent_type_is_the_sentinel() {
        assert_eq!(type_name(None), "EObject");
    }

    #[test]
    fn rendering_is_idempotent() {
        let ty = field_type("Map<String, List<Order[]>>");
        assert_eq!(type_name(Some(&ty)), type_name(Some(&ty)));
    }
}
