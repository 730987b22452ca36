use crate::config::UnionPolicy;
use crate::descriptor::{Primitive, TypeDescriptor};
use crate::ir::{Schema, SchemaExpr};

use super::{guard, primitive_schema, Emitter};

/// Members split by role; order of `substantive` is declaration order.
struct Parts<'a> {
    has_null: bool,
    has_undefined: bool,
    substantive: Vec<&'a TypeDescriptor>,
}

fn partition(members: &[TypeDescriptor]) -> Parts<'_> {
    let mut parts = Parts { has_null: false, has_undefined: false, substantive: Vec::new() };
    for m in members {
        match m {
            TypeDescriptor::Null => parts.has_null = true,
            TypeDescriptor::Undefined => parts.has_undefined = true,
            other => parts.substantive.push(other),
        }
    }
    parts
}

/// Choose and emit a schema for one union. Total: every member list,
/// including an empty one, produces an expression.
pub fn decompose(
    em: &Emitter,
    members: &[TypeDescriptor],
    is_optional: bool,
    depth: usize,
    force_nullable: bool,
) -> SchemaExpr {
    let parts = partition(members);
    let nullable = parts.has_null || force_nullable;
    let optional = parts.has_undefined || is_optional;

    if guard::is_self_referential_dynamic(members) {
        tracing::trace!(depth, members = members.len(), "self-referential union; emitting dynamic");
        return SchemaExpr::dynamic().with_modifiers(nullable, optional);
    }

    let core = match parts.substantive.as_slice() {
        // `null`, `undefined`, or both
        [] if parts.has_null => SchemaExpr::new(Schema::Null),
        [] => SchemaExpr::new(Schema::Undefined),
        subs if subs.iter().all(|m| m.as_string_literal().is_some()) => {
            SchemaExpr::new(Schema::Enum(enum_values(subs)))
        }
        [only] => em.emit(only, false, depth + 1, false),
        subs => match (uniform_primitive(subs), em.unions) {
            (Some(of), _) => SchemaExpr::new(primitive_schema(of)),
            (None, UnionPolicy::Dynamic) => SchemaExpr::dynamic(),
            (None, UnionPolicy::Composed) => SchemaExpr::new(Schema::Union(
                subs.iter().map(|m| em.emit(m, false, depth + 1, false)).collect(),
            )),
        },
    };
    core.with_modifiers(nullable, optional)
}

/// `true | false`, `1 | 2`: scalars that all widen to one primitive.
fn uniform_primitive(members: &[&TypeDescriptor]) -> Option<Primitive> {
    let (first, rest) = members.split_first()?;
    let of = first.scalar_primitive()?;
    rest.iter().all(|m| m.scalar_primitive() == Some(of)).then_some(of)
}

/// Literal values in declaration order, first occurrence wins.
fn enum_values(members: &[&TypeDescriptor]) -> Vec<String> {
    let mut values: Vec<String> = Vec::with_capacity(members.len());
    for value in members.iter().filter_map(|m| m.as_string_literal()) {
        if !values.iter().any(|v| v == value) {
            values.push(value.to_string());
        }
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::render;
    use crate::config::MAX_DEPTH;
    use serde_json::{json, Value};

    fn composed() -> Emitter { Emitter::new(MAX_DEPTH, UnionPolicy::Composed) }
    fn dynamic() -> Emitter { Emitter::new(MAX_DEPTH, UnionPolicy::Dynamic) }

    fn status() -> TypeDescriptor {
        TypeDescriptor::union([
            TypeDescriptor::literal("pending"),
            TypeDescriptor::literal("active"),
            TypeDescriptor::literal("done"),
        ])
    }

    #[test]
    fn string_literals_become_an_enum_in_declaration_order() {
        let out = dynamic().emit_root(&status());
        assert_eq!(render(&out), r#"z.enum(["pending", "active", "done"])"#);
        for ok in ["done", "pending", "active"] {
            assert!(out.accepts(Some(&json!(ok))), "{ok}");
        }
        for bad in [json!("Done"), json!("PENDING"), json!("archived"), json!(1), Value::Null] {
            assert!(!out.accepts(Some(&bad)), "{bad}");
        }
        assert!(!out.accepts(None));
    }

    #[test]
    fn duplicate_literals_collapse_keeping_first_position() {
        let ty = TypeDescriptor::union([
            TypeDescriptor::literal("b"),
            TypeDescriptor::literal("a"),
            TypeDescriptor::literal("b"),
        ]);
        assert_eq!(render(&dynamic().emit_root(&ty)), r#"z.enum(["b", "a"])"#);
    }

    #[test]
    fn nullable_wrapper_matches_the_bare_type_on_non_null_input() {
        let bare = dynamic().emit_root(&TypeDescriptor::string());
        let wrapped = dynamic().emit_root(&TypeDescriptor::union([TypeDescriptor::string(), TypeDescriptor::Null]));
        assert!(wrapped.nullable);
        assert!(!wrapped.optional);
        assert_eq!(render(&wrapped), "z.string().nullable()");
        for v in [json!("x"), json!(""), json!(3), json!(true), json!([]), json!({})] {
            assert_eq!(bare.accepts(Some(&v)), wrapped.accepts(Some(&v)), "{v}");
        }
        assert!(wrapped.accepts(Some(&Value::Null)));
        assert!(!bare.accepts(Some(&Value::Null)));
    }

    #[test]
    fn undefined_member_makes_the_union_optional() {
        let ty = TypeDescriptor::union([TypeDescriptor::Undefined, TypeDescriptor::number(), TypeDescriptor::Null]);
        assert_eq!(render(&dynamic().emit_root(&ty)), "z.number().nullable().optional()");
    }

    #[test]
    fn enum_keeps_modifiers() {
        let ty = TypeDescriptor::union([
            TypeDescriptor::literal("on"),
            TypeDescriptor::Null,
            TypeDescriptor::literal("off"),
        ]);
        assert_eq!(render(&dynamic().emit(&ty, true, 0, false)), r#"z.enum(["on", "off"]).nullable().optional()"#);
    }

    #[test]
    fn heterogeneous_members_follow_the_category_policy() {
        let ty = TypeDescriptor::union([
            TypeDescriptor::number(),
            TypeDescriptor::array(TypeDescriptor::string()),
            TypeDescriptor::Null,
        ]);
        assert_eq!(render(&dynamic().emit_root(&ty)), "z.any().nullable()");
        assert_eq!(
            render(&composed().emit_root(&ty)),
            "z.union([z.number(), z.array(z.string())]).nullable()"
        );
    }

    #[test]
    fn same_kind_literals_widen_under_either_policy() {
        let flag = TypeDescriptor::union([
            TypeDescriptor::literal(true),
            TypeDescriptor::literal(false),
            TypeDescriptor::Null,
        ]);
        let level = TypeDescriptor::union([TypeDescriptor::literal(1.0), TypeDescriptor::literal(2.0)]);
        for em in [dynamic(), composed()] {
            let out = em.emit_root(&flag);
            assert_eq!(render(&out), "z.boolean().nullable()");
            assert!(out.accepts(Some(&json!(true))));
            assert!(out.accepts(Some(&Value::Null)));
            assert!(!out.accepts(Some(&json!("x"))));
            assert_eq!(render(&em.emit_root(&level)), "z.number()");
        }
    }

    #[test]
    fn primitive_absorbs_literals_of_its_kind() {
        let ty = TypeDescriptor::union([TypeDescriptor::string(), TypeDescriptor::literal("auto")]);
        assert_eq!(render(&dynamic().emit_root(&ty)), "z.string()");
    }

    #[test]
    fn mixed_literal_kinds_are_not_an_enum() {
        let ty = TypeDescriptor::union([TypeDescriptor::literal("a"), TypeDescriptor::literal(1.0)]);
        assert_eq!(render(&composed().emit_root(&ty)), "z.union([z.string(), z.number()])");
    }

    #[test]
    fn absence_only_unions_still_yield_a_schema() {
        assert_eq!(render(&dynamic().emit_root(&TypeDescriptor::union([TypeDescriptor::Null]))), "z.null().nullable()");
        assert_eq!(
            render(&dynamic().emit_root(&TypeDescriptor::union([TypeDescriptor::Undefined]))),
            "z.undefined().optional()"
        );
        assert_eq!(render(&dynamic().emit_root(&TypeDescriptor::union([]))), "z.undefined()");
    }

    #[test]
    fn force_nullable_reaches_union_results() {
        let out = composed().emit(&status(), false, 0, true);
        assert!(out.nullable);
        assert!(out.accepts(Some(&Value::Null)));
    }
}
