//! Zod-flavoured source emission for [`SchemaExpr`].
//!
//! Output is single-line and deterministic; layout is left to whatever
//! formatter runs over the generated file.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::{Schema, SchemaExpr};

static BARE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("static identifier pattern")
});

// ————————————————————————————————————————————————————————————————————————————
// EXPRESSIONS
// ————————————————————————————————————————————————————————————————————————————

pub fn render(expr: &SchemaExpr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

fn write_expr(out: &mut String, expr: &SchemaExpr) {
    write_schema(out, &expr.schema);
    if expr.nullable {
        out.push_str(".nullable()");
    }
    if expr.optional {
        out.push_str(".optional()");
    }
}

fn write_schema(out: &mut String, schema: &Schema) {
    match schema {
        Schema::Any => out.push_str("z.any()"),
        Schema::Null => out.push_str("z.null()"),
        Schema::Undefined => out.push_str("z.undefined()"),
        Schema::String => out.push_str("z.string()"),
        Schema::Number => out.push_str("z.number()"),
        Schema::Boolean => out.push_str("z.boolean()"),
        Schema::Enum(values) => {
            out.push_str("z.enum([");
            for (i, v) in values.iter().enumerate() {
                if i > 0 { out.push_str(", "); }
                out.push_str(&quote(v));
            }
            out.push_str("])");
        }
        Schema::Array(item) => {
            out.push_str("z.array(");
            write_expr(out, item);
            out.push(')');
        }
        Schema::Object(fields) if fields.is_empty() => out.push_str("z.object({})"),
        Schema::Object(fields) => {
            out.push_str("z.object({ ");
            for (i, f) in fields.iter().enumerate() {
                if i > 0 { out.push_str(", "); }
                out.push_str(&object_key(&f.name));
                out.push_str(": ");
                write_expr(out, &f.schema);
            }
            out.push_str(" })");
        }
        Schema::EmptyRecord => out.push_str("z.object({}).strict()"),
        Schema::Union(arms) => {
            out.push_str("z.union([");
            for (i, arm) in arms.iter().enumerate() {
                if i > 0 { out.push_str(", "); }
                write_expr(out, arm);
            }
            out.push_str("])");
        }
    }
}

/// Usable unquoted as a TS binding or object key.
pub fn is_identifier(name: &str) -> bool {
    BARE_KEY.is_match(name)
}

fn object_key(name: &str) -> String {
    if is_identifier(name) { name.to_string() } else { quote(name) }
}

/// JSON string quoting doubles as a valid TS string literal.
fn quote(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}

// ————————————————————————————————————————————————————————————————————————————
// MODULES
// ————————————————————————————————————————————————————————————————————————————

/// Accumulates `export const` bindings into one TS module.
pub struct Codegen {
    out: String,
}

impl Default for Codegen {
    fn default() -> Self { Self::new() }
}

impl Codegen {
    pub fn new() -> Self {
        Self { out: String::from("import { z } from \"zod\";\n") }
    }

    pub fn emit(&mut self, expr: &SchemaExpr, name: &str) {
        self.out.push_str("\nexport const ");
        self.out.push_str(name);
        self.out.push_str(" = ");
        write_expr(&mut self.out, expr);
        self.out.push_str(";\n");
    }

    pub fn into_string(self) -> String { self.out }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Field;

    #[test]
    fn awkward_keys_are_quoted() {
        let expr = SchemaExpr::new(Schema::Object(vec![
            Field::new("plain_key", SchemaExpr::new(Schema::String)),
            Field::new("kebab-key", SchemaExpr::new(Schema::Number)),
            Field::new("2fa", SchemaExpr::new(Schema::Boolean)),
        ]));
        assert_eq!(
            render(&expr),
            r#"z.object({ plain_key: z.string(), "kebab-key": z.number(), "2fa": z.boolean() })"#
        );
    }

    #[test]
    fn enum_values_are_escaped() {
        let expr = SchemaExpr::new(Schema::Enum(vec!["say \"hi\"".into(), "a\\b".into()]));
        assert_eq!(render(&expr), r#"z.enum(["say \"hi\"", "a\\b"])"#);
    }

    #[test]
    fn modifiers_render_nullable_before_optional() {
        let a = SchemaExpr::new(Schema::String).optional().nullable();
        let b = SchemaExpr::new(Schema::String).nullable().optional().nullable();
        assert_eq!(render(&a), "z.string().nullable().optional()");
        assert_eq!(render(&a), render(&b));
    }

    #[test]
    fn module_lists_bindings_in_order() {
        let mut cg = Codegen::new();
        cg.emit(&SchemaExpr::new(Schema::String), "Name");
        cg.emit(&SchemaExpr::dynamic().nullable(), "Payload");
        assert_eq!(
            cg.into_string(),
            "import { z } from \"zod\";\n\nexport const Name = z.string();\n\nexport const Payload = z.any().nullable();\n"
        );
    }
}
