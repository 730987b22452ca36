//! Runtime checking of JSON values against a [`SchemaExpr`].
//!
//! Mirrors the semantics of the emitted source: absent (`None`) is the
//! `undefined` of the generated code, objects tolerate unknown keys except the
//! strict empty record, and `z.any()` takes everything including absence.
use std::fmt;
use serde_json::Value;

use crate::codegen::render;
use crate::ir::{Schema, SchemaExpr};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON pointer to the offending value (`""` is the root).
    pub path: String,
    pub expected: String,
    pub found: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "at {path}: expected {}, found {}", self.expected, self.found)
    }
}

impl SchemaExpr {
    pub fn accepts(&self, value: Option<&Value>) -> bool {
        self.validate(value).is_ok()
    }

    /// Every violation found, or `Ok` if the value conforms.
    pub fn validate(&self, value: Option<&Value>) -> Result<(), Vec<Violation>> {
        let mut out = Vec::new();
        check(self, value, &mut String::new(), &mut out);
        if out.is_empty() { Ok(()) } else { Err(out) }
    }
}

fn check(expr: &SchemaExpr, value: Option<&Value>, path: &mut String, out: &mut Vec<Violation>) {
    match (&expr.schema, value) {
        (Schema::Any, _) => {}
        (Schema::Undefined, None) => {}
        (_, None) if expr.optional => {}
        (_, Some(Value::Null)) if expr.nullable => {}
        (Schema::Null, Some(Value::Null)) => {}
        (Schema::String, Some(Value::String(_))) => {}
        (Schema::Number, Some(Value::Number(_))) => {}
        (Schema::Boolean, Some(Value::Bool(_))) => {}
        (Schema::Enum(values), Some(Value::String(s))) if values.contains(s) => {}
        (Schema::Array(item), Some(Value::Array(xs))) => {
            for (i, x) in xs.iter().enumerate() {
                with_segment(path, &i.to_string(), |path| check(item, Some(x), path, out));
            }
        }
        (Schema::Object(fields), Some(Value::Object(map))) => {
            for f in fields {
                with_segment(path, &f.name, |path| check(&f.schema, map.get(&f.name), path, out));
            }
        }
        (Schema::EmptyRecord, Some(Value::Object(map))) if map.is_empty() => {}
        (Schema::Union(arms), v) if arms.iter().any(|arm| arm.accepts(v)) => {}
        (_, v) => out.push(Violation {
            path: path.clone(),
            expected: render(expr),
            found: describe(v),
        }),
    }
}

fn with_segment(path: &mut String, segment: &str, f: impl FnOnce(&mut String)) {
    let len = path.len();
    path.push('/');
    // RFC 6901 escaping
    path.push_str(&segment.replace('~', "~0").replace('/', "~1"));
    f(path);
    path.truncate(len);
}

fn describe(value: Option<&Value>) -> String {
    match value {
        None => "nothing".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => format!("boolean {b}"),
        Some(Value::Number(n)) => format!("number {n}"),
        Some(Value::String(s)) => format!("string {}", Value::from(s.as_str())),
        Some(Value::Array(xs)) => format!("array of {}", xs.len()),
        Some(Value::Object(map)) => format!("object with {} keys", map.len()),
    }
}

// ------------------------------- Tests ------------------------------------ //
