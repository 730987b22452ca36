// Strongly-typed schema IR. Rendering lives in `codegen`, checking in `validate`.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    Any,                     // dynamic fallback: accepts anything
    Null,                    // exactly null
    Undefined,               // exactly absent
    String,
    Number,
    Boolean,
    Enum(Vec<String>),       // declaration order, never sorted
    Array(Box<SchemaExpr>),
    Object(Vec<Field>),      // declaration order
    EmptyRecord,             // `{}` and nothing else
    Union(Vec<SchemaExpr>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub schema: SchemaExpr,
}

/// A schema plus its two modifiers. Rendered nullable-then-optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaExpr {
    pub schema: Schema,
    pub nullable: bool,
    pub optional: bool,
}

impl SchemaExpr {
    pub fn new(schema: Schema) -> Self {
        Self { schema, nullable: false, optional: false }
    }
    pub fn dynamic() -> Self { Self::new(Schema::Any) }

    pub fn nullable(mut self) -> Self { self.nullable = true; self }
    pub fn optional(mut self) -> Self { self.optional = true; self }

    /// OR the modifiers in; applying one twice is a no-op.
    pub fn with_modifiers(mut self, nullable: bool, optional: bool) -> Self {
        self.nullable |= nullable;
        self.optional |= optional;
        self
    }

    /// Strip `optional`, e.g. for a promoted identifier.
    pub fn required(mut self) -> Self { self.optional = false; self }

    pub fn is_dynamic(&self) -> bool { matches!(self.schema, Schema::Any) }

    pub fn fields(&self) -> &[Field] {
        match &self.schema {
            Schema::Object(fields) => fields,
            _ => &[],
        }
    }

    pub fn field(&self, name: &str) -> Option<&SchemaExpr> {
        self.fields().iter().find(|f| f.name == name).map(|f| &f.schema)
    }
}

impl Field {
    pub fn new(name: impl Into<String>, schema: SchemaExpr) -> Self {
        Self { name: name.into(), schema }
    }
}
