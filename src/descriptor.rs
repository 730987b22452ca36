//! Type descriptors as handed over by the introspection side.
//!
//! Everything here is plain data: the synthesis engine only reads it. The
//! serde layout is the on-disk descriptor format (`{"kind": "..."}` tagged).
use ordered_float::OrderedFloat;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Number,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Boolean(bool),
    Number(OrderedFloat<f64>),
    String(String),
}

/// One node of the host type graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeDescriptor {
    Primitive { of: Primitive },
    Literal { value: LiteralValue },
    Null,
    Undefined,
    Union { members: Vec<TypeDescriptor> },
    Array { element: Box<TypeDescriptor> },
    Object(ObjectDescriptor),
    /// Anything the introspection side could not resolve.
    Named { name: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeDescriptor,
    #[serde(default)]
    pub optional: bool,
}

/// Table-like data source.
///
/// Shapes are optional at the type level only so that a malformed document
/// decodes; `catalog` rejects a missing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_field: Option<String>,
    #[serde(default)]
    pub read: Option<ObjectDescriptor>,
    #[serde(default)]
    pub create: Option<ObjectDescriptor>,
    #[serde(default)]
    pub mutate: Option<ObjectDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Parameters {
    /// The callable takes no arguments at all.
    None,
    Object(ObjectDescriptor),
}

/// Decodes `{"kind": "void"}` as [`Returns::Nothing`]; anything else must
/// be a [`TypeDescriptor`], and its decode error is reported as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "ReturnsRepr")]
pub enum Returns {
    /// The callable produces no value.
    Nothing,
    Value(TypeDescriptor),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureDescriptor {
    pub name: String,
    #[serde(default)]
    pub params: Option<Parameters>,
    #[serde(default)]
    pub returns: Option<Returns>,
}

/// Closed, ordered set of string values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDescriptor {
    pub name: String,
    pub values: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

/// Coarse kind used by the self-reference classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CoarseKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl TypeDescriptor {
    pub fn string() -> Self { Self::Primitive { of: Primitive::String } }
    pub fn number() -> Self { Self::Primitive { of: Primitive::Number } }
    pub fn boolean() -> Self { Self::Primitive { of: Primitive::Boolean } }
    pub fn literal(value: impl Into<LiteralValue>) -> Self { Self::Literal { value: value.into() } }
    pub fn union(members: impl IntoIterator<Item = TypeDescriptor>) -> Self {
        Self::Union { members: members.into_iter().collect() }
    }
    pub fn array(element: TypeDescriptor) -> Self { Self::Array { element: Box::new(element) } }
    pub fn object(properties: impl IntoIterator<Item = Property>) -> Self {
        Self::Object(ObjectDescriptor { properties: properties.into_iter().collect() })
    }
    pub fn named(name: impl Into<String>) -> Self { Self::Named { name: name.into() } }

    /// `null` or `undefined`.
    pub fn is_absence(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    pub fn as_string_literal(&self) -> Option<&str> {
        match self {
            Self::Literal { value: LiteralValue::String(s) } => Some(s),
            _ => None,
        }
    }

    /// `None` for absence members and for members with no single coarse kind
    /// (named types, nested unions).
    pub fn coarse_kind(&self) -> Option<CoarseKind> {
        match self {
            Self::Primitive { of: Primitive::String } => Some(CoarseKind::String),
            Self::Primitive { of: Primitive::Number } => Some(CoarseKind::Number),
            Self::Primitive { of: Primitive::Boolean } => Some(CoarseKind::Boolean),
            Self::Literal { value } => Some(value.coarse_kind()),
            Self::Array { .. } => Some(CoarseKind::Array),
            Self::Object(_) => Some(CoarseKind::Object),
            Self::Null | Self::Undefined | Self::Union { .. } | Self::Named { .. } => None,
        }
    }

    /// Primitive a scalar (primitive or literal) member widens to.
    pub fn scalar_primitive(&self) -> Option<Primitive> {
        match self {
            Self::Primitive { of } => Some(*of),
            Self::Literal { value } => Some(value.primitive()),
            Self::Null
            | Self::Undefined
            | Self::Union { .. }
            | Self::Array { .. }
            | Self::Object(_)
            | Self::Named { .. } => None,
        }
    }
}

impl LiteralValue {
    /// The primitive a literal widens to.
    pub fn primitive(&self) -> Primitive {
        match self {
            Self::Boolean(_) => Primitive::Boolean,
            Self::Number(_) => Primitive::Number,
            Self::String(_) => Primitive::String,
        }
    }

    pub fn coarse_kind(&self) -> CoarseKind {
        match self {
            Self::Boolean(_) => CoarseKind::Boolean,
            Self::Number(_) => CoarseKind::Number,
            Self::String(_) => CoarseKind::String,
        }
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self { Self::String(s.to_string()) }
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self { Self::String(s) }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self { Self::Number(OrderedFloat(n)) }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self { Self::Boolean(b) }
}

impl ObjectDescriptor {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

impl Property {
    pub fn required(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self { name: name.into(), ty, optional: false }
    }
    pub fn optional(name: impl Into<String>, ty: TypeDescriptor) -> Self {
        Self { name: name.into(), ty, optional: true }
    }
}

impl EnumDescriptor {
    /// The enumeration as the string-literal union it stands for.
    pub fn as_union(&self) -> TypeDescriptor {
        TypeDescriptor::union(self.values.iter().map(|v| TypeDescriptor::literal(v.as_str())))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

const VOID_KIND: &str = "void";

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum VoidMarker {
    Void,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ReturnsRepr {
    Nothing(VoidMarker),
    Value(TypeDescriptor),
}

impl<'de> Deserialize<'de> for Returns {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.get("kind").and_then(serde_json::Value::as_str) == Some(VOID_KIND) {
            return Ok(Returns::Nothing);
        }
        // keep the inner path; the outer one is tracked by the caller
        serde_path_to_error::deserialize::<_, TypeDescriptor>(value)
            .map(Returns::Value)
            .map_err(|err| match err.path().to_string().as_str() {
                "." => D::Error::custom(err.into_inner()),
                path => D::Error::custom(format_args!("{path}: {}", err.into_inner())),
            })
    }
}

impl From<Returns> for ReturnsRepr {
    fn from(returns: Returns) -> Self {
        match returns {
            Returns::Nothing => ReturnsRepr::Nothing(VoidMarker::Void),
            Returns::Value(ty) => ReturnsRepr::Value(ty),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
