//! Type → schema synthesis.
//!
//! A depth-counted recursive fold over [`TypeDescriptor`]. There is no
//! visited set: the descriptor graph carries no node identity, so termination
//! comes from the hard `max_depth` ceiling, and the canonical "arbitrary JSON
//! value" union is short-circuited by [`guard`] long before the ceiling.
//!
//! Layout:
//! - [`guard`]: structural self-reference classifier.
//! - [`unions`]: per-union strategy (enum / nullable wrapper / dynamic / composed).
//! - [`obj`]: record builder and the three entity shapes.
//! - [`sig`]: parameter and return schemas for callables.
pub mod guard;
pub mod unions;
pub mod obj;
pub mod sig;

use crate::config::{SynthConfig, UnionPolicy, MAX_DEPTH};
use crate::descriptor::{Primitive, TypeDescriptor};
use crate::ir::{Schema, SchemaExpr};

pub use guard::is_self_referential_dynamic;
pub use obj::{build_object, EntitySchemas};
pub use sig::SignatureSchemas;

// ------------------------------- Emitter ---------------------------------- //

/// Fixed policy for one schema category. Cheap to copy; holds no state, so a
/// single emitter can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Emitter {
    pub max_depth: usize,
    pub unions: UnionPolicy,
}

impl Default for Emitter {
    fn default() -> Self {
        Self { max_depth: MAX_DEPTH, unions: UnionPolicy::Dynamic }
    }
}

impl Emitter {
    pub fn new(max_depth: usize, unions: UnionPolicy) -> Self {
        Self { max_depth, unions }
    }

    /// Emitter for entity fields (read / create / mutate shapes).
    pub fn for_entities(config: &SynthConfig) -> Self {
        Self::new(config.max_depth, config.entity_unions)
    }

    /// Emitter for callable parameters and returns.
    pub fn for_signatures(config: &SynthConfig) -> Self {
        Self::new(config.max_depth, config.signature_unions)
    }

    /// Emit the schema for `ty`.
    ///
    /// `is_optional` and `force_nullable` land on the outermost expression
    /// only; array elements and object properties start clean.
    pub fn emit(
        &self,
        ty: &TypeDescriptor,
        is_optional: bool,
        depth: usize,
        force_nullable: bool,
    ) -> SchemaExpr {
        if depth > self.max_depth {
            tracing::trace!(depth, max_depth = self.max_depth, "depth ceiling reached");
            return SchemaExpr::dynamic().with_modifiers(force_nullable, is_optional);
        }
        let core = match ty {
            TypeDescriptor::Union { members } => {
                return unions::decompose(self, members, is_optional, depth, force_nullable);
            }
            TypeDescriptor::Null => SchemaExpr::new(Schema::Null),
            TypeDescriptor::Undefined => SchemaExpr::new(Schema::Undefined),
            TypeDescriptor::Primitive { of } => SchemaExpr::new(primitive_schema(*of)),
            TypeDescriptor::Literal { value } => SchemaExpr::new(primitive_schema(value.primitive())),
            TypeDescriptor::Array { element } => {
                let item = self.emit(element, false, depth + 1, false);
                SchemaExpr::new(Schema::Array(Box::new(item)))
            }
            TypeDescriptor::Object(obj) if !obj.properties.is_empty() => {
                SchemaExpr::new(build_object(self, obj, &[], depth))
            }
            // index signatures, `{}`, unresolved names
            TypeDescriptor::Object(_) | TypeDescriptor::Named { .. } => SchemaExpr::dynamic(),
        };
        core.with_modifiers(force_nullable, is_optional)
    }

    /// Top-level entry point: depth 0, no modifiers.
    pub fn emit_root(&self, ty: &TypeDescriptor) -> SchemaExpr {
        self.emit(ty, false, 0, false)
    }
}

fn primitive_schema(of: Primitive) -> Schema {
    match of {
        Primitive::String => Schema::String,
        Primitive::Number => Schema::Number,
        Primitive::Boolean => Schema::Boolean,
    }
}

// ------------------------------- Tests ------------------------------------ //
