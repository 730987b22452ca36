use crate::descriptor::{EntityDescriptor, ObjectDescriptor};
use crate::error::{EntityShape, SynthError};
use crate::ir::{Field, Schema, SchemaExpr};

use super::Emitter;

/// Bind each non-excluded property, in declaration order, to its schema.
/// Properties are emitted one level below `depth` with their own optionality.
pub fn build_object(em: &Emitter, obj: &ObjectDescriptor, exclude: &[&str], depth: usize) -> Schema {
    Schema::Object(object_fields(em, obj, exclude, depth))
}

fn object_fields(em: &Emitter, obj: &ObjectDescriptor, exclude: &[&str], depth: usize) -> Vec<Field> {
    obj.properties
        .iter()
        .filter(|p| !exclude.contains(&p.name.as_str()))
        .map(|p| Field::new(p.name.clone(), em.emit(&p.ty, p.optional, depth + 1, false)))
        .collect()
}

/// The three shapes of one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchemas {
    pub read: SchemaExpr,
    pub create: SchemaExpr,
    pub mutate: SchemaExpr,
}

impl EntitySchemas {
    /// Build read / create / mutate for `entity`, promoting `id_field` to a
    /// mandatory trailing field of the mutate shape.
    pub fn build(em: &Emitter, entity: &EntityDescriptor, id_field: &str) -> Result<Self, SynthError> {
        let read_shape = require(entity, EntityShape::Read, entity.read.as_ref())?;
        let create_shape = require(entity, EntityShape::Create, entity.create.as_ref())?;
        let mutate_shape = require(entity, EntityShape::Mutate, entity.mutate.as_ref())?;

        let id = read_shape
            .property(id_field)
            .or_else(|| mutate_shape.property(id_field))
            .ok_or_else(|| SynthError::MissingIdentifier {
                entity: entity.name.clone(),
                field: id_field.to_string(),
            })?;

        let read = SchemaExpr::new(build_object(em, read_shape, &[], 0));
        let create = SchemaExpr::new(build_object(em, create_shape, &[], 0));

        let mut fields = object_fields(em, mutate_shape, &[id_field], 0);
        fields.push(Field::new(id_field, em.emit(&id.ty, false, 1, false).required()));
        let mutate = SchemaExpr::new(Schema::Object(fields));

        Ok(Self { read, create, mutate })
    }
}

fn require<'a>(
    entity: &EntityDescriptor,
    shape: EntityShape,
    obj: Option<&'a ObjectDescriptor>,
) -> Result<&'a ObjectDescriptor, SynthError> {
    obj.ok_or_else(|| SynthError::MissingEntityShape { entity: entity.name.clone(), shape })
}
