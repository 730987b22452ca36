//! Whole-source synthesis: every entity, signature and enumeration of a
//! [`TypeSource`] turned into named schema expressions.
//!
//! Entities and signatures are independent of each other, so both passes fan
//! out over rayon; results are collected back in source order.
use indexmap::IndexMap;
use indexmap::map::Entry;
use rayon::prelude::*;

use crate::codegen::{is_identifier, render, Codegen};
use crate::config::SynthConfig;
use crate::descriptor::EntityDescriptor;
use crate::error::SynthError;
use crate::ir::SchemaExpr;
use crate::source::TypeSource;
use crate::synth::{EntitySchemas, Emitter, SignatureSchemas};

// ————————————————————————————————————————————————————————————————————————————
// NAMING
// ————————————————————————————————————————————————————————————————————————————

/// Output names for each produced schema, given the stable source key.
pub trait Naming {
    fn read(&self, entity: &str) -> String;
    fn create(&self, entity: &str) -> String;
    fn mutate(&self, entity: &str) -> String;
    fn args(&self, signature: &str) -> String;
    fn returns(&self, signature: &str) -> String;
    fn enumeration(&self, name: &str) -> String;
}

/// `<Name>`, `Add<Name>Request`, `Update<Name>Request`, `<Name>Args`,
/// `<Name>Returns`, `<Name>Schema`. Keys are used as given; a key that does
/// not yield an identifier fails with [`SynthError::InvalidName`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultNaming;

impl Naming for DefaultNaming {
    fn read(&self, entity: &str) -> String { entity.to_string() }
    fn create(&self, entity: &str) -> String { format!("Add{entity}Request") }
    fn mutate(&self, entity: &str) -> String { format!("Update{entity}Request") }
    fn args(&self, signature: &str) -> String { format!("{signature}Args") }
    fn returns(&self, signature: &str) -> String { format!("{signature}Returns") }
    fn enumeration(&self, name: &str) -> String { format!("{name}Schema") }
}

// ————————————————————————————————————————————————————————————————————————————
// CATALOG
// ————————————————————————————————————————————————————————————————————————————

/// Named schemas in emission order: entities, then signatures, then enums.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: IndexMap<String, SchemaExpr>,
}

impl Catalog {
    pub fn get(&self, name: &str) -> Option<&SchemaExpr> { self.entries.get(name) }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }
    pub fn names(&self) -> impl Iterator<Item = &str> { self.entries.keys().map(String::as_str) }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaExpr)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn insert(&mut self, name: String, expr: SchemaExpr) -> Result<(), SynthError> {
        if !is_identifier(&name) {
            return Err(SynthError::InvalidName(name));
        }
        match self.entries.entry(name) {
            Entry::Occupied(slot) => Err(SynthError::DuplicateName(slot.key().clone())),
            Entry::Vacant(slot) => {
                slot.insert(expr);
                Ok(())
            }
        }
    }

    /// The whole catalog as one TS module.
    pub fn render(&self) -> String {
        let mut cg = Codegen::new();
        for (name, expr) in &self.entries {
            cg.emit(expr, name);
        }
        cg.into_string()
    }

    /// `{ name: source }`, in catalog order.
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(name, expr)| (name.clone(), serde_json::Value::from(render(expr))))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }
}

pub fn synthesize(
    source: &impl TypeSource,
    naming: &impl Naming,
    config: &SynthConfig,
) -> Result<Catalog, SynthError> {
    let entity_em = Emitter::for_entities(config);
    let signature_em = Emitter::for_signatures(config);

    let entities = source
        .entities()
        .par_iter()
        .map(|entity| {
            tracing::debug!(entity = %entity.name, "synthesizing entity");
            EntitySchemas::build(&entity_em, entity, id_field(entity, config))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let signatures = source
        .signatures()
        .par_iter()
        .map(|sig| {
            tracing::debug!(signature = %sig.name, "synthesizing signature");
            SignatureSchemas::build(&signature_em, sig)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut catalog = Catalog::default();
    for (entity, schemas) in source.entities().iter().zip(entities) {
        catalog.insert(naming.read(&entity.name), schemas.read)?;
        catalog.insert(naming.create(&entity.name), schemas.create)?;
        catalog.insert(naming.mutate(&entity.name), schemas.mutate)?;
    }
    for (sig, schemas) in source.signatures().iter().zip(signatures) {
        catalog.insert(naming.args(&sig.name), schemas.args)?;
        catalog.insert(naming.returns(&sig.name), schemas.returns)?;
    }
    for e in source.enums() {
        catalog.insert(naming.enumeration(&e.name), entity_em.emit_root(&e.as_union()))?;
    }

    tracing::info!(
        entities = source.entities().len(),
        signatures = source.signatures().len(),
        enums = source.enums().len(),
        schemas = catalog.len(),
        "synthesized catalog"
    );
    Ok(catalog)
}

fn id_field<'a>(entity: &'a EntityDescriptor, config: &'a SynthConfig) -> &'a str {
    entity.id_field.as_deref().unwrap_or(&config.id_field)
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{
        EnumDescriptor, ObjectDescriptor, Parameters, Property, Returns, SignatureDescriptor, TypeDescriptor,
    };
    use crate::error::EntityShape;
    use crate::source::DescriptorDocument;
    use crate::synth::tests::json_value_type;
    use serde_json::json;

    fn shape(props: Vec<Property>) -> Option<ObjectDescriptor> {
        Some(ObjectDescriptor { properties: props })
    }

    fn document() -> DescriptorDocument {
        let status = || {
            TypeDescriptor::union([
                TypeDescriptor::literal("pending"),
                TypeDescriptor::literal("active"),
                TypeDescriptor::literal("done"),
            ])
        };
        DescriptorDocument {
            entities: vec![EntityDescriptor {
                name: "Task".into(),
                id_field: None,
                read: shape(vec![
                    Property::required("id", TypeDescriptor::number()),
                    Property::required("status", status()),
                    Property::required("meta", json_value_type(5)),
                ]),
                create: shape(vec![
                    Property::optional("id", TypeDescriptor::number()),
                    Property::optional("status", status()),
                    Property::optional("meta", json_value_type(5)),
                ]),
                mutate: shape(vec![
                    Property::optional("id", TypeDescriptor::number()),
                    Property::optional("status", status()),
                    Property::optional("meta", json_value_type(5)),
                ]),
            }],
            signatures: vec![
                SignatureDescriptor {
                    name: "Ping".into(),
                    params: Some(Parameters::None),
                    returns: Some(Returns::Nothing),
                },
                SignatureDescriptor {
                    name: "CountTasks".into(),
                    params: Some(Parameters::Object(ObjectDescriptor {
                        properties: vec![Property::optional("status", status())],
                    })),
                    returns: Some(Returns::Value(TypeDescriptor::number())),
                },
            ],
            enums: vec![EnumDescriptor {
                name: "TaskStatus".into(),
                values: vec!["pending".into(), "active".into(), "done".into()],
            }],
        }
    }

    #[test]
    fn names_follow_the_convention_in_order() {
        let catalog = synthesize(&document(), &DefaultNaming, &SynthConfig::default()).unwrap();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(
            names,
            [
                "Task",
                "AddTaskRequest",
                "UpdateTaskRequest",
                "PingArgs",
                "PingReturns",
                "CountTasksArgs",
                "CountTasksReturns",
                "TaskStatusSchema",
            ]
        );
    }

    #[test]
    fn rendered_module_is_stable_across_runs() {
        let a = synthesize(&document(), &DefaultNaming, &SynthConfig::default()).unwrap();
        let b = synthesize(&document(), &DefaultNaming, &SynthConfig::default()).unwrap();
        assert_eq!(a.render(), b.render());
        assert!(a.render().contains(
            r#"export const UpdateTaskRequest = z.object({ status: z.enum(["pending", "active", "done"]).optional(), meta: z.any().nullable().optional(), id: z.number() });"#
        ));
        assert!(a.render().contains("export const CountTasksReturns = z.number().nullable();"));
        assert!(a.render().contains(r#"export const TaskStatusSchema = z.enum(["pending", "active", "done"]);"#));
    }

    #[test]
    fn json_output_maps_names_to_source() {
        let catalog = synthesize(&document(), &DefaultNaming, &SynthConfig::default()).unwrap();
        let out = catalog.to_json();
        assert_eq!(out["PingArgs"], json!("z.object({}).strict()"));
        assert_eq!(out["PingReturns"], json!("z.undefined().nullable()"));
    }

    #[test]
    fn entity_level_id_override_wins() {
        let mut doc = document();
        for e in &mut doc.entities {
            e.id_field = Some("status".into());
        }
        let catalog = synthesize(&doc, &DefaultNaming, &SynthConfig::default()).unwrap();
        let update = catalog.get("UpdateTaskRequest").unwrap();
        let names: Vec<&str> = update.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "meta", "status"]);
    }

    #[test]
    fn missing_shape_fails_the_whole_run() {
        let mut doc = document();
        doc.entities[0].mutate = None;
        let err = synthesize(&doc, &DefaultNaming, &SynthConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            SynthError::MissingEntityShape { ref entity, shape: EntityShape::Mutate } if entity == "Task"
        ));
    }

    #[test]
    fn colliding_names_are_rejected() {
        let mut doc = document();
        doc.enums.push(EnumDescriptor { name: "TaskStatus".into(), values: vec!["x".into()] });
        let err = synthesize(&doc, &DefaultNaming, &SynthConfig::default()).unwrap_err();
        assert!(matches!(err, SynthError::DuplicateName(ref n) if n == "TaskStatusSchema"));
    }

    #[test]
    fn names_that_are_not_identifiers_are_rejected() {
        let mut doc = document();
        doc.enums[0].name = "task-status".into();
        let err = synthesize(&doc, &DefaultNaming, &SynthConfig::default()).unwrap_err();
        assert!(matches!(err, SynthError::InvalidName(ref n) if n == "task-statusSchema"));
    }

    #[test]
    fn empty_enumeration_degrades_to_absence_only() {
        let mut doc = document();
        doc.enums[0].values.clear();
        let catalog = synthesize(&doc, &DefaultNaming, &SynthConfig::default()).unwrap();
        let schema = catalog.get("TaskStatusSchema").unwrap();
        assert!(schema.accepts(None));
        assert!(!schema.accepts(Some(&json!("pending"))));
    }

    #[test]
    fn fixture_document_matches_its_data_cases() {
        let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("dev-test-runner/fixtures");
        let doc = DescriptorDocument::load(&root.join("descriptors.json")).unwrap();
        let catalog = synthesize(&doc, &DefaultNaming, &SynthConfig::default()).unwrap();
        let mut seen = 0;
        for entry in std::fs::read_dir(root.join("data")).unwrap() {
            let path = entry.unwrap().path();
            let file = path.file_name().unwrap().to_str().unwrap().to_string();
            let mut parts = file.split('.');
            let (name, expect) = (parts.next().unwrap(), parts.next().unwrap());
            let value: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            let schema = catalog.get(name).unwrap_or_else(|| panic!("no schema {name}"));
            assert_eq!(schema.accepts(Some(&value)), expect == "ok", "{file}");
            seen += 1;
        }
        assert!(seen >= 10);
    }
}
