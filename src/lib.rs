//! Runtime validation schemas synthesized from host type descriptors.
//!
//! Pipeline: [`source`] (descriptors) → [`synth`] (descriptor → [`ir`]) →
//! [`catalog`] (named schemas per entity / signature / enum) → [`codegen`]
//! (source text) or [`validate`] (checking JSON in-process).
pub mod catalog;
pub mod cli;
pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod ir;
pub mod jq_exec;
pub mod path_de;
pub mod source;
pub mod synth;
pub mod validate;

pub use catalog::{synthesize, Catalog, DefaultNaming, Naming};
pub use config::{SynthConfig, UnionPolicy, MAX_DEPTH};
pub use error::SynthError;
pub use ir::{Schema, SchemaExpr};
pub use source::{DescriptorDocument, TypeSource};
pub use validate::Violation;
