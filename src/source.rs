//! Where descriptors come from.
//!
//! [`TypeSource`] is the seam to the introspection side; [`DescriptorDocument`]
//! is the JSON dump implementation the CLI reads.
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::descriptor::{EntityDescriptor, EnumDescriptor, SignatureDescriptor};
use crate::error::SynthError;

pub trait TypeSource {
    fn entities(&self) -> &[EntityDescriptor];
    fn signatures(&self) -> &[SignatureDescriptor];
    fn enums(&self) -> &[EnumDescriptor];
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorDocument {
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
    #[serde(default)]
    pub signatures: Vec<SignatureDescriptor>,
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
}

impl TypeSource for DescriptorDocument {
    fn entities(&self) -> &[EntityDescriptor] { &self.entities }
    fn signatures(&self) -> &[SignatureDescriptor] { &self.signatures }
    fn enums(&self) -> &[EnumDescriptor] { &self.enums }
}

impl DescriptorDocument {
    pub fn load(path: &Path) -> Result<Self, SynthError> {
        Self::load_with_jq(path, None)
    }

    /// Load, optionally reshaping the raw dump with a jq filter first. The
    /// filter must yield exactly one document.
    pub fn load_with_jq(path: &Path, jq_expr: Option<&str>) -> Result<Self, SynthError> {
        let source = std::fs::read_to_string(path).map_err(|source| SynthError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let Some(jq_expr) = jq_expr else {
            return crate::path_de::from_str_with_path(&source);
        };
        let raw: serde_json::Value = crate::path_de::from_str_with_path(&source)?;
        let outputs = crate::jq_exec::run_jaq(jq_expr, &raw)?;
        match outputs.as_slice() {
            [single] => crate::path_de::from_str_with_path(single),
            other => Err(SynthError::Jq(format!(
                "expected the filter to produce one descriptor document, got {}",
                other.len()
            ))),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
