//! Synthesis policy knobs.
use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// Recursion ceiling standing in for cycle detection.
pub const MAX_DEPTH: usize = 10;

pub const DEFAULT_ID_FIELD: &str = "id";

/// What to emit for a union of two or more heterogeneous members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnionPolicy {
    /// Accept-anything fallback.
    Dynamic,
    /// `z.union([...])` over each member.
    Composed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthConfig {
    pub max_depth: usize,
    /// Identifier promoted to mandatory in update shapes, unless the entity
    /// names its own.
    pub id_field: String,
    pub entity_unions: UnionPolicy,
    pub signature_unions: UnionPolicy,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            id_field: DEFAULT_ID_FIELD.to_string(),
            entity_unions: UnionPolicy::Dynamic,
            signature_unions: UnionPolicy::Composed,
        }
    }
}

impl SynthConfig {
    pub fn load(path: &Path) -> Result<Self, SynthError> {
        let bytes = std::fs::read(path).map_err(|source| SynthError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        crate::path_de::from_slice_with_path(&bytes)
    }
}

// ------------------------------- Tests ------------------------------------ //
