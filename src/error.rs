use std::fmt;
use std::path::PathBuf;

/// Which shape of an entity a descriptor failed to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityShape {
    Read,
    Create,
    Mutate,
}

/// Which half of a signature a descriptor failed to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignaturePart {
    Params,
    Returns,
}

#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    /// The type source handed over an entity without one of its shapes.
    #[error("configuration error: entity `{entity}` has no {shape} shape")]
    MissingEntityShape { entity: String, shape: EntityShape },

    /// The type source handed over a signature without params or returns.
    #[error("configuration error: signature `{signature}` declares no {part}")]
    MissingSignaturePart { signature: String, part: SignaturePart },

    #[error("configuration error: entity `{entity}` declares no `{field}` identifier in its read or mutate shape")]
    MissingIdentifier { entity: String, field: String },

    #[error("schema name `{0}` is not a valid identifier")]
    InvalidName(String),

    #[error("two schemas would both be named `{0}`")]
    DuplicateName(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("at JSON path {path} → {message}")]
    Decode { path: String, message: String },

    #[error("jq: {0}")]
    Jq(String),
}

impl fmt::Display for EntityShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Mutate => "mutate",
        })
    }
}

impl fmt::Display for SignaturePart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Params => "params",
            Self::Returns => "returns",
        })
    }
}
