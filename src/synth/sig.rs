use crate::descriptor::{Parameters, Returns, SignatureDescriptor};
use crate::error::{SignaturePart, SynthError};
use crate::ir::{Schema, SchemaExpr};

use super::{build_object, Emitter};

/// Parameter and return schemas of one callable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureSchemas {
    pub args: SchemaExpr,
    pub returns: SchemaExpr,
}

impl SignatureSchemas {
    pub fn build(em: &Emitter, sig: &SignatureDescriptor) -> Result<Self, SynthError> {
        let params = sig.params.as_ref().ok_or_else(|| missing(sig, SignaturePart::Params))?;
        let returns = sig.returns.as_ref().ok_or_else(|| missing(sig, SignaturePart::Returns))?;
        Ok(Self {
            args: args_schema(em, params),
            returns: returns_schema(em, returns),
        })
    }
}

pub fn args_schema(em: &Emitter, params: &Parameters) -> SchemaExpr {
    match params {
        Parameters::None => SchemaExpr::new(Schema::EmptyRecord),
        Parameters::Object(obj) => SchemaExpr::new(build_object(em, obj, &[], 0)),
    }
}

/// Always nullable: a call may legitimately find nothing, whatever it declares.
pub fn returns_schema(em: &Emitter, returns: &Returns) -> SchemaExpr {
    match returns {
        Returns::Nothing => SchemaExpr::new(Schema::Undefined).nullable(),
        Returns::Value(ty) => em.emit(ty, false, 0, true),
    }
}

fn missing(sig: &SignatureDescriptor, part: SignaturePart) -> SynthError {
    SynthError::MissingSignaturePart { signature: sig.name.clone(), part }
}
