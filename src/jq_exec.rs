//! jq pre-processing for descriptor dumps and data documents.
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::SynthError;

/// Run `filter_src` over `input`; each output is returned as JSON text.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<String>, SynthError> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in outputs {
        let v = item.map_err(|e| SynthError::Jq(format!("{e:?}")))?;
        out.push(format!("{v}")); // Val: Display -> JSON text
    }
    Ok(out)
}

/// Like [`run_jaq`] but parsed back into values.
pub fn run_jaq_values(filter_src: &str, input: &Value) -> Result<Vec<Value>, SynthError> {
    run_jaq(filter_src, input)?
        .iter()
        .map(|src| crate::path_de::from_str_with_path(src))
        .collect()
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> SynthError {
    let mut s = String::new();
    for (file, err) in errs {
        s.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    SynthError::Jq(s.trim_end().to_string())
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> SynthError {
    let mut s = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            s.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    SynthError::Jq(s.trim_end().to_string())
}
