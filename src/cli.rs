//! Minimal CLI: descriptors → (ts module | json map), or check data files.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::catalog::{synthesize, Catalog, DefaultNaming};
use crate::config::SynthConfig;
use crate::source::DescriptorDocument;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// derive runtime validation schemas from a type descriptor document
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// synthesize every schema and print (or write) them
    Generate(GenerateOut),
    /// check JSON data files against one synthesized schema
    Validate(ValidateIn),
}

#[derive(Args, Debug, Clone)]
struct SourceSettings {
    /// descriptor document (entities / signatures / enums)
    #[arg(long, short)]
    input: PathBuf,

    /// JQ filter reshaping the descriptor document before decoding
    #[arg(long)]
    jq_expr: Option<String>,

    /// synthesis config (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// override the recursion ceiling
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// TypeScript module of `export const` zod schemas
    Ts,
    /// JSON object mapping schema name to source text
    Json,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    source: SourceSettings,

    #[arg(long, value_enum, default_value_t = Format::Ts)]
    format: Format,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct ValidateIn {
    #[command(flatten)]
    source: SourceSettings,

    /// name of the schema to check against (e.g. `UpdateTaskRequest`)
    #[arg(long)]
    schema: String,

    /// JSON Pointer to select a subnode in each data document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ filter applied to each data document (before --json-pointer); must yield one value
    #[arg(long)]
    data_jq_expr: Option<String>,

    /// data files; literal paths or quoted glob patterns
    #[arg(long, num_args = 1.., required = true)]
    data: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SourceSettings {
    fn config(&self) -> Result<SynthConfig> {
        let mut config = match &self.config {
            Some(path) => SynthConfig::load(path)?,
            None => SynthConfig::default(),
        };
        if let Some(max_depth) = self.max_depth {
            config.max_depth = max_depth;
        }
        Ok(config)
    }

    fn catalog(&self) -> Result<Catalog> {
        let config = self.config()?;
        let document = DescriptorDocument::load_with_jq(&self.input, self.jq_expr.as_deref())
            .with_context(|| format!("loading descriptors from {}", self.input.display()))?;
        Ok(synthesize(&document, &DefaultNaming, &config)?)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<ExitCode> {
        match &self.cmd {
            Command::Generate(target) => {
                let catalog = target.source.catalog()?;
                let out = match target.format {
                    Format::Ts => catalog.render(),
                    Format::Json => serde_json::to_string_pretty(&catalog.to_json())?,
                };
                match target.out.as_ref() {
                    Some(path) => write_output(path, &out)?,
                    None => println!("{out}"),
                }
                Ok(ExitCode::SUCCESS)
            }
            Command::Validate(target) => {
                let catalog = target.source.catalog()?;
                let Some(schema) = catalog.get(&target.schema) else {
                    let known = catalog.names().collect::<Vec<_>>().join(", ");
                    bail!("no schema named `{}` (known: {known})", target.schema);
                };
                let mut failures = 0usize;
                for path in resolve_file_path_patterns(&target.data)? {
                    let value = load_data(&path, target.json_pointer.as_deref(), target.data_jq_expr.as_deref())?;
                    match schema.validate(value.as_ref()) {
                        Ok(()) => eprintln!("{} {}", "✅".green(), path.display()),
                        Err(violations) => {
                            failures += 1;
                            eprintln!("{} {}", "❌".red(), path.display().to_string().bold());
                            for v in violations {
                                eprintln!("    {v}");
                            }
                        }
                    }
                }
                tracing::info!(schema = %target.schema, failures, "validation finished");
                Ok(if failures == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE })
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(path: &Path, src: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(path, src).with_context(|| format!("writing {}", path.display()))
}

/// `None` when the pointer selects nothing: the schema then sees "absent".
fn load_data(path: &Path, json_pointer: Option<&str>, jq_expr: Option<&str>) -> Result<Option<serde_json::Value>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let mut value: serde_json::Value = crate::path_de::from_str_with_path(&source)
        .with_context(|| format!("parsing {}", path.display()))?;
    if let Some(jq_expr) = jq_expr {
        let mut outputs = crate::jq_exec::run_jaq_values(jq_expr, &value)?;
        if outputs.len() != 1 {
            bail!("jq filter produced {} values for {}", outputs.len(), path.display());
        }
        value = outputs.remove(0);
    }
    Ok(match json_pointer {
        Some(ptr) => value.pointer(ptr).cloned(),
        None => Some(value),
    })
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ------------------------------- Tests ------------------------------------ //
