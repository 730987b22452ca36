//! Runs every `fixtures/data/<Schema>.<ok|bad>.<label>.json` against the
//! catalog synthesized from `fixtures/descriptors.json`.
//!
//! Usage: `cargo run -p dev-test-runner [-- <fixtures-dir>]`
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use shape_synth::{synthesize, DefaultNaming, DescriptorDocument, SynthConfig};

static CASE_FILE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<schema>[A-Za-z0-9_]+)\.(?P<expect>ok|bad)\.(?P<label>[^.]+)\.json$")
        .expect("static fixture pattern")
});

#[derive(Debug, Serialize)]
struct CaseResult {
    file: String,
    schema: String,
    expect_ok: bool,
    passed: bool,
    violations: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
struct Report {
    passed: usize,
    failed: usize,
    cases: Vec<CaseResult>,
}

fn main() -> ExitCode {
    let root = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));

    match run(&root) {
        Ok(report) => {
            for case in &report.cases {
                let mark = if case.passed { "✅" } else { "❌" };
                eprintln!("{mark} {} ({})", case.file, case.schema);
                if !case.passed {
                    for v in &case.violations {
                        eprintln!("    {v}");
                    }
                }
            }
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{json}"),
                Err(error) => eprintln!("failed to serialize report: {error}"),
            }
            if report.failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
        Err(error) => {
            eprintln!("❌ {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(root: &Path) -> Result<Report, Box<dyn std::error::Error>> {
    let document = DescriptorDocument::load(&root.join("descriptors.json"))?;
    let catalog = synthesize(&document, &DefaultNaming, &SynthConfig::default())?;

    let mut entries = std::fs::read_dir(root.join("data"))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|e| e.path())
        .collect::<Vec<_>>();
    entries.sort();

    let mut report = Report::default();
    for path in entries {
        let Some(file) = path.file_name().and_then(|f| f.to_str()).map(str::to_string) else { continue };
        let Some(caps) = CASE_FILE.captures(&file) else {
            eprintln!("skipping {file}: not named <Schema>.<ok|bad>.<label>.json");
            continue;
        };
        let schema_name = caps["schema"].to_string();
        let expect_ok = &caps["expect"] == "ok";
        let schema = catalog
            .get(&schema_name)
            .ok_or_else(|| format!("{file}: no schema named `{schema_name}`"))?;

        let source = std::fs::read_to_string(&path)?;
        let value: serde_json::Value = shape_synth::path_de::from_str_with_path(&source)?;
        let violations = match schema.validate(Some(&value)) {
            Ok(()) => Vec::new(),
            Err(vs) => vs.iter().map(ToString::to_string).collect(),
        };
        let passed = violations.is_empty() == expect_ok;
        if passed { report.passed += 1 } else { report.failed += 1 }
        report.cases.push(CaseResult { file, schema: schema_name, expect_ok, passed, violations });
    }
    Ok(report)
}
