// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Driver behind the `msgpgen` binary: load a schema, generate, write.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use msgpgen_gen::{generate_schema, ApplyReport, DirectiveConfig, GenOptions, Schema};

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Types code was generated for (empty for `check`).
    pub types: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub output: Option<PathBuf>,
}

impl RunSummary {
    fn from_report(report: &ApplyReport) -> Self {
        Self {
            types: Vec::new(),
            errors: report.errors.iter().map(|i| i.error.to_string()).collect(),
            warnings: report.warnings.clone(),
            output: None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn print(&self) {
        match &self.output {
            Some(path) => eprintln!(
                "generated {} type(s) into {}",
                self.types.len(),
                path.display()
            ),
            None if !self.types.is_empty() => {
                eprintln!("generated {} type(s)", self.types.len());
            }
            None => {}
        }
        for w in &self.warnings {
            eprintln!("[WARN] {w}");
        }
        for e in &self.errors {
            eprintln!("[ERROR] {e}");
        }
    }
}

fn load(schema: &Path) -> Result<Schema> {
    Schema::from_file(schema)
        .with_context(|| format!("failed to load schema {}", schema.display()))
}

/// Generate code for `schema`, writing to `out` or stdout.
pub fn run_generate(schema: &Path, out: Option<&Path>, opts: &GenOptions) -> Result<RunSummary> {
    tracing::info!(schema = %schema.display(), "loading schema");
    let schema = load(schema)?;
    let generated = generate_schema(&schema, opts).context("generation failed")?;

    match out {
        Some(path) => {
            fs::write(path, &generated.code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "output written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(generated.code.as_bytes())
                .context("failed to write to stdout")?;
        }
    }

    let mut summary = RunSummary::from_report(&generated.report);
    summary.types = generated.types;
    summary.output = out.map(Path::to_path_buf);
    Ok(summary)
}

/// Validate `schema` and its directives without generating.
pub fn run_check(schema: &Path) -> Result<RunSummary> {
    let schema = load(schema)?;
    let types = schema.type_set().context("invalid type declarations")?;
    let (_, report) = DirectiveConfig::from_lines(&schema.directive_lines(), &types);
    Ok(RunSummary::from_report(&report))
}
