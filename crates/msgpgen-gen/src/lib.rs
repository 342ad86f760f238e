// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven generator for `msgpgen_wire::Msgsize` and
//! `msgpgen_wire::MsgIsZero` implementations.
//!
//! The pipeline for a set of declared types:
//!
//! 1. parse directives into a [`DirectiveConfig`] side table,
//! 2. apply it to the [`TypeSet`] (tuple flags, shims, bounds, ignores),
//! 3. compute the [`FixedSizes`] table to a fixpoint,
//! 4. run each requested [`Generator`] over every remaining type.
//!
//! Each step is local to one type: a malformed directive removes the type
//! it names and the rest are still generated.
//!
//! # Example
//!
//! ```
//! use msgpgen_gen::{generate, Elem, GenOptions, StructField, TypeSet};
//!
//! let types: TypeSet = [Elem::structure(vec![
//!     StructField::new("x", Elem::base("f64")),
//!     StructField::new("y", Elem::base("f64")),
//! ])
//! .named("Point")]
//! .into_iter()
//! .collect();
//!
//! let out = generate(types, &["//msgp:tuple Point"], &GenOptions::default()).unwrap();
//! assert!(out.code.contains("impl msgpgen_wire::Msgsize for Point"));
//! ```

pub mod config;
pub mod context;
pub mod directives;
pub mod elem;
pub mod fixed;
pub mod passes;
pub mod schema;
pub mod size;
pub mod traverse;
pub mod zero;

use std::io::Write;

use thiserror::Error;
use tracing::{debug, info};

pub use config::{fixed_sizes, ApplyReport, ConfigIssue, DirectiveConfig, TypeConfig, TypeSet};
pub use context::Context;
pub use directives::{parse_directive, parse_line, yield_directives, Directive, DirectiveError};
pub use elem::{BaseElem, Elem, Primitive, Shim, ShimMode, StructField};
pub use fixed::{FixedSize, FixedSizes};
pub use passes::{ignore_typename, Passes, TransformPass};
pub use schema::Schema;
pub use size::SizeGen;
pub use traverse::{Generator, Method};
pub use zero::{IsZeroGen, ZeroFallback};

/// Default path of the runtime crate in generated code.
pub const DEFAULT_RUNTIME: &str = "msgpgen_wire";

#[derive(Debug, Error)]
pub enum GenError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("directive error: {0}")]
    Directive(#[from] DirectiveError),

    #[error("invalid schema: {0}")]
    Schema(String),
}

pub type GenResult<T> = Result<T, GenError>;

/// Generator options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenOptions {
    pub methods: Vec<Method>,
    /// Path of the runtime crate in generated code.
    pub runtime: String,
    pub zero_fallback: ZeroFallback,
}

impl Default for GenOptions {
    fn default() -> Self {
        Self {
            methods: Method::ALL.to_vec(),
            runtime: DEFAULT_RUNTIME.to_string(),
            zero_fallback: ZeroFallback::default(),
        }
    }
}

impl GenOptions {
    #[must_use]
    pub fn with_methods(mut self, methods: Vec<Method>) -> Self {
        self.methods = methods;
        self
    }

    #[must_use]
    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    #[must_use]
    pub fn with_zero_fallback(mut self, fallback: ZeroFallback) -> Self {
        self.zero_fallback = fallback;
        self
    }
}

/// Output of one generation run.
#[derive(Debug, Clone)]
pub struct Generated {
    pub code: String,
    pub report: ApplyReport,
    /// Names of the types code was emitted for.
    pub types: Vec<String>,
}

/// Header of every generated file.
pub fn preamble(runtime: &str) -> String {
    format!(
        "// Code generated by msgpgen. DO NOT EDIT.\n\n\
         #[allow(unused_imports)]\n\
         use {runtime}::{{Extension as _, MsgIsZero as _, Msgsize as _}};\n\n"
    )
}

fn generators(opts: &GenOptions, sizes: &FixedSizes) -> Vec<Box<dyn Generator>> {
    let mut methods = opts.methods.clone();
    methods.sort();
    methods.dedup();
    methods
        .into_iter()
        .map(|m| -> Box<dyn Generator> {
            match m {
                Method::Size => Box::new(SizeGen::new(sizes.clone())),
                Method::IsZero => Box::new(IsZeroGen::new(&opts.runtime, opts.zero_fallback)),
            }
        })
        .collect()
}

/// Configure `types` with `directives` and emit every requested method.
pub fn generate<S: AsRef<str>>(
    types: TypeSet,
    directives: &[S],
    opts: &GenOptions,
) -> GenResult<Generated> {
    let (config, report) = DirectiveConfig::from_lines(directives, &types);
    let types = config.apply(types, &report);
    let sizes = fixed_sizes(&types, &opts.runtime);

    let mut gens = generators(opts, &sizes);
    if !config.ignored().is_empty() {
        for g in &mut gens {
            g.add_pass(ignore_typename(config.ignored().clone()));
        }
    }

    let mut code = preamble(&opts.runtime);
    let mut emitted = Vec::new();
    for e in types.iter() {
        let mut any = false;
        for g in &mut gens {
            let chunk = g.execute(e)?;
            if !chunk.is_empty() {
                debug!(method = %g.method(), type_name = %e.type_name(), "emitted");
                code.push_str(&chunk);
                code.push('\n');
                any = true;
            }
        }
        if any {
            emitted.push(e.type_name());
        }
    }
    info!(
        types = emitted.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "generation finished"
    );

    Ok(Generated {
        code,
        report,
        types: emitted,
    })
}

/// Generate from a parsed schema.
pub fn generate_schema(schema: &Schema, opts: &GenOptions) -> GenResult<Generated> {
    generate(schema.type_set()?, &schema.directive_lines(), opts)
}

/// Generate and write the code to `w`.
pub fn generate_to<W: Write, S: AsRef<str>>(
    w: &mut W,
    types: TypeSet,
    directives: &[S],
    opts: &GenOptions,
) -> GenResult<ApplyReport> {
    let out = generate(types, directives, opts)?;
    w.write_all(out.code.as_bytes())?;
    w.flush()?;
    Ok(out.report)
}
