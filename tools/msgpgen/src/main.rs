// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! msgpgen CLI
//!
//! ```bash
//! # Generate both methods to stdout
//! msgpgen generate --schema types.yaml
//!
//! # Size estimates only, into a file
//! msgpgen generate --schema types.yaml --out src/generated.rs --method size
//!
//! # Validate directives
//! msgpgen check --schema types.yaml
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use msgpgen_gen::{GenOptions, Method, ZeroFallback, DEFAULT_RUNTIME};
use tracing_subscriber::EnvFilter;

/// Size-estimate and zero-check code generator
#[derive(Parser, Debug)]
#[command(name = "msgpgen")]
#[command(about = "Generate Msgsize / MsgIsZero implementations from a YAML schema")]
#[command(version)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate code for every type in a schema
    Generate {
        /// Schema file path
        #[arg(short, long)]
        schema: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Methods to emit (repeatable; all when omitted)
        #[arg(short, long, value_enum)]
        method: Vec<MethodArg>,

        /// Answer for types with no derivable zero test
        #[arg(long, value_enum, default_value_t = FallbackArg::AssumeZero)]
        zero_fallback: FallbackArg,

        /// Path of the runtime crate in generated code
        #[arg(long, default_value = DEFAULT_RUNTIME)]
        runtime: String,
    },

    /// Validate a schema and its directives
    Check {
        /// Schema file path
        #[arg(short, long)]
        schema: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodArg {
    Size,
    Iszero,
}

impl From<MethodArg> for Method {
    fn from(m: MethodArg) -> Self {
        match m {
            MethodArg::Size => Method::Size,
            MethodArg::Iszero => Method::IsZero,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FallbackArg {
    AssumeZero,
    AssumeNonZero,
}

impl From<FallbackArg> for ZeroFallback {
    fn from(f: FallbackArg) -> Self {
        match f {
            FallbackArg::AssumeZero => ZeroFallback::AssumeZero,
            FallbackArg::AssumeNonZero => ZeroFallback::AssumeNonZero,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let summary = match args.command {
        Commands::Generate {
            schema,
            out,
            method,
            zero_fallback,
            runtime,
        } => {
            let mut opts = GenOptions::default()
                .with_zero_fallback(zero_fallback.into())
                .with_runtime(runtime);
            if !method.is_empty() {
                opts = opts.with_methods(method.into_iter().map(Method::from).collect());
            }
            msgpgen::run_generate(&schema, out.as_deref(), &opts)?
        }
        Commands::Check { schema } => msgpgen::run_check(&schema)?,
    };

    summary.print();
    if !summary.is_clean() {
        anyhow::bail!("{} configuration error(s)", summary.errors.len());
    }
    Ok(())
}
