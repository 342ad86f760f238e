// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Directive lines.
//!
//! ```text
//! //msgp:shim {Alias} as:{Base} using:{to_base}/{from_base} [mode:cast|convert]
//! //msgp:shim {Alias} as:{Base} mode:cast
//! //msgp:ignore {TypeA} {TypeB} ...
//! //msgp:tuple {TypeA} {TypeB} ...
//! //msgp:sort {Type} {SortInterface} [{LessFunction}]
//! //msgp:allocbound {Type} {Bound}
//! //msgp:postunmarshalcheck {Type} {callback} {callback} ...
//! ```

use thiserror::Error;
use tracing::warn;

use crate::elem::{Shim, ShimMode};

/// Prefix marking a directive comment.
pub const LINE_PREFIX: &str = "//msgp:";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("{directive} directive should have {expected} arguments; found {found}")]
    ArgCount {
        directive: &'static str,
        expected: &'static str,
        found: usize,
    },
    #[error("shim directive: expected 2 using:{{to/from}} functions; found {found} ({text:?})")]
    ShimUsing { found: usize, text: String },
    #[error("invalid shim mode; found {0}, expected 'cast' or 'convert'")]
    ShimMode(String),
    #[error("shim directive for {0}: convert mode needs using:{{to/from}} functions")]
    ShimConvertWithoutFunctions(String),
    #[error("no default less function for {0} and no function is provided")]
    NoLessFunction(String),
    #[error("{directive} error: type {name} does not exist")]
    UnknownType {
        directive: &'static str,
        name: String,
    },
}

/// Less-than function bound by a sort directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessFn {
    /// Function named in the directive.
    Explicit(String),
    /// Built-in comparator of the runtime crate.
    Builtin(&'static str),
}

impl LessFn {
    /// Path of the function as generated code spells it.
    pub fn path(&self, runtime: &str) -> String {
        match self {
            LessFn::Explicit(f) => f.clone(),
            LessFn::Builtin(f) => format!("{runtime}::{f}"),
        }
    }
}

/// Built-in comparator for a primitive sort type.
pub fn builtin_less(type_name: &str) -> Option<&'static str> {
    let f = match type_name {
        "isize" => "int_less",
        "i8" => "int8_less",
        "i16" => "int16_less",
        "i32" => "int32_less",
        "i64" => "int64_less",
        "usize" => "uint_less",
        "u8" => "uint8_less",
        "u16" => "uint16_less",
        "u32" => "uint32_less",
        "u64" => "uint64_less",
        "f32" => "float32_less",
        "f64" => "float64_less",
        "String" => "string_less",
        "Vec<u8>" => "bytes_less",
        _ => return None,
    };
    Some(f)
}

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Shim {
        alias: String,
        shim: Shim,
    },
    Ignore(Vec<String>),
    Tuple(Vec<String>),
    Sort {
        type_name: String,
        interface: String,
        less: LessFn,
    },
    AllocBound {
        type_name: String,
        bound: String,
    },
    PostUnmarshalCheck {
        type_name: String,
        callbacks: Vec<String>,
    },
}

impl Directive {
    pub fn name(&self) -> &'static str {
        match self {
            Directive::Shim { .. } => "shim",
            Directive::Ignore(_) => "ignore",
            Directive::Tuple(_) => "tuple",
            Directive::Sort { .. } => "sort",
            Directive::AllocBound { .. } => "allocbound",
            Directive::PostUnmarshalCheck { .. } => "postunmarshalcheck",
        }
    }
}

/// Bodies of every `//msgp:` line in `text`, prefix removed.
pub fn yield_directives(text: &str) -> Vec<&str> {
    text.lines()
        .filter_map(|line| line.trim_start().strip_prefix(LINE_PREFIX))
        .collect()
}

/// Parse a comment line. Lines without the prefix are not directives.
pub fn parse_line(line: &str) -> Result<Option<Directive>, DirectiveError> {
    match line.trim_start().strip_prefix(LINE_PREFIX) {
        Some(body) => parse_directive(body),
        None => Ok(None),
    }
}

/// Parse a directive body such as `tuple Point Line`.
///
/// Unknown directive names are skipped with a warning.
pub fn parse_directive(body: &str) -> Result<Option<Directive>, DirectiveError> {
    let mut words = body.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let directive = match name {
        "shim" => parse_shim(&args)?,
        "ignore" => Directive::Ignore(names(&args, "ignore")?),
        "tuple" => Directive::Tuple(names(&args, "tuple")?),
        "sort" => parse_sort(&args)?,
        "allocbound" => {
            let [type_name, bound] = args[..] else {
                return Err(arg_count("allocbound", "2", args.len()));
            };
            Directive::AllocBound {
                type_name: type_name.to_string(),
                bound: bound.to_string(),
            }
        }
        "postunmarshalcheck" => {
            let Some((type_name, callbacks)) = args.split_first().filter(|(_, cb)| !cb.is_empty())
            else {
                return Err(arg_count("postunmarshalcheck", "at least 2", args.len()));
            };
            Directive::PostUnmarshalCheck {
                type_name: type_name.to_string(),
                callbacks: callbacks.iter().map(|s| s.to_string()).collect(),
            }
        }
        other => {
            warn!(directive = other, "unknown directive skipped");
            return Ok(None);
        }
    };
    Ok(Some(directive))
}

fn arg_count(directive: &'static str, expected: &'static str, found: usize) -> DirectiveError {
    DirectiveError::ArgCount {
        directive,
        expected,
        found,
    }
}

fn names(args: &[&str], directive: &'static str) -> Result<Vec<String>, DirectiveError> {
    if args.is_empty() {
        return Err(arg_count(directive, "at least 1", 0));
    }
    Ok(args.iter().map(|s| s.to_string()).collect())
}

fn parse_mode(arg: &str) -> Result<ShimMode, DirectiveError> {
    match arg.strip_prefix("mode:").unwrap_or(arg) {
        "cast" => Ok(ShimMode::Cast),
        "convert" => Ok(ShimMode::Convert),
        other => Err(DirectiveError::ShimMode(other.to_string())),
    }
}

fn parse_shim(args: &[&str]) -> Result<Directive, DirectiveError> {
    if !(3..=4).contains(&args.len()) {
        return Err(arg_count("shim", "3 or 4", args.len()));
    }

    let (alias, needs_ref) = match args[0].strip_prefix('*') {
        Some(name) => (name, true),
        None => (args[0], false),
    };
    let base = args[1].strip_prefix("as:").unwrap_or(args[1]);

    let (functions, mode) = match args.len() {
        3 if args[2].starts_with("mode:") => (None, parse_mode(args[2])?),
        3 => (Some(args[2]), ShimMode::Cast),
        _ => (Some(args[2]), parse_mode(args[3])?),
    };

    let (to_base, from_base) = match functions {
        Some(text) => {
            let using = text.strip_prefix("using:").unwrap_or(text);
            let methods: Vec<&str> = using.split('/').collect();
            let [to, from] = methods[..] else {
                return Err(DirectiveError::ShimUsing {
                    found: methods.len(),
                    text: text.to_string(),
                });
            };
            (Some(to.to_string()), Some(from.to_string()))
        }
        None => (None, None),
    };
    if mode == ShimMode::Convert && to_base.is_none() {
        return Err(DirectiveError::ShimConvertWithoutFunctions(alias.to_string()));
    }

    Ok(Directive::Shim {
        alias: alias.to_string(),
        shim: Shim {
            base: base.to_string(),
            mode,
            to_base,
            from_base,
            needs_ref,
        },
    })
}

fn parse_sort(args: &[&str]) -> Result<Directive, DirectiveError> {
    let (type_name, interface, explicit) = match args[..] {
        [t, i] => (t, i, None),
        [t, i, f] => (t, i, Some(f)),
        _ => return Err(arg_count("sort", "2 or 3", args.len())),
    };
    let less = match explicit {
        Some(f) => LessFn::Explicit(f.to_string()),
        None => builtin_less(type_name)
            .map(LessFn::Builtin)
            .ok_or_else(|| DirectiveError::NoLessFunction(type_name.to_string()))?,
    };
    Ok(Directive::Sort {
        type_name: type_name.to_string(),
        interface: interface.to_string(),
        less,
    })
}
