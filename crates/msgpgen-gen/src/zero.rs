// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Zero-check generator: emits `MsgIsZero::msg_is_zero`.

use std::fmt;

use tracing::debug;

use crate::elem::Elem;
use crate::passes::{Passes, TransformPass};
use crate::traverse::{bind_receiver, Generator, Method};
use crate::GenResult;

/// Answer used when no zero test can be derived for a type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ZeroFallback {
    /// Report the value as zero.
    #[default]
    AssumeZero,
    /// Report the value as non-zero.
    AssumeNonZero,
}

impl ZeroFallback {
    pub fn literal(self) -> &'static str {
        match self {
            ZeroFallback::AssumeZero => "true",
            ZeroFallback::AssumeNonZero => "false",
        }
    }
}

impl fmt::Display for ZeroFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZeroFallback::AssumeZero => f.write_str("assume-zero"),
            ZeroFallback::AssumeNonZero => f.write_str("assume-non-zero"),
        }
    }
}

pub struct IsZeroGen {
    passes: Passes,
    runtime: String,
    fallback: ZeroFallback,
}

impl IsZeroGen {
    pub fn new(runtime: impl Into<String>, fallback: ZeroFallback) -> Self {
        Self {
            passes: Passes::default(),
            runtime: runtime.into(),
            fallback,
        }
    }
}

impl Generator for IsZeroGen {
    fn method(&self) -> Method {
        Method::IsZero
    }

    fn add_pass(&mut self, pass: TransformPass) {
        self.passes.add(pass);
    }

    fn execute(&mut self, e: &Elem) -> GenResult<String> {
        let Some(mut e) = self.passes.apply_all(e.clone()) else {
            return Ok(String::new());
        };
        let name = e.type_name();
        let rt = &self.runtime;
        debug!(type_name = %name, "generating msg_is_zero");

        let mut out = format!("// msg_is_zero reports whether `{name}` is its zero value.\n");
        if let Elem::Base(b) = &e {
            if b.is_dangling() {
                let base = &b.ident_name;
                let body = Method::IsZero.delegate_body(&name, base);
                out.push_str(&Method::IsZero.wrap_impl(rt, &name, &body));
                return Ok(out);
            }
        }

        bind_receiver(&mut e);
        let mut expr = e.zero_expr(rt);
        if expr.is_empty() {
            debug!(type_name = %name, fallback = %self.fallback, "no zero test derivable");
            expr = self.fallback.literal().to_string();
        }
        let body = format!("        {expr}\n");
        out.push_str(&Method::IsZero.wrap_impl(rt, &name, &body));
        Ok(out)
    }
}
