// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Naming scope for one traversal.
//!
//! Each generator run owns a `Context`; nothing is shared between runs, so
//! identifiers depend only on the shape of the type being emitted.

use tracing::trace;

/// Scope stack plus a counter for fresh identifiers.
#[derive(Debug, Default)]
pub struct Context {
    path: Vec<String>,
    counter: u32,
}

impl Context {
    /// Context rooted at a type name.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            path: vec![root.into()],
            counter: 0,
        }
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.path.push(segment.into());
    }

    pub fn pop(&mut self) {
        self.path.pop();
    }

    /// Fresh identifier such as `za0003`. Never repeats within a context.
    pub fn fresh(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}{:04}", self.counter)
    }

    /// Enter a container's element scope under a fresh loop variable.
    pub fn push_fresh(&mut self, prefix: &str) -> String {
        let ident = self.fresh(prefix);
        self.push(ident.clone());
        trace!(scope = %self.path(), "enter element scope");
        ident
    }

    /// Dotted path of the current scope, e.g. `Order.items.za0001`.
    pub fn path(&self) -> String {
        self.path.join(".")
    }
}
