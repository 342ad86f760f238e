// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Directive configuration.
//!
//! Directives are parsed once into a side table keyed by type name, then
//! applied to the declared types in a pre-pass. Generators only ever see
//! the configured type graph.
//!
//! Configuration errors are local to the type they name: that type is
//! excluded and every other type is still generated. Directives naming a
//! type that does not exist are reported as warnings.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::directives::{parse_directive, parse_line, Directive, DirectiveError, LessFn};
use crate::elem::{Elem, Primitive, Shim};
use crate::fixed::FixedSizes;
use crate::{GenError, GenResult};

/// Declared types in declaration order.
#[derive(Debug, Clone, Default)]
pub struct TypeSet {
    types: Vec<Elem>,
}

impl TypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named type, replacing an earlier declaration of the same name.
    pub fn insert(&mut self, e: Elem) {
        let name = e.type_name();
        match self.types.iter_mut().find(|t| t.type_name() == name) {
            Some(slot) => *slot = e,
            None => self.types.push(e),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Elem> {
        self.types.iter().find(|t| t.alias() == Some(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<Elem> {
        let idx = self.types.iter().position(|t| t.alias() == Some(name))?;
        Some(self.types.remove(idx))
    }

    pub fn names(&self) -> Vec<String> {
        self.types.iter().map(Elem::type_name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Elem> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<Elem> for TypeSet {
    fn from_iter<I: IntoIterator<Item = Elem>>(iter: I) -> Self {
        let mut set = TypeSet::new();
        for e in iter {
            set.insert(e);
        }
        set
    }
}

/// Sort binding recorded for a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortBinding {
    pub interface: String,
    pub less: LessFn,
}

/// Per-type record built from directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeConfig {
    pub tuple: bool,
    pub sort: Option<SortBinding>,
    pub alloc_bound: Option<String>,
    pub callbacks: Vec<String>,
}

/// A configuration error and the type it excludes, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub type_name: Option<String>,
    pub error: DirectiveError,
}

/// Outcome of building and applying the directive table.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    pub errors: Vec<ConfigIssue>,
    pub warnings: Vec<String>,
    /// Types left out because a directive naming them was malformed.
    pub excluded: BTreeSet<String>,
}

impl ApplyReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// First configuration error, if any.
    pub fn check(&self) -> GenResult<()> {
        match self.errors.first() {
            Some(issue) => Err(GenError::Directive(issue.error.clone())),
            None => Ok(()),
        }
    }

    fn error(&mut self, type_name: Option<&str>, error: DirectiveError) {
        warn!(type_name = type_name.unwrap_or("-"), %error, "directive rejected");
        if let Some(name) = type_name {
            self.excluded.insert(name.to_string());
        }
        self.errors.push(ConfigIssue {
            type_name: type_name.map(str::to_string),
            error,
        });
    }

    fn warning(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }
}

/// Directive side table keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct DirectiveConfig {
    shims: BTreeMap<String, Shim>,
    types: BTreeMap<String, TypeConfig>,
    ignored: BTreeSet<String>,
}

impl DirectiveConfig {
    /// Parse directive lines against the declared types.
    ///
    /// Lines may carry the `//msgp:` prefix or be bare directive bodies.
    pub fn from_lines<S: AsRef<str>>(lines: &[S], types: &TypeSet) -> (Self, ApplyReport) {
        let mut config = DirectiveConfig::default();
        let mut report = ApplyReport::default();
        for line in lines {
            let line = line.as_ref();
            let parsed = if line.trim_start().starts_with("//") {
                parse_line(line)
            } else {
                parse_directive(line)
            };
            match parsed {
                Ok(Some(directive)) => config.record(directive, types, &mut report),
                Ok(None) => {}
                Err(error) => report.error(subject(line), error),
            }
        }
        (config, report)
    }

    /// Record one parsed directive.
    pub fn record(&mut self, directive: Directive, types: &TypeSet, report: &mut ApplyReport) {
        debug!(directive = directive.name(), "recording directive");
        match directive {
            Directive::Shim { alias, shim } => {
                info!(alias = %alias, base = %shim.base, mode = %shim.mode, "shim bound");
                self.shims.insert(alias, shim);
            }
            Directive::Ignore(names) => {
                for name in names {
                    info!(type_name = %name, "ignoring");
                    self.ignored.insert(name);
                }
            }
            Directive::Tuple(names) => {
                for name in names {
                    match types.get(&name) {
                        Some(Elem::Struct(_)) => {
                            info!(type_name = %name, "tuple encoding");
                            self.entry(&name).tuple = true;
                        }
                        Some(_) => report.warning(format!("{name}: only structs can be tuples")),
                        None => report.warning(format!("tuple: cannot find type {name}")),
                    }
                }
            }
            Directive::Sort {
                type_name,
                interface,
                less,
            } => {
                info!(type_name = %type_name, interface = %interface, "sorting");
                info!(type_name = %type_name, less = ?less, "less function bound");
                self.entry(&type_name).sort = Some(SortBinding { interface, less });
            }
            Directive::AllocBound { type_name, bound } => {
                if types.contains(&type_name) {
                    info!(type_name = %type_name, bound = %bound, "allocation bound set");
                    self.entry(&type_name).alloc_bound = Some(bound);
                } else {
                    report.warning(format!("allocbound: cannot find type {type_name}"));
                }
            }
            Directive::PostUnmarshalCheck {
                type_name,
                callbacks,
            } => {
                if types.contains(&type_name) {
                    info!(type_name = %type_name, count = callbacks.len(), "post-decode callbacks");
                    self.entry(&type_name).callbacks.extend(callbacks);
                } else {
                    report.error(
                        None,
                        DirectiveError::UnknownType {
                            directive: "postunmarshalcheck",
                            name: type_name,
                        },
                    );
                }
            }
        }
    }

    fn entry(&mut self, name: &str) -> &mut TypeConfig {
        self.types.entry(name.to_string()).or_default()
    }

    pub fn shim(&self, alias: &str) -> Option<&Shim> {
        self.shims.get(alias)
    }

    pub fn type_config(&self, name: &str) -> Option<&TypeConfig> {
        self.types.get(name)
    }

    pub fn sort(&self, name: &str) -> Option<&SortBinding> {
        self.types.get(name).and_then(|c| c.sort.as_ref())
    }

    pub fn ignored(&self) -> &BTreeSet<String> {
        &self.ignored
    }

    /// Pre-pass: drop ignored and excluded types, then attach tuple flags,
    /// allocation bounds, callbacks and shims to the remaining graphs.
    pub fn apply(&self, types: TypeSet, report: &ApplyReport) -> TypeSet {
        types
            .types
            .into_iter()
            .filter(|e| {
                let name = e.type_name();
                !self.ignored.contains(&name) && !report.excluded.contains(&name)
            })
            .map(|mut e| {
                self.configure(&mut e);
                e
            })
            .collect()
    }

    fn configure(&self, e: &mut Elem) {
        let name = e.type_name();
        if let Some(cfg) = self.types.get(&name) {
            if let Elem::Struct(st) = &mut *e {
                st.as_tuple |= cfg.tuple;
            }
            let common = e.common_mut();
            if cfg.alloc_bound.is_some() {
                common.alloc_bound = cfg.alloc_bound.clone();
            }
            common.callbacks.extend(cfg.callbacks.iter().cloned());
        }
        if self.shims.is_empty() {
            return;
        }
        e.walk_mut(&mut |node| {
            if let Elem::Base(b) = node {
                if b.shim.is_none() && b.value == Primitive::Ident {
                    if let Some(shim) = self.shims.get(&b.ident_name) {
                        b.apply_shim(shim.clone());
                    }
                }
            }
        });
    }
}

/// Type named by a directive line, used to scope a parse error.
fn subject(line: &str) -> Option<&str> {
    let body = line.trim_start();
    let body = body.strip_prefix(crate::directives::LINE_PREFIX).unwrap_or(body);
    let mut words = body.split_whitespace();
    match words.next()? {
        "shim" | "sort" | "allocbound" | "postunmarshalcheck" => {
            words.next().map(|w| w.trim_start_matches('*'))
        }
        _ => None,
    }
}

/// Closed forms of every data-independent declared type.
///
/// Iterates to a fixpoint so a struct of fixed structs folds regardless of
/// declaration order.
pub fn fixed_sizes(types: &TypeSet, runtime: &str) -> FixedSizes {
    let mut sizes = FixedSizes::new(runtime);
    loop {
        let mut changed = false;
        for e in types.iter() {
            let name = e.type_name();
            if sizes.contains(&name) {
                continue;
            }
            if let Some(fs) = sizes.of(e) {
                sizes.insert(name, fs);
                changed = true;
            }
        }
        if !changed {
            return sizes;
        }
    }
}
