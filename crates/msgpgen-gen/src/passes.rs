// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transform passes run on a type before a generator sees it.

use std::collections::BTreeSet;

use crate::elem::Elem;

/// Rewrites a type graph; `None` drops the type entirely.
pub type TransformPass = Box<dyn Fn(Elem) -> Option<Elem> + Send + Sync>;

/// Ordered list of passes owned by one generator.
#[derive(Default)]
pub struct Passes {
    passes: Vec<TransformPass>,
}

impl Passes {
    pub fn add(&mut self, pass: TransformPass) {
        self.passes.push(pass);
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every pass in order, stopping once a pass drops the type.
    pub fn apply_all(&self, e: Elem) -> Option<Elem> {
        self.passes.iter().try_fold(e, |e, pass| pass(e))
    }
}

impl std::fmt::Debug for Passes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Passes")
            .field("len", &self.passes.len())
            .finish()
    }
}

/// Prune every subtree whose type is one of `names`.
///
/// Struct fields of an ignored type are removed. A pointer, slice, array or
/// map of an ignored type goes with it.
pub fn ignore_typename(names: BTreeSet<String>) -> TransformPass {
    Box::new(move |e| prune(e, &names))
}

fn is_ignored(e: &Elem, names: &BTreeSet<String>) -> bool {
    if e.alias().is_some_and(|a| names.contains(a)) {
        return true;
    }
    matches!(e, Elem::Base(b) if names.contains(&b.ident_name))
}

fn prune(e: Elem, names: &BTreeSet<String>) -> Option<Elem> {
    if is_ignored(&e, names) {
        return None;
    }
    match e {
        Elem::Base(_) => Some(e),
        Elem::Ptr(mut p) => {
            p.value = Box::new(prune(*p.value, names)?);
            Some(Elem::Ptr(p))
        }
        Elem::Slice(mut s) => {
            s.els = Box::new(prune(*s.els, names)?);
            Some(Elem::Slice(s))
        }
        Elem::Array(mut a) => {
            a.els = Box::new(prune(*a.els, names)?);
            Some(Elem::Array(a))
        }
        Elem::Map(mut m) => {
            m.value = Box::new(prune(*m.value, names)?);
            Some(Elem::Map(m))
        }
        Elem::Struct(mut st) => {
            st.fields = std::mem::take(&mut st.fields)
                .into_iter()
                .filter_map(|mut field| {
                    field.elem = prune(field.elem, names)?;
                    Some(field)
                })
                .collect();
            Some(Elem::Struct(st))
        }
    }
}
