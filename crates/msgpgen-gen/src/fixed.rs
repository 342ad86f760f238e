// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fixed-size folding.
//!
//! A node folds when its wire size does not depend on the data. The closed
//! form is kept both as Rust source (for generated code) and, where every
//! term is a literal, as a byte count.

use std::collections::BTreeMap;

use msgpgen_wire::{array_header_len, map_header_len, string_len, ARRAY_HEADER_SIZE};

use crate::elem::{Array, BaseElem, Elem, Primitive, Struct};

/// Closed-form size of a data-independent node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSize {
    pub expr: String,
    /// Value of `expr` when it only involves literals and codec constants.
    pub bytes: Option<usize>,
}

impl FixedSize {
    pub fn new(expr: impl Into<String>, bytes: Option<usize>) -> Self {
        Self {
            expr: expr.into(),
            bytes,
        }
    }
}

/// Known fixed sizes of named types, plus the runtime path used to spell
/// codec constants.
#[derive(Debug, Clone)]
pub struct FixedSizes {
    runtime: String,
    known: BTreeMap<String, FixedSize>,
}

impl FixedSizes {
    pub fn new(runtime: impl Into<String>) -> Self {
        Self {
            runtime: runtime.into(),
            known: BTreeMap::new(),
        }
    }

    pub fn runtime(&self) -> &str {
        &self.runtime
    }

    /// Record a named type. Later references fold to `Name::FIXED_MSGSIZE`.
    pub fn insert(&mut self, name: impl Into<String>, size: FixedSize) {
        self.known.insert(name.into(), size);
    }

    /// Closed form recorded for a named type.
    pub fn get(&self, name: &str) -> Option<&FixedSize> {
        self.known.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.known.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FixedSize)> {
        self.known.iter()
    }

    /// Path of the codec constant for a base name, e.g. `msgpgen_wire::INT64_SIZE`.
    pub fn builtin(&self, base_name: &str) -> String {
        format!("{}::{}_SIZE", self.runtime, base_name.to_ascii_uppercase())
    }

    /// Fold `e` if its size is data-independent.
    ///
    /// Pointers, slices and maps never fold.
    pub fn of(&self, e: &Elem) -> Option<FixedSize> {
        match e {
            Elem::Base(b) => self.of_base(b),
            Elem::Array(a) => self.of_array(a),
            Elem::Struct(st) => self.of_struct(st),
            Elem::Ptr(_) | Elem::Slice(_) | Elem::Map(_) => None,
        }
    }

    pub fn of_base(&self, b: &BaseElem) -> Option<FixedSize> {
        if b.value == Primitive::Ident {
            let name = b.ident();
            return self
                .get(name)
                .map(|fs| FixedSize::new(format!("{name}::FIXED_MSGSIZE"), fs.bytes));
        }
        if !b.value.is_fixed() {
            return None;
        }
        Some(FixedSize::new(
            self.builtin(b.value.base_name()),
            b.value.wire_size(),
        ))
    }

    /// Element contribution only: `(N * (elem))`, header excluded.
    pub fn of_array_elements(&self, a: &Array) -> Option<FixedSize> {
        let els = self.of(&a.els)?;
        let bytes = match (a.len(), els.bytes) {
            (Some(n), Some(each)) => n.checked_mul(each),
            _ => None,
        };
        Some(FixedSize::new(format!("({} * ({}))", a.size, els.expr), bytes))
    }

    /// Header plus elements, for composition inside an enclosing struct.
    pub fn of_array(&self, a: &Array) -> Option<FixedSize> {
        let els = self.of_array_elements(a)?;
        Some(FixedSize::new(
            format!("{} + {}", self.builtin("array_header"), els.expr),
            els.bytes.map(|b| b + ARRAY_HEADER_SIZE),
        ))
    }

    /// Header, tag strings (map mode only) and every exported field.
    pub fn of_struct(&self, st: &Struct) -> Option<FixedSize> {
        let n = st.exported_count();
        let mut hdrlen = if st.as_tuple {
            array_header_len(n)
        } else {
            map_header_len(n)
        };
        let mut parts = Vec::new();
        let mut bytes = Some(0usize);
        for field in st.exported() {
            let fs = self.of(&field.elem)?;
            if !st.as_tuple {
                hdrlen += string_len(field.tag.len());
            }
            bytes = bytes.zip(fs.bytes).map(|(a, b)| a + b);
            parts.push(fs.expr);
        }
        let expr = if parts.is_empty() {
            hdrlen.to_string()
        } else {
            format!("{hdrlen} + {}", parts.join(" + "))
        };
        Some(FixedSize::new(expr, bytes.map(|b| b + hdrlen)))
    }
}
