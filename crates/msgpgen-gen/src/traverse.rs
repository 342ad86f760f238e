// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared traversal framework.
//!
//! A generator implements one handler per type-graph variant and `next`
//! dispatches to it. Handlers receive the node mutably so they can bind
//! their children's variable names before descending; generators always
//! traverse a private copy, never the caller's graph.

use std::fmt;

use crate::elem::{Array, BaseElem, Elem, Map, Ptr, Slice, Struct};
use crate::passes::TransformPass;
use crate::GenResult;

/// Capability a generator emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Method {
    /// `Msgsize::msgsize`, an upper bound on the encoded size.
    Size,
    /// `MsgIsZero::msg_is_zero`.
    IsZero,
}

impl Method {
    pub const ALL: [Method; 2] = [Method::Size, Method::IsZero];

    /// Runtime trait implemented by the generated code.
    pub fn trait_name(self) -> &'static str {
        match self {
            Method::Size => "Msgsize",
            Method::IsZero => "MsgIsZero",
        }
    }

    pub fn fn_name(self) -> &'static str {
        match self {
            Method::Size => "msgsize",
            Method::IsZero => "msg_is_zero",
        }
    }

    fn return_type(self) -> &'static str {
        match self {
            Method::Size => "usize",
            Method::IsZero => "bool",
        }
    }

    /// Trait impl for `type_name` around an indented method body.
    pub fn wrap_impl(self, runtime: &str, type_name: &str, body: &str) -> String {
        format!(
            "impl {runtime}::{} for {type_name} {{\n    fn {}(&self) -> {} {{\n{body}    }}\n}}\n",
            self.trait_name(),
            self.fn_name(),
            self.return_type(),
        )
    }

    /// Body of a dangling type: reinterpret as the wrapped base and delegate.
    pub fn delegate_body(self, type_name: &str, base: &str) -> String {
        format!(
            "        // `{type_name}` wraps `{base}` and shares its wire representation.\n        \
             let base: &{base} = &self.0;\n        base.{}()\n",
            self.fn_name()
        )
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Size => f.write_str("size"),
            Method::IsZero => f.write_str("iszero"),
        }
    }
}

/// A per-type code emitter.
pub trait Generator {
    fn method(&self) -> Method;

    /// Register a transform pass run before every `execute`.
    fn add_pass(&mut self, pass: TransformPass);

    /// Emit the implementation for one named type.
    ///
    /// Returns an empty string when a pass dropped the type.
    fn execute(&mut self, e: &Elem) -> GenResult<String>;
}

/// Variant handlers for generators that walk the graph.
pub trait TraversalGen {
    fn g_struct(&mut self, s: &mut Struct);
    fn g_ptr(&mut self, p: &mut Ptr);
    fn g_slice(&mut self, s: &mut Slice);
    fn g_array(&mut self, a: &mut Array);
    fn g_map(&mut self, m: &mut Map);
    fn g_base(&mut self, b: &mut BaseElem);
}

/// Dispatch `e` to the matching handler of `g`.
pub fn next<G: TraversalGen + ?Sized>(g: &mut G, e: &mut Elem) {
    match e {
        Elem::Struct(s) => g.g_struct(s),
        Elem::Ptr(p) => g.g_ptr(p),
        Elem::Slice(s) => g.g_slice(s),
        Elem::Array(a) => g.g_array(a),
        Elem::Map(m) => g.g_map(m),
        Elem::Base(b) => g.g_base(b),
    }
}

/// Receiver path of a named type: fields hang off `self`, newtypes wrap
/// their representation in `self.0`.
pub fn bind_receiver(e: &mut Elem) {
    match e {
        Elem::Struct(_) => e.set_varname("self"),
        _ => e.set_varname("self.0"),
    }
}
