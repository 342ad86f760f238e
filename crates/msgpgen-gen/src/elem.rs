// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type graph: the shape of one value, as seen by the generators.
//!
//! Every node carries a variable name, the Rust expression that reaches the
//! runtime value at that position (`self.0`, `self.count`, `za0001`, ...).
//! Generators bind child names while they descend, so the names stored in a
//! freshly built graph only matter at the root.

use std::fmt;

use crate::context::Context;

/// Primitive kinds understood by the wire codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Byte,
    Float32,
    Float64,
    Complex64,
    Complex128,
    Bool,
    String,
    Bytes,
    Time,
    /// Dynamically typed value (`msgpgen_wire::Value`).
    Intf,
    /// Extension payload (`msgpgen_wire::RawExtension`).
    Ext,
    /// Named type implementing the generated contract itself.
    Ident,
}

impl Primitive {
    /// Resolve a Rust type name. Unknown names are opaque named types.
    pub fn from_rust(name: &str) -> Self {
        match name.trim() {
            "isize" => Primitive::Int,
            "i8" => Primitive::Int8,
            "i16" => Primitive::Int16,
            "i32" => Primitive::Int32,
            "i64" => Primitive::Int64,
            "usize" => Primitive::Uint,
            "u8" => Primitive::Uint8,
            "byte" => Primitive::Byte,
            "u16" => Primitive::Uint16,
            "u32" => Primitive::Uint32,
            "u64" => Primitive::Uint64,
            "f32" => Primitive::Float32,
            "f64" => Primitive::Float64,
            "Complex64" => Primitive::Complex64,
            "Complex128" => Primitive::Complex128,
            "bool" => Primitive::Bool,
            "String" => Primitive::String,
            "Vec<u8>" | "bytes" => Primitive::Bytes,
            "DateTime<Utc>" | "Time" => Primitive::Time,
            "Value" => Primitive::Intf,
            "RawExtension" => Primitive::Ext,
            _ => Primitive::Ident,
        }
    }

    /// Name selecting the codec's `<NAME>_SIZE` constant.
    pub fn base_name(self) -> &'static str {
        match self {
            Primitive::Int => "int",
            Primitive::Int8 => "int8",
            Primitive::Int16 => "int16",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Uint => "uint",
            Primitive::Uint8 => "uint8",
            Primitive::Uint16 => "uint16",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Byte => "byte",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::Complex64 => "complex64",
            Primitive::Complex128 => "complex128",
            Primitive::Bool => "bool",
            Primitive::String => "string",
            Primitive::Bytes => "bytes",
            Primitive::Time => "time",
            Primitive::Intf => "intf",
            Primitive::Ext => "ext",
            Primitive::Ident => "ident",
        }
    }

    /// Rust spelling of the kind. `None` for named types.
    pub fn rust_type(self, runtime: &str) -> Option<String> {
        let name = match self {
            Primitive::Int => "isize",
            Primitive::Int8 => "i8",
            Primitive::Int16 => "i16",
            Primitive::Int32 => "i32",
            Primitive::Int64 => "i64",
            Primitive::Uint => "usize",
            Primitive::Uint8 | Primitive::Byte => "u8",
            Primitive::Uint16 => "u16",
            Primitive::Uint32 => "u32",
            Primitive::Uint64 => "u64",
            Primitive::Float32 => "f32",
            Primitive::Float64 => "f64",
            Primitive::Bool => "bool",
            Primitive::String => "String",
            Primitive::Bytes => "Vec<u8>",
            Primitive::Time => "chrono::DateTime<chrono::Utc>",
            Primitive::Complex64 => return Some(format!("{runtime}::Complex64")),
            Primitive::Complex128 => return Some(format!("{runtime}::Complex128")),
            Primitive::Intf => return Some(format!("{runtime}::Value")),
            Primitive::Ext => return Some(format!("{runtime}::RawExtension")),
            Primitive::Ident => return None,
        };
        Some(name.to_string())
    }

    /// Whether every value of this kind has the same wire size.
    pub fn is_fixed(self) -> bool {
        !matches!(
            self,
            Primitive::Intf
                | Primitive::Ext
                | Primitive::Ident
                | Primitive::Bytes
                | Primitive::String
        )
    }

    /// Wire size of a fixed kind, matching the codec constants.
    pub fn wire_size(self) -> Option<usize> {
        use msgpgen_wire as w;
        let n = match self {
            Primitive::Int => w::INT_SIZE,
            Primitive::Int8 => w::INT8_SIZE,
            Primitive::Int16 => w::INT16_SIZE,
            Primitive::Int32 => w::INT32_SIZE,
            Primitive::Int64 => w::INT64_SIZE,
            Primitive::Uint => w::UINT_SIZE,
            Primitive::Uint8 => w::UINT8_SIZE,
            Primitive::Uint16 => w::UINT16_SIZE,
            Primitive::Uint32 => w::UINT32_SIZE,
            Primitive::Uint64 => w::UINT64_SIZE,
            Primitive::Byte => w::BYTE_SIZE,
            Primitive::Float32 => w::FLOAT32_SIZE,
            Primitive::Float64 => w::FLOAT64_SIZE,
            Primitive::Complex64 => w::COMPLEX64_SIZE,
            Primitive::Complex128 => w::COMPLEX128_SIZE,
            Primitive::Bool => w::BOOL_SIZE,
            Primitive::Time => w::TIME_SIZE,
            _ => return None,
        };
        Some(n)
    }

    /// Zero test for a value of this kind reached through `v`.
    ///
    /// Empty when no static test exists.
    pub fn zero_expr(self, v: &str) -> String {
        match self {
            Primitive::Int
            | Primitive::Int8
            | Primitive::Int16
            | Primitive::Int32
            | Primitive::Int64
            | Primitive::Uint
            | Primitive::Uint8
            | Primitive::Uint16
            | Primitive::Uint32
            | Primitive::Uint64
            | Primitive::Byte => format!("{v} == 0"),
            Primitive::Float32 | Primitive::Float64 => format!("{v} == 0.0"),
            Primitive::Bool => format!("!{v}"),
            Primitive::String | Primitive::Bytes => format!("{v}.is_empty()"),
            Primitive::Complex64 | Primitive::Complex128 => format!("{v}.is_zero()"),
            Primitive::Time => {
                format!("{v}.timestamp() == 0 && {v}.timestamp_subsec_nanos() == 0")
            }
            Primitive::Ident | Primitive::Intf | Primitive::Ext => format!("{v}.msg_is_zero()"),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.base_name())
    }
}

/// How a shimmed type reaches its base representation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShimMode {
    /// Borrow the base view through `AsRef<Base>`, no copy.
    #[default]
    Cast,
    /// Materialize a base value with the `to_base` function.
    Convert,
}

impl fmt::Display for ShimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShimMode::Cast => f.write_str("cast"),
            ShimMode::Convert => f.write_str("convert"),
        }
    }
}

/// Shim binding of an alias type onto a base representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shim {
    /// Rust spelling of the base representation.
    pub base: String,
    pub mode: ShimMode,
    pub to_base: Option<String>,
    pub from_base: Option<String>,
    /// Directive named the alias as `*Alias`.
    pub needs_ref: bool,
}

/// State every node carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Common {
    pub varname: String,
    /// Declared type name when this node is a named type.
    pub alias: Option<String>,
    pub alloc_bound: Option<String>,
    /// Post-decode callbacks, in declaration order.
    pub callbacks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseElem {
    pub common: Common,
    pub value: Primitive,
    /// Rust type of the value at this position.
    pub ident_name: String,
    pub shim: Option<Shim>,
}

impl BaseElem {
    /// Base node for a Rust type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        let ident_name = type_name.into();
        Self {
            common: Common::default(),
            value: Primitive::from_rust(&ident_name),
            ident_name,
            shim: None,
        }
    }

    /// Bind this node onto a base representation.
    pub fn apply_shim(&mut self, shim: Shim) {
        self.value = Primitive::from_rust(&shim.base);
        self.shim = Some(shim);
    }

    pub fn is_shimmed(&self) -> bool {
        self.shim.is_some()
    }

    /// Named type whose generated methods this node delegates to.
    pub fn ident(&self) -> &str {
        match &self.shim {
            Some(shim) => &shim.base,
            None => &self.ident_name,
        }
    }

    /// Rust spelling of the representation the codec sees.
    pub fn base_type(&self, runtime: &str) -> String {
        self.value
            .rust_type(runtime)
            .unwrap_or_else(|| self.ident().to_string())
    }

    /// Expression viewing the value as its base representation.
    ///
    /// Convert-mode shims call `to_base` and yield an owned value.
    pub fn base_view(&self, runtime: &str) -> String {
        let var = &self.common.varname;
        match &self.shim {
            None => var.clone(),
            Some(shim) => match (shim.mode, &shim.to_base) {
                (ShimMode::Convert, Some(to)) => format!("{to}(&{var})"),
                _ => format!("(*AsRef::<{}>::as_ref(&{var}))", self.base_type(runtime)),
            },
        }
    }

    /// Named alias over another named type with no shim.
    pub fn is_dangling(&self) -> bool {
        self.value == Primitive::Ident && self.shim.is_none() && self.common.alias.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ptr {
    pub common: Common,
    pub value: Box<Elem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice {
    pub common: Common,
    pub els: Box<Elem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Array {
    pub common: Common,
    /// Element count: a literal or a constant path.
    pub size: String,
    pub els: Box<Elem>,
}

impl Array {
    /// Element count when `size` is a literal.
    pub fn len(&self) -> Option<usize> {
        self.size.trim().replace('_', "").parse().ok()
    }
}

/// Map with string keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Map {
    pub common: Common,
    pub key: Box<Elem>,
    pub value: Box<Elem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    /// Key written on the wire in map mode.
    pub tag: String,
    pub exported: bool,
    pub elem: Elem,
}

impl StructField {
    pub fn new(name: impl Into<String>, elem: Elem) -> Self {
        let name = name.into();
        Self {
            tag: name.clone(),
            name,
            exported: true,
            elem,
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.exported = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Struct {
    pub common: Common,
    pub fields: Vec<StructField>,
    /// Positional (array) encoding instead of tag/value pairs.
    pub as_tuple: bool,
}

impl Struct {
    pub fn exported(&self) -> impl Iterator<Item = &StructField> {
        self.fields.iter().filter(|f| f.exported)
    }

    pub fn exported_count(&self) -> u32 {
        self.exported().count() as u32
    }
}

/// A node of the type graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Elem {
    Base(BaseElem),
    Ptr(Ptr),
    Slice(Slice),
    Array(Array),
    Map(Map),
    Struct(Struct),
}

impl Elem {
    pub fn base(type_name: impl Into<String>) -> Self {
        Elem::Base(BaseElem::new(type_name))
    }

    pub fn ptr(value: Elem) -> Self {
        Elem::Ptr(Ptr {
            common: Common::default(),
            value: Box::new(value),
        })
    }

    pub fn slice(els: Elem) -> Self {
        Elem::Slice(Slice {
            common: Common::default(),
            els: Box::new(els),
        })
    }

    pub fn array(size: impl Into<String>, els: Elem) -> Self {
        Elem::Array(Array {
            common: Common::default(),
            size: size.into(),
            els: Box::new(els),
        })
    }

    /// String-keyed map.
    pub fn map(value: Elem) -> Self {
        Elem::Map(Map {
            common: Common::default(),
            key: Box::new(Elem::base("String")),
            value: Box::new(value),
        })
    }

    pub fn structure(fields: Vec<StructField>) -> Self {
        Elem::Struct(Struct {
            common: Common::default(),
            fields,
            as_tuple: false,
        })
    }

    /// Name this node as a declared type.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.common_mut().alias = Some(name.into());
        self
    }

    pub fn common(&self) -> &Common {
        match self {
            Elem::Base(e) => &e.common,
            Elem::Ptr(e) => &e.common,
            Elem::Slice(e) => &e.common,
            Elem::Array(e) => &e.common,
            Elem::Map(e) => &e.common,
            Elem::Struct(e) => &e.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut Common {
        match self {
            Elem::Base(e) => &mut e.common,
            Elem::Ptr(e) => &mut e.common,
            Elem::Slice(e) => &mut e.common,
            Elem::Array(e) => &mut e.common,
            Elem::Map(e) => &mut e.common,
            Elem::Struct(e) => &mut e.common,
        }
    }

    pub fn varname(&self) -> &str {
        &self.common().varname
    }

    /// Bind the variable name. Struct fields follow as `name.field`.
    pub fn set_varname(&mut self, name: &str) {
        self.common_mut().varname = name.to_string();
        if let Elem::Struct(st) = self {
            for field in &mut st.fields {
                field.elem.set_varname(&format!("{name}.{}", field.name));
            }
        }
    }

    pub fn alias(&self) -> Option<&str> {
        self.common().alias.as_deref()
    }

    /// Rust type name of the node.
    pub fn type_name(&self) -> String {
        if let Some(alias) = self.alias() {
            return alias.to_string();
        }
        match self {
            Elem::Base(b) => b.ident_name.clone(),
            Elem::Ptr(p) => format!("Option<Box<{}>>", p.value.type_name()),
            Elem::Slice(s) => format!("Vec<{}>", s.els.type_name()),
            Elem::Array(a) => format!("[{}; {}]", a.els.type_name(), a.size),
            Elem::Map(m) => format!("HashMap<String, {}>", m.value.type_name()),
            Elem::Struct(_) => "struct".to_string(),
        }
    }

    /// Codec base name: the primitive for base nodes, the variant otherwise.
    pub fn base_name(&self) -> &'static str {
        match self {
            Elem::Base(b) => b.value.base_name(),
            Elem::Ptr(_) => "ptr",
            Elem::Slice(_) => "slice",
            Elem::Array(_) => "array",
            Elem::Map(_) => "map",
            Elem::Struct(_) => "struct",
        }
    }

    pub fn is_dangling(&self) -> bool {
        matches!(self, Elem::Base(b) if b.is_dangling())
    }

    /// Expression that is true when the value equals its zero value.
    ///
    /// Empty when no static test can be derived, which only happens for a
    /// struct with nothing exported. Fields without a test are left out of
    /// the conjunction.
    pub fn zero_expr(&self, runtime: &str) -> String {
        self.zero_expr_in(runtime, &mut Context::new(self.type_name()))
    }

    fn zero_expr_in(&self, runtime: &str, ctx: &mut Context) -> String {
        match self {
            Elem::Base(b) => b.value.zero_expr(&b.base_view(runtime)),
            Elem::Ptr(p) => format!("{}.is_none()", p.common.varname),
            Elem::Slice(s) => format!("{}.is_empty()", s.common.varname),
            Elem::Map(m) => format!("{}.is_empty()", m.common.varname),
            Elem::Array(a) => {
                let idx = ctx.push_fresh("za");
                let mut el = a.els.as_ref().clone();
                el.set_varname(&format!("(*{idx})"));
                let inner = el.zero_expr_in(runtime, ctx);
                ctx.pop();
                if inner.is_empty() {
                    String::new()
                } else {
                    format!("{}.iter().all(|{idx}| {inner})", a.common.varname)
                }
            }
            Elem::Struct(st) => {
                let mut parts = Vec::new();
                for field in st.exported() {
                    ctx.push(field.name.clone());
                    let expr = field.elem.zero_expr_in(runtime, ctx);
                    ctx.pop();
                    if !expr.is_empty() {
                        parts.push(expr);
                    }
                }
                parts.join(" && ")
            }
        }
    }

    /// Children of container nodes, struct fields included.
    pub fn children_mut(&mut self) -> Vec<&mut Elem> {
        match self {
            Elem::Base(_) => Vec::new(),
            Elem::Ptr(p) => vec![p.value.as_mut()],
            Elem::Slice(s) => vec![s.els.as_mut()],
            Elem::Array(a) => vec![a.els.as_mut()],
            Elem::Map(m) => vec![m.key.as_mut(), m.value.as_mut()],
            Elem::Struct(st) => st.fields.iter_mut().map(|f| &mut f.elem).collect(),
        }
    }

    /// Visit this node and every descendant, parents first.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Elem)) {
        f(self);
        for child in self.children_mut() {
            child.walk_mut(f);
        }
    }
}
