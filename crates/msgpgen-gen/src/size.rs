// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Size-estimate generator: emits `Msgsize::msgsize` returning an upper
//! bound on the encoded length of a value.
//!
//! Consecutive constant terms are chained into one `+` expression. A new
//! statement starts only after a block (loop, branch) interrupted the
//! chain. A body that never needed a second statement is emitted as a
//! single expression.

use msgpgen_wire::{array_header_len, map_header_len, string_len};
use tracing::debug;

use crate::context::Context;
use crate::elem::{Array, BaseElem, Elem, Map, Primitive, Ptr, ShimMode, Slice, Struct};
use crate::fixed::FixedSizes;
use crate::passes::{Passes, TransformPass};
use crate::traverse::{bind_receiver, next, Generator, Method, TraversalGen};
use crate::GenResult;

/// Indent of statements directly inside the generated fn body.
const BODY_DEPTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SizeState {
    /// Next term declares `s`.
    Assign,
    /// Next term starts a `s += ..` statement.
    Add,
    /// Next term chains onto the open statement with `+`.
    Expr,
}

pub struct SizeGen {
    passes: Passes,
    sizes: FixedSizes,
    ctx: Context,
    state: SizeState,
    body: String,
    depth: usize,
    /// A statement is open and still needs its `;`.
    open: bool,
    /// `s` is written after its declaration.
    mutated: bool,
}

impl SizeGen {
    /// Generator folding named types through `sizes`.
    pub fn new(sizes: FixedSizes) -> Self {
        Self {
            passes: Passes::default(),
            sizes,
            ctx: Context::default(),
            state: SizeState::Assign,
            body: String::new(),
            depth: BODY_DEPTH,
            open: false,
            mutated: false,
        }
    }

    pub fn sizes(&self) -> &FixedSizes {
        &self.sizes
    }

    fn reset(&mut self, type_name: &str) {
        self.ctx = Context::new(type_name);
        self.state = SizeState::Assign;
        self.body.clear();
        self.depth = BODY_DEPTH;
        self.open = false;
        self.mutated = false;
    }

    fn end_expr(&mut self) {
        if self.open {
            self.body.push_str(";\n");
            self.open = false;
        }
    }

    fn push_indent(&mut self) {
        for _ in 0..self.depth {
            self.body.push_str("    ");
        }
    }

    fn line(&mut self, text: &str) {
        self.end_expr();
        self.push_indent();
        self.body.push_str(text);
        self.body.push('\n');
    }

    fn open_stmt(&mut self, text: &str) {
        self.end_expr();
        self.push_indent();
        self.body.push_str(text);
        self.open = true;
    }

    fn open_block(&mut self, head: &str) {
        self.line(head);
        self.depth += 1;
    }

    fn close_block(&mut self) {
        self.end_expr();
        self.depth -= 1;
        self.line("}");
    }

    fn add_constant(&mut self, sz: &str) {
        match self.state {
            SizeState::Assign => {
                self.open_stmt(&format!("let mut s = {sz}"));
                self.state = SizeState::Expr;
            }
            SizeState::Add => {
                self.open_stmt(&format!("s += {sz}"));
                self.mutated = true;
                self.state = SizeState::Expr;
            }
            SizeState::Expr => {
                self.body.push_str(" + ");
                self.body.push_str(sz);
            }
        }
    }

    /// Declare `s` before code that can only add to it.
    fn ensure_declared(&mut self) {
        if self.state == SizeState::Assign {
            self.open_stmt("let mut s: usize = 0");
            self.mutated = true;
        }
        self.state = SizeState::Add;
    }

    fn finish_body(&mut self) -> String {
        self.end_expr();
        let body = std::mem::take(&mut self.body);
        if !self.mutated {
            let single = body
                .trim_start()
                .strip_prefix("let mut s = ")
                .and_then(|rest| rest.strip_suffix(";\n"));
            if let Some(expr) = single {
                return format!("        {expr}\n");
            }
        }
        if body.is_empty() {
            return "        0\n".to_string();
        }
        format!("{body}        s\n")
    }

    /// Size of a variable-length base reached through `v`.
    fn base_size_expr(&self, value: Primitive, v: &str) -> String {
        let rt = self.sizes.runtime();
        match value {
            Primitive::Ext => format!("{rt}::EXTENSION_PREFIX_SIZE + {v}.len()"),
            Primitive::Intf => format!("{rt}::guess_size(&{v})"),
            Primitive::Ident => format!("{v}.msgsize()"),
            Primitive::Bytes => format!("{rt}::BYTES_PREFIX_SIZE + {v}.len()"),
            Primitive::String => format!("{rt}::STRING_PREFIX_SIZE + {v}.len()"),
            _ => self.sizes.builtin(value.base_name()),
        }
    }

    fn emit_fixed_const(&self, out: &mut String, name: &str) {
        if let Some(fs) = self.sizes.get(name) {
            out.push_str(&format!(
                "impl {name} {{\n    pub const FIXED_MSGSIZE: usize = {};\n}}\n\n",
                fs.expr
            ));
        }
    }
}

impl Generator for SizeGen {
    fn method(&self) -> Method {
        Method::Size
    }

    fn add_pass(&mut self, pass: TransformPass) {
        self.passes.add(pass);
    }

    fn execute(&mut self, e: &Elem) -> GenResult<String> {
        let Some(mut e) = self.passes.apply_all(e.clone()) else {
            return Ok(String::new());
        };
        let name = e.type_name();
        let rt = self.sizes.runtime().to_string();
        debug!(type_name = %name, "generating msgsize");

        let mut out = String::new();
        self.emit_fixed_const(&mut out, &name);
        out.push_str(&format!(
            "// msgsize returns an upper bound on the encoded size of `{name}`.\n"
        ));

        if let Elem::Base(b) = &e {
            if b.is_dangling() {
                let base = &b.ident_name;
                let body = Method::Size.delegate_body(&name, base);
                out.push_str(&Method::Size.wrap_impl(&rt, &name, &body));
                return Ok(out);
            }
        }

        self.reset(&name);
        bind_receiver(&mut e);
        next(self, &mut e);
        let body = self.finish_body();
        out.push_str(&Method::Size.wrap_impl(&rt, &name, &body));
        Ok(out)
    }
}

impl TraversalGen for SizeGen {
    fn g_struct(&mut self, st: &mut Struct) {
        if let Some(fs) = self.sizes.of_struct(st) {
            self.add_constant(&fs.expr);
            return;
        }

        let n = st.exported_count();
        let as_tuple = st.as_tuple;
        if as_tuple {
            self.add_constant(&array_header_len(n).to_string());
        } else {
            self.add_constant(&map_header_len(n).to_string());
        }
        for field in st.fields.iter_mut().filter(|f| f.exported) {
            if !as_tuple {
                self.add_constant(&string_len(field.tag.len()).to_string());
            }
            self.ctx.push(field.name.clone());
            next(self, &mut field.elem);
            self.ctx.pop();
        }
    }

    fn g_ptr(&mut self, p: &mut Ptr) {
        self.ensure_declared();
        let bind = if self.sizes.of(&p.value).is_some() {
            "_".to_string()
        } else {
            self.ctx.fresh("zb")
        };
        self.open_block(&format!(
            "if let Some({bind}) = {}.as_deref() {{",
            p.common.varname
        ));
        p.value.set_varname(&bind);
        self.ctx.push(bind);
        self.state = SizeState::Add;
        next(self, &mut p.value);
        self.ctx.pop();

        self.end_expr();
        self.depth -= 1;
        self.line("} else {");
        self.depth += 1;
        self.state = SizeState::Add;
        let nil = self.sizes.builtin("nil");
        self.add_constant(&nil);
        self.close_block();
        self.state = SizeState::Add;
    }

    fn g_slice(&mut self, sl: &mut Slice) {
        self.add_constant(&self.sizes.builtin("array_header"));

        if let Some(fs) = self.sizes.of(&sl.els) {
            self.add_constant(&format!("({}.len() * ({}))", sl.common.varname, fs.expr));
            return;
        }

        self.state = SizeState::Add;
        let idx = self.ctx.push_fresh("za");
        self.open_block(&format!("for {idx} in {}.iter() {{", sl.common.varname));
        sl.els.set_varname(&idx);
        next(self, &mut sl.els);
        self.ctx.pop();
        self.close_block();
        self.state = SizeState::Add;
    }

    fn g_array(&mut self, a: &mut Array) {
        self.add_constant(&self.sizes.builtin("array_header"));

        if let Some(fs) = self.sizes.of_array_elements(a) {
            self.add_constant(&fs.expr);
            return;
        }

        self.state = SizeState::Add;
        let idx = self.ctx.push_fresh("za");
        self.open_block(&format!("for {idx} in {}.iter() {{", a.common.varname));
        a.els.set_varname(&idx);
        next(self, &mut a.els);
        self.ctx.pop();
        self.close_block();
        self.state = SizeState::Add;
    }

    fn g_map(&mut self, m: &mut Map) {
        self.add_constant(&self.sizes.builtin("map_header"));
        self.state = SizeState::Add;

        let var = m.common.varname.clone();
        self.open_block(&format!("if !{var}.is_empty() {{"));
        let key = self.ctx.push_fresh("za");
        let val = if self.sizes.of(&m.value).is_some() {
            "_".to_string()
        } else {
            self.ctx.fresh("za")
        };
        self.open_block(&format!("for ({key}, {val}) in {var}.iter() {{"));
        m.key.set_varname(&key);
        m.value.set_varname(&val);
        next(self, &mut m.key);
        next(self, &mut m.value);
        self.ctx.pop();
        self.close_block();
        self.close_block();
        self.state = SizeState::Add;
    }

    fn g_base(&mut self, b: &mut BaseElem) {
        if let Some(fs) = self.sizes.of_base(b) {
            self.add_constant(&fs.expr);
            return;
        }

        let rt = self.sizes.runtime().to_string();
        let convert_fn = b
            .shim
            .as_ref()
            .filter(|shim| shim.mode == ShimMode::Convert)
            .and_then(|shim| shim.to_base.clone());
        match convert_fn {
            Some(to_base) => {
                self.ensure_declared();
                let tmp = self.ctx.fresh("zb");
                self.line(&format!(
                    "let {tmp}: {} = {to_base}(&{});",
                    b.base_type(&rt),
                    b.common.varname
                ));
                self.state = SizeState::Add;
                let expr = self.base_size_expr(b.value, &tmp);
                self.add_constant(&expr);
            }
            None => {
                let expr = self.base_size_expr(b.value, &b.base_view(&rt));
                self.add_constant(&expr);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elem::{Shim, StructField};
    use crate::fixed::FixedSize;

    fn gen(e: &Elem) -> String {
        SizeGen::new(FixedSizes::new("msgpgen_wire"))
            .execute(e)
            .expect("size generation")
    }

    #[test]
    fn test_fixed_struct_is_single_expression() {
        let point = Elem::structure(vec![
            StructField::new("x", Elem::base("f64")),
            StructField::new("y", Elem::base("f64")),
        ])
        .named("Point");
        let code = gen(&point);
        assert!(code.contains("impl msgpgen_wire::Msgsize for Point {"));
        assert!(code.contains(
            "        5 + msgpgen_wire::FLOAT64_SIZE + msgpgen_wire::FLOAT64_SIZE\n    }"
        ));
        assert!(!code.contains("let mut s"));
        assert!(!code.contains("if "));
        assert!(!code.contains("for "));
    }

    #[test]
    fn test_pointer_has_both_arms() {
        let node = Elem::structure(vec![
            StructField::new("next", Elem::ptr(Elem::base("Node"))),
            StructField::new("name", Elem::base("String")),
        ])
        .named("Node");
        let code = gen(&node);
        let expected = "        let mut s = 1 + 5;\n\
                        \x20       if let Some(zb0001) = self.next.as_deref() {\n\
                        \x20           s += zb0001.msgsize();\n\
                        \x20       } else {\n\
                        \x20           s += msgpgen_wire::NIL_SIZE;\n\
                        \x20       }\n\
                        \x20       s += 5 + msgpgen_wire::STRING_PREFIX_SIZE + self.name.len();\n\
                        \x20       s\n";
        assert!(code.contains(expected), "{code}");
    }

    #[test]
    fn test_pointer_at_root_declares_accumulator() {
        let maybe = Elem::ptr(Elem::base("u32")).named("MaybeId");
        let code = gen(&maybe);
        assert!(code.contains("let mut s: usize = 0;"));
        assert!(code.contains("if let Some(_) = self.0.as_deref() {"));
        assert!(code.contains("s += msgpgen_wire::UINT32_SIZE;"));
    }

    #[test]
    fn test_nested_loops_use_distinct_idents() {
        let grid = Elem::slice(Elem::slice(Elem::base("String"))).named("Grid");
        let code = gen(&grid);
        assert!(code.contains("for za0001 in self.0.iter() {"));
        assert!(code.contains("for za0002 in za0001.iter() {"));
        assert!(code.contains("s += msgpgen_wire::STRING_PREFIX_SIZE + za0002.len();"));
    }

    #[test]
    fn test_slice_of_fixed_elements_folds() {
        let samples = Elem::slice(Elem::base("f32")).named("Samples");
        let code = gen(&samples);
        assert!(code.contains(
            "        msgpgen_wire::ARRAY_HEADER_SIZE + (self.0.len() * (msgpgen_wire::FLOAT32_SIZE))\n"
        ));
        assert!(!code.contains("for "));
    }

    #[test]
    fn test_array_folds_to_count_times_element() {
        let digest = Elem::array("32", Elem::base("u8")).named("Digest");
        let code = gen(&digest);
        assert!(code.contains(
            "msgpgen_wire::ARRAY_HEADER_SIZE + (32 * (msgpgen_wire::UINT8_SIZE))"
        ));

        let names = Elem::array("4", Elem::base("String")).named("Names");
        let code = gen(&names);
        assert!(code.contains("for za0001 in self.0.iter() {"));
    }

    #[test]
    fn test_map_is_guarded_by_non_empty() {
        let labels = Elem::map(Elem::base("String")).named("Labels");
        let code = gen(&labels);
        let expected = "        let mut s = msgpgen_wire::MAP_HEADER_SIZE;\n\
                        \x20       if !self.0.is_empty() {\n\
                        \x20           for (za0001, za0002) in self.0.iter() {\n\
                        \x20               s += msgpgen_wire::STRING_PREFIX_SIZE + za0001.len() + msgpgen_wire::STRING_PREFIX_SIZE + za0002.len();\n\
                        \x20           }\n\
                        \x20       }\n\
                        \x20       s\n";
        assert!(code.contains(expected), "{code}");

        let counters = Elem::map(Elem::base("u64")).named("Counters");
        assert!(gen(&counters).contains("for (za0001, _) in self.0.iter() {"));
    }

    #[test]
    fn test_tuple_struct_skips_tags_and_private_fields() {
        let mut rec = Elem::structure(vec![
            StructField::new("id", Elem::base("u64")),
            StructField::new("cache", Elem::base("String")).private(),
            StructField::new("body", Elem::base("Vec<u8>")),
        ])
        .named("Record");
        if let Elem::Struct(st) = &mut rec {
            st.as_tuple = true;
        }
        let code = gen(&rec);
        assert!(code.contains(
            "        1 + msgpgen_wire::UINT64_SIZE + msgpgen_wire::BYTES_PREFIX_SIZE + self.body.len()\n"
        ));
        assert!(!code.contains("cache"));
    }

    #[test]
    fn test_map_mode_counts_tag_strings() {
        let rec = Elem::structure(vec![
            StructField::new("id", Elem::base("u64")).with_tag("identifier"),
            StructField::new("body", Elem::base("String")),
        ])
        .named("Record");
        let code = gen(&rec);
        // fixmap(2) + "identifier" (11) + "body" (5)
        assert!(code.contains(
            "        1 + 11 + msgpgen_wire::UINT64_SIZE + 5 + msgpgen_wire::STRING_PREFIX_SIZE + self.body.len()\n"
        ));
    }

    #[test]
    fn test_variable_base_kinds() {
        let bag = Elem::structure(vec![
            StructField::new("any", Elem::base("Value")),
            StructField::new("ext", Elem::base("RawExtension")),
            StructField::new("child", Elem::base("Child")),
        ])
        .named("Bag");
        let code = gen(&bag);
        assert!(code.contains("msgpgen_wire::guess_size(&self.any)"));
        assert!(code.contains("msgpgen_wire::EXTENSION_PREFIX_SIZE + self.ext.len()"));
        assert!(code.contains("self.child.msgsize()"));
    }

    #[test]
    fn test_shim_cast_and_convert() {
        let mut cast = BaseElem::new("Label");
        cast.apply_shim(Shim {
            base: "String".into(),
            mode: ShimMode::Cast,
            to_base: None,
            from_base: None,
            needs_ref: false,
        });
        let mut convert = BaseElem::new("Ipv4");
        convert.apply_shim(Shim {
            base: "String".into(),
            mode: ShimMode::Convert,
            to_base: Some("ipv4_to_string".into()),
            from_base: Some("string_to_ipv4".into()),
            needs_ref: false,
        });
        let host = Elem::structure(vec![
            StructField::new("label", Elem::Base(cast)),
            StructField::new("addr", Elem::Base(convert)),
        ])
        .named("Host");
        let code = gen(&host);
        assert!(code.contains(
            "msgpgen_wire::STRING_PREFIX_SIZE + (*AsRef::<String>::as_ref(&self.label)).len()"
        ));
        assert!(code.contains("let zb0001: String = ipv4_to_string(&self.addr);"));
        assert!(code.contains("s += msgpgen_wire::STRING_PREFIX_SIZE + zb0001.len();"));
    }

    #[test]
    fn test_dangling_type_delegates_to_base() {
        let alias = Elem::base("Inner").named("Outer");
        let code = gen(&alias);
        assert!(code.contains("let base: &Inner = &self.0;"));
        assert!(code.contains("base.msgsize()"));
    }

    #[test]
    fn test_named_fixed_types_compose() {
        let mut sizes = FixedSizes::new("msgpgen_wire");
        sizes.insert("Point", FixedSize::new("23", Some(23)));
        let seg = Elem::structure(vec![
            StructField::new("a", Elem::base("Point")),
            StructField::new("b", Elem::base("Point")),
        ])
        .named("Segment");
        let code = SizeGen::new(sizes).execute(&seg).expect("size generation");
        assert!(code.contains("5 + Point::FIXED_MSGSIZE + Point::FIXED_MSGSIZE"));

        let mut sizes = FixedSizes::new("msgpgen_wire");
        sizes.insert("Point", FixedSize::new("23", Some(23)));
        let point = Elem::structure(Vec::new()).named("Point");
        let code = SizeGen::new(sizes).execute(&point).expect("size generation");
        assert!(code.contains("impl Point {\n    pub const FIXED_MSGSIZE: usize = 23;\n}"));
    }
}
