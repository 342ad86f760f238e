// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end generation from schemas and directive lines.

use msgpgen_gen::{
    fixed_sizes, generate, generate_schema, generate_to, Elem, GenOptions, Method, Schema,
    StructField, TypeSet, ZeroFallback,
};
use msgpgen_wire::*;

const TELEMETRY: &str = r#"
directives:
  - "//msgp:shim Celsius as:f64 mode:cast"
  - "//msgp:ignore Scratch"
types:
  - name: Sample
    type:
      struct:
        - { name: id, type: u32 }
        - { name: temp, type: Celsius }
        - { name: ok, type: bool }
  - name: Batch
    doc: |
      //msgp:allocbound Batch 4096
      //msgp:postunmarshalcheck Batch validate
    type:
      struct:
        - { name: source, type: String }
        - { name: samples, type: { slice: Sample } }
        - { name: previous, type: { pointer: Batch } }
        - { name: scratch, type: Scratch }
        - { name: labels, type: { map: String } }
  - name: Scratch
    type: { slice: u8 }
"#;

#[test]
fn telemetry_schema_generates_both_methods() {
    let schema = Schema::from_yaml(TELEMETRY).expect("schema parses");
    let out = generate_schema(&schema, &GenOptions::default()).expect("generation");

    assert!(out.report.is_clean(), "{:?}", out.report.errors);
    assert_eq!(out.types, vec!["Sample", "Batch"]);
    assert!(out.code.starts_with("// Code generated by msgpgen. DO NOT EDIT."));

    // Sample folds: fixmap(3) + tags "id"(3) "temp"(5) "ok"(3) = 12 bytes of keys.
    assert!(out.code.contains("impl Sample {\n    pub const FIXED_MSGSIZE: usize = 12 + msgpgen_wire::UINT32_SIZE + msgpgen_wire::FLOAT64_SIZE + msgpgen_wire::BOOL_SIZE;\n}"));
    assert!(out.code.contains("impl msgpgen_wire::Msgsize for Sample {"));
    assert!(out.code.contains("impl msgpgen_wire::MsgIsZero for Sample {"));
    assert!(out
        .code
        .contains("self.id == 0 && (*AsRef::<f64>::as_ref(&self.temp)) == 0.0 && !self.ok"));

    // Batch: samples fold through the table, the ignored field is gone.
    assert!(out
        .code
        .contains("(self.samples.len() * (Sample::FIXED_MSGSIZE))"));
    assert!(out.code.contains("if let Some(zb0001) = self.previous.as_deref() {"));
    assert!(!out.code.contains("scratch"));
    assert!(!out.code.contains("impl msgpgen_wire::Msgsize for Scratch"));
    assert!(out.code.contains("if !self.labels.is_empty() {"));
}

#[test]
fn configuration_errors_exclude_only_their_type() {
    let types: TypeSet = [
        Elem::structure(vec![StructField::new("v", Elem::base("i64"))]).named("Good"),
        Elem::structure(vec![StructField::new("v", Elem::base("i64"))]).named("Bad"),
    ]
    .into_iter()
    .collect();
    let lines = [
        "//msgp:shim Bad as:i64",
        "//msgp:tuple Missing",
        "//msgp:postunmarshalcheck Nobody hook",
    ];
    let out = generate(types, &lines, &GenOptions::default()).expect("generation");

    assert_eq!(out.types, vec!["Good"]);
    assert_eq!(out.report.errors.len(), 2);
    let msg = out.report.errors[0].error.to_string();
    assert!(msg.contains("shim"), "{msg}");
    assert!(msg.contains("3 or 4"), "{msg}");
    assert!(msg.contains("found 2"), "{msg}");
    assert!(out.report.errors[1].error.to_string().contains("Nobody"));
    assert_eq!(out.report.warnings, vec!["tuple: cannot find type Missing"]);
    assert!(out.report.check().is_err());
}

#[test]
fn method_selection_and_fallback() {
    let types: TypeSet = [
        Elem::structure(vec![StructField::new("cache", Elem::base("Value")).private()])
            .named("Scratch"),
    ]
    .into_iter()
    .collect();
    let opts = GenOptions::default()
        .with_methods(vec![Method::IsZero])
        .with_zero_fallback(ZeroFallback::AssumeNonZero)
        .with_runtime("wire");
    let mut buf = Vec::new();
    let report = generate_to(&mut buf, types, &[] as &[&str], &opts).expect("generation");
    assert!(report.is_clean());

    let code = String::from_utf8(buf).expect("utf8");
    assert!(code.contains("use wire::{Extension as _, MsgIsZero as _, Msgsize as _};"));
    assert!(code.contains("impl wire::MsgIsZero for Scratch {"));
    assert!(code.contains("        false\n"));
    assert!(!code.contains("Msgsize for"));
}

/// Encode a struct of fixed-width fields the way the wire format lays it
/// out in map or tuple mode.
fn encode_reading(rng: &mut fastrand::Rng, tuple: bool) -> Vec<u8> {
    let mut b = Vec::new();
    if tuple {
        append_array_header(&mut b, 6);
    } else {
        append_map_header(&mut b, 6);
    }
    let field = |b: &mut Vec<u8>, tag: &str| {
        if !tuple {
            append_string(b, tag);
        }
    };
    field(&mut b, "seq");
    append_int64(&mut b, rng.i64(..));
    field(&mut b, "small");
    append_int8(&mut b, rng.i8(..));
    field(&mut b, "count");
    append_uint16(&mut b, rng.u16(..));
    field(&mut b, "ok");
    append_bool(&mut b, rng.bool());
    field(&mut b, "ratio");
    append_float32(&mut b, f32::from_bits(rng.u32(..)));
    field(&mut b, "phase");
    append_complex64(
        &mut b,
        Complex64::new(f32::from_bits(rng.u32(..)), f32::from_bits(rng.u32(..))),
    );
    b
}

#[test]
fn fixed_size_is_an_upper_bound() {
    let fields = || {
        vec![
            StructField::new("seq", Elem::base("i64")),
            StructField::new("small", Elem::base("i8")),
            StructField::new("count", Elem::base("u16")),
            StructField::new("ok", Elem::base("bool")),
            StructField::new("ratio", Elem::base("f32")),
            StructField::new("phase", Elem::base("Complex64")),
            StructField::new("note", Elem::base("String")).private(),
        ]
    };
    let mut tuple = Elem::structure(fields()).named("TupleReading");
    if let Elem::Struct(st) = &mut tuple {
        st.as_tuple = true;
    }
    let types: TypeSet = [Elem::structure(fields()).named("Reading"), tuple]
        .into_iter()
        .collect();
    let sizes = fixed_sizes(&types, "msgpgen_wire");
    let map_bound = sizes
        .get("Reading")
        .and_then(|f| f.bytes)
        .expect("Reading folds");
    let tuple_bound = sizes
        .get("TupleReading")
        .and_then(|f| f.bytes)
        .expect("TupleReading folds");
    assert!(tuple_bound < map_bound);

    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..1_000 {
        assert!(encode_reading(&mut rng, false).len() <= map_bound);
        assert!(encode_reading(&mut rng, true).len() <= tuple_bound);
    }
}
