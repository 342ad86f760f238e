// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamically typed values for interface-typed ("any") fields.

use chrono::{DateTime, Utc};

use crate::error::WireResult;
use crate::ext::{Complex128, Complex64, Extension, RawExtension};
use crate::sizes::*;
use crate::traits::{MsgIsZero, Msgsize};
use crate::write::*;

/// Any value the wire format can carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float64(f64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(String, Value)>),
    Complex64(Complex64),
    Complex128(Complex128),
    Time(DateTime<Utc>),
    Ext(RawExtension),
}

/// Worst-case encoded size of an interface-typed value.
pub fn guess_size(v: &Value) -> usize {
    match v {
        Value::Nil => NIL_SIZE,
        Value::Bool(_) => BOOL_SIZE,
        Value::Int(_) => INT64_SIZE,
        Value::Uint(_) => UINT64_SIZE,
        Value::Float32(_) => FLOAT32_SIZE,
        Value::Float64(_) => FLOAT64_SIZE,
        Value::Str(s) => STRING_PREFIX_SIZE + s.len(),
        Value::Bin(b) => BYTES_PREFIX_SIZE + b.len(),
        Value::Array(items) => ARRAY_HEADER_SIZE + items.iter().map(guess_size).sum::<usize>(),
        Value::Map(entries) => {
            MAP_HEADER_SIZE
                + entries
                    .iter()
                    .map(|(k, v)| STRING_PREFIX_SIZE + k.len() + guess_size(v))
                    .sum::<usize>()
        }
        Value::Complex64(_) => COMPLEX64_SIZE,
        Value::Complex128(_) => COMPLEX128_SIZE,
        Value::Time(_) => TIME_SIZE,
        Value::Ext(e) => EXTENSION_PREFIX_SIZE + e.len(),
    }
}

/// Append an interface-typed value.
pub fn append_intf(b: &mut Vec<u8>, v: &Value) -> WireResult<()> {
    match v {
        Value::Nil => append_nil(b),
        Value::Bool(t) => append_bool(b, *t),
        Value::Int(i) => append_int64(b, *i),
        Value::Uint(u) => append_uint64(b, *u),
        Value::Float32(f) => append_float32(b, *f),
        Value::Float64(f) => append_float64(b, *f),
        Value::Str(s) => append_string(b, s),
        Value::Bin(bts) => append_bytes(b, bts),
        Value::Array(items) => {
            append_array_header(b, items.len() as u32);
            for item in items {
                append_intf(b, item)?;
            }
        }
        Value::Map(entries) => {
            append_map_header(b, entries.len() as u32);
            for (k, item) in entries {
                append_string(b, k);
                append_intf(b, item)?;
            }
        }
        Value::Complex64(c) => append_complex64(b, *c),
        Value::Complex128(c) => append_complex128(b, *c),
        Value::Time(t) => append_time(b, t),
        Value::Ext(e) => append_extension(b, e)?,
    }
    Ok(())
}

impl Msgsize for Value {
    fn msgsize(&self) -> usize {
        guess_size(self)
    }
}

impl MsgIsZero for Value {
    fn msg_is_zero(&self) -> bool {
        matches!(self, Value::Nil)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_guess_size_bounds_encoding() {
        let v = Value::Map(vec![
            ("id".into(), Value::Uint(3)),
            (
                "tags".into(),
                Value::Array(vec![Value::Str("x".repeat(40)), Value::Nil]),
            ),
            ("blob".into(), Value::Bin(vec![0u8; 300])),
            ("at".into(), Value::Time(Utc.timestamp_opt(0, 0).unwrap())),
            ("ext".into(), Value::Ext(RawExtension::new(9, vec![1u8; 5]))),
        ]);
        let mut b = Vec::new();
        append_intf(&mut b, &v).expect("append intf");
        assert!(guess_size(&v) >= b.len());
    }

    #[test]
    fn test_nil_is_zero() {
        assert!(Value::Nil.msg_is_zero());
        assert!(!Value::Int(0).msg_is_zero());
    }
}
