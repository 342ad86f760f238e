// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Append functions: one token per call, written at the end of the buffer.

use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{WireError, WireResult};
use crate::ext::{
    Complex128, Complex64, Extension, COMPLEX128_EXTENSION, COMPLEX64_EXTENSION, TIME_EXTENSION,
};
use crate::grow::ensure;
use crate::sizes::{COMPLEX128_SIZE, COMPLEX64_SIZE, TIME_SIZE};
use crate::tags;

/// Generate `tag + big-endian value` writers (one per width).
macro_rules! impl_prefix_be {
    ($name:ident, $type:ty, $size:expr) => {
        fn $name(b: &mut Vec<u8>, tag: u8, value: $type) {
            let n = ensure(b, 1 + $size);
            b[n] = tag;
            b[n + 1..n + 1 + $size].copy_from_slice(&value.to_be_bytes());
        }
    };
}

impl_prefix_be!(prefix_u8, u8, 1);
impl_prefix_be!(prefix_u16, u16, 2);
impl_prefix_be!(prefix_u32, u32, 4);
impl_prefix_be!(prefix_u64, u64, 8);
impl_prefix_be!(prefix_i8, i8, 1);
impl_prefix_be!(prefix_i16, i16, 2);
impl_prefix_be!(prefix_i32, i32, 4);
impl_prefix_be!(prefix_i64, i64, 8);

/// Append a length-class header followed by `payload`.
fn append_with_header(b: &mut Vec<u8>, header: &[u8], payload: &[u8]) {
    let n = ensure(b, header.len() + payload.len());
    b[n..n + header.len()].copy_from_slice(header);
    b[n + header.len()..].copy_from_slice(payload);
}

/// Append a map header announcing `sz` key/value pairs.
pub fn append_map_header(b: &mut Vec<u8>, sz: u32) {
    if sz <= 15 {
        b.push(tags::fixmap(sz as u8));
    } else if sz <= u32::from(u16::MAX) {
        prefix_u16(b, tags::MAP16, sz as u16);
    } else {
        prefix_u32(b, tags::MAP32, sz);
    }
}

/// Append an array header announcing `sz` elements.
pub fn append_array_header(b: &mut Vec<u8>, sz: u32) {
    if sz <= 15 {
        b.push(tags::fixarray(sz as u8));
    } else if sz <= u32::from(u16::MAX) {
        prefix_u16(b, tags::ARRAY16, sz as u16);
    } else {
        prefix_u32(b, tags::ARRAY32, sz);
    }
}

pub fn append_nil(b: &mut Vec<u8>) {
    b.push(tags::NIL);
}

pub fn append_bool(b: &mut Vec<u8>, t: bool) {
    b.push(if t { tags::TRUE } else { tags::FALSE });
}

pub fn append_float64(b: &mut Vec<u8>, f: f64) {
    prefix_u64(b, tags::FLOAT64, f.to_bits());
}

pub fn append_float32(b: &mut Vec<u8>, f: f32) {
    prefix_u32(b, tags::FLOAT32, f.to_bits());
}

/// Append a signed integer using the smallest width that holds it.
///
/// Non-negative values take the unsigned encodings.
pub fn append_int64(b: &mut Vec<u8>, i: i64) {
    if i >= 0 {
        append_uint64(b, i as u64);
    } else if i >= -32 {
        b.push(i as i8 as u8);
    } else if i >= i64::from(i8::MIN) {
        prefix_i8(b, tags::INT8, i as i8);
    } else if i >= i64::from(i16::MIN) {
        prefix_i16(b, tags::INT16, i as i16);
    } else if i >= i64::from(i32::MIN) {
        prefix_i32(b, tags::INT32, i as i32);
    } else {
        prefix_i64(b, tags::INT64, i);
    }
}

pub fn append_int8(b: &mut Vec<u8>, i: i8) {
    append_int64(b, i64::from(i));
}

pub fn append_int16(b: &mut Vec<u8>, i: i16) {
    append_int64(b, i64::from(i));
}

pub fn append_int32(b: &mut Vec<u8>, i: i32) {
    append_int64(b, i64::from(i));
}

pub fn append_int(b: &mut Vec<u8>, i: isize) {
    append_int64(b, i as i64);
}

/// Append an unsigned integer using the smallest width that holds it.
pub fn append_uint64(b: &mut Vec<u8>, u: u64) {
    if u <= u64::from(tags::FIXINT_MAX) {
        b.push(u as u8);
    } else if u <= u64::from(u8::MAX) {
        prefix_u8(b, tags::UINT8, u as u8);
    } else if u <= u64::from(u16::MAX) {
        prefix_u16(b, tags::UINT16, u as u16);
    } else if u <= u64::from(u32::MAX) {
        prefix_u32(b, tags::UINT32, u as u32);
    } else {
        prefix_u64(b, tags::UINT64, u);
    }
}

pub fn append_uint8(b: &mut Vec<u8>, u: u8) {
    append_uint64(b, u64::from(u));
}

pub fn append_byte(b: &mut Vec<u8>, u: u8) {
    append_uint8(b, u);
}

pub fn append_uint16(b: &mut Vec<u8>, u: u16) {
    append_uint64(b, u64::from(u));
}

pub fn append_uint32(b: &mut Vec<u8>, u: u32) {
    append_uint64(b, u64::from(u));
}

pub fn append_uint(b: &mut Vec<u8>, u: usize) {
    append_uint64(b, u as u64);
}

/// Append `bts` as a `bin` token.
pub fn append_bytes(b: &mut Vec<u8>, bts: &[u8]) {
    let sz = bts.len();
    if sz <= usize::from(u8::MAX) {
        append_with_header(b, &[tags::BIN8, sz as u8], bts);
    } else if sz <= usize::from(u16::MAX) {
        let [hi, lo] = (sz as u16).to_be_bytes();
        append_with_header(b, &[tags::BIN16, hi, lo], bts);
    } else {
        let [b0, b1, b2, b3] = (sz as u32).to_be_bytes();
        append_with_header(b, &[tags::BIN32, b0, b1, b2, b3], bts);
    }
}

/// Append an optional byte slice; an absent slice is the nil token, not an
/// empty `bin`.
pub fn append_nullable_bytes(b: &mut Vec<u8>, bts: Option<&[u8]>) {
    match bts {
        None => append_nil(b),
        Some(bts) => append_bytes(b, bts),
    }
}

/// Append `s` as a `str` token.
pub fn append_string(b: &mut Vec<u8>, s: &str) {
    append_string_from_bytes(b, s.as_bytes());
}

/// Append raw bytes as a `str` token without UTF-8 validation.
pub fn append_string_from_bytes(b: &mut Vec<u8>, s: &[u8]) {
    let sz = s.len();
    if sz <= 31 {
        append_with_header(b, &[tags::fixstr(sz as u8)], s);
    } else if sz <= usize::from(u8::MAX) {
        append_with_header(b, &[tags::STR8, sz as u8], s);
    } else if sz <= usize::from(u16::MAX) {
        let [hi, lo] = (sz as u16).to_be_bytes();
        append_with_header(b, &[tags::STR16, hi, lo], s);
    } else {
        let [b0, b1, b2, b3] = (sz as u32).to_be_bytes();
        append_with_header(b, &[tags::STR32, b0, b1, b2, b3], s);
    }
}

pub fn append_complex64(b: &mut Vec<u8>, c: Complex64) {
    let n = ensure(b, COMPLEX64_SIZE);
    b[n] = tags::FIXEXT8;
    b[n + 1] = COMPLEX64_EXTENSION as u8;
    b[n + 2..n + 6].copy_from_slice(&c.re.to_bits().to_be_bytes());
    b[n + 6..n + 10].copy_from_slice(&c.im.to_bits().to_be_bytes());
}

pub fn append_complex128(b: &mut Vec<u8>, c: Complex128) {
    let n = ensure(b, COMPLEX128_SIZE);
    b[n] = tags::FIXEXT16;
    b[n + 1] = COMPLEX128_EXTENSION as u8;
    b[n + 2..n + 10].copy_from_slice(&c.re.to_bits().to_be_bytes());
    b[n + 10..n + 18].copy_from_slice(&c.im.to_bits().to_be_bytes());
}

/// Append a timestamp, normalised to UTC, as a 15-byte extension.
pub fn append_time<Tz: TimeZone>(b: &mut Vec<u8>, t: &DateTime<Tz>) {
    let t = t.with_timezone(&Utc);
    let n = ensure(b, TIME_SIZE);
    b[n] = tags::EXT8;
    b[n + 1] = 12;
    b[n + 2] = TIME_EXTENSION as u8;
    b[n + 3..n + 11].copy_from_slice(&t.timestamp().to_be_bytes());
    b[n + 11..n + 15].copy_from_slice(&(t.timestamp_subsec_nanos() as i32).to_be_bytes());
}

/// Append a user extension with the smallest fitting prefix.
pub fn append_extension(b: &mut Vec<u8>, e: &dyn Extension) -> WireResult<()> {
    let l = e.len();
    let ty = e.extension_type() as u8;
    let header: Vec<u8> = match l {
        1 => vec![tags::FIXEXT1, ty],
        2 => vec![tags::FIXEXT2, ty],
        4 => vec![tags::FIXEXT4, ty],
        8 => vec![tags::FIXEXT8, ty],
        16 => vec![tags::FIXEXT16, ty],
        l if l <= usize::from(u8::MAX) => vec![tags::EXT8, l as u8, ty],
        l if l <= usize::from(u16::MAX) => {
            let [hi, lo] = (l as u16).to_be_bytes();
            vec![tags::EXT16, hi, lo, ty]
        }
        l => {
            let [b0, b1, b2, b3] = (l as u32).to_be_bytes();
            vec![tags::EXT32, b0, b1, b2, b3, ty]
        }
    };
    let start = b.len();
    let n = ensure(b, header.len() + l);
    b[n..n + header.len()].copy_from_slice(&header);
    if let Err(err) = e.marshal_binary_to(&mut b[n + header.len()..]) {
        b.truncate(start);
        return Err(match err {
            WireError::ExtensionMarshal(reason) => WireError::ExtensionMarshal(reason),
            other => WireError::ExtensionMarshal(other.to_string()),
        });
    }
    Ok(())
}

/// Append a string-to-string map.
pub fn append_map_str_str(b: &mut Vec<u8>, m: &HashMap<String, String>) {
    append_map_header(b, m.len() as u32);
    for (key, val) in m {
        append_string(b, key);
        append_string(b, val);
    }
}
