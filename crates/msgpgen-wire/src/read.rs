// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read functions: decode one token from the front of a byte slice.
//!
//! Every reader returns `(value, rest)` where `rest` begins immediately
//! after the consumed token. Readers are zero-copy for `str` and `bin`.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{WireError, WireResult};
use crate::ext::{
    Complex128, Complex64, RawExtension, COMPLEX128_EXTENSION, COMPLEX64_EXTENSION, TIME_EXTENSION,
};
use crate::tags;

/// Wire class of the next token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Invalid,
    Str,
    Bin,
    Map,
    Array,
    Float64,
    Float32,
    Bool,
    Int,
    Uint,
    Nil,
    Extension,
    Complex64,
    Complex128,
    Time,
}

/// Classify the next token without consuming it.
pub fn next_type(b: &[u8]) -> Type {
    let Some(&lead) = b.first() else {
        return Type::Invalid;
    };
    if tags::is_fixint(lead) {
        return Type::Uint;
    }
    if tags::is_negfixint(lead) {
        return Type::Int;
    }
    if tags::is_fixmap(lead) {
        return Type::Map;
    }
    if tags::is_fixarray(lead) {
        return Type::Array;
    }
    if tags::is_fixstr(lead) {
        return Type::Str;
    }
    match lead {
        tags::NIL => Type::Nil,
        tags::TRUE | tags::FALSE => Type::Bool,
        tags::BIN8 | tags::BIN16 | tags::BIN32 => Type::Bin,
        tags::FLOAT32 => Type::Float32,
        tags::FLOAT64 => Type::Float64,
        tags::UINT8 | tags::UINT16 | tags::UINT32 | tags::UINT64 => Type::Uint,
        tags::INT8 | tags::INT16 | tags::INT32 | tags::INT64 => Type::Int,
        tags::STR8 | tags::STR16 | tags::STR32 => Type::Str,
        tags::ARRAY16 | tags::ARRAY32 => Type::Array,
        tags::MAP16 | tags::MAP32 => Type::Map,
        tags::FIXEXT8 if b.get(1) == Some(&(COMPLEX64_EXTENSION as u8)) => Type::Complex64,
        tags::FIXEXT16 if b.get(1) == Some(&(COMPLEX128_EXTENSION as u8)) => Type::Complex128,
        tags::EXT8 if b.get(1) == Some(&12) && b.get(2) == Some(&(TIME_EXTENSION as u8)) => {
            Type::Time
        }
        tags::FIXEXT1
        | tags::FIXEXT2
        | tags::FIXEXT4
        | tags::FIXEXT8
        | tags::FIXEXT16
        | tags::EXT8
        | tags::EXT16
        | tags::EXT32 => Type::Extension,
        _ => Type::Invalid,
    }
}

fn take(b: &[u8], n: usize) -> WireResult<(&[u8], &[u8])> {
    if b.len() < n {
        return Err(WireError::ShortBytes);
    }
    Ok(b.split_at(n))
}

fn lead(b: &[u8]) -> WireResult<u8> {
    b.first().copied().ok_or(WireError::ShortBytes)
}

fn mismatch(expected: Type, b: &[u8]) -> WireError {
    WireError::TypeError {
        expected,
        found: next_type(b),
    }
}

/// Generate big-endian fixed-width readers that skip `$skip` leading bytes.
macro_rules! impl_read_be {
    ($name:ident, $type:ty, $size:expr) => {
        fn $name(b: &[u8], skip: usize) -> WireResult<($type, &[u8])> {
            let (head, rest) = take(b, skip + $size)?;
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(&head[skip..]);
            Ok((<$type>::from_be_bytes(bytes), rest))
        }
    };
}

impl_read_be!(be_u8, u8, 1);
impl_read_be!(be_u16, u16, 2);
impl_read_be!(be_u32, u32, 4);
impl_read_be!(be_u64, u64, 8);
impl_read_be!(be_i8, i8, 1);
impl_read_be!(be_i16, i16, 2);
impl_read_be!(be_i32, i32, 4);
impl_read_be!(be_i64, i64, 8);

/// Read a map header and return the number of key/value pairs.
pub fn read_map_header(b: &[u8]) -> WireResult<(u32, &[u8])> {
    let l = lead(b)?;
    if tags::is_fixmap(l) {
        return Ok((u32::from(l & 0x0f), &b[1..]));
    }
    match l {
        tags::MAP16 => be_u16(b, 1).map(|(n, o)| (u32::from(n), o)),
        tags::MAP32 => be_u32(b, 1),
        _ => Err(mismatch(Type::Map, b)),
    }
}

/// Read an array header and return the element count.
pub fn read_array_header(b: &[u8]) -> WireResult<(u32, &[u8])> {
    let l = lead(b)?;
    if tags::is_fixarray(l) {
        return Ok((u32::from(l & 0x0f), &b[1..]));
    }
    match l {
        tags::ARRAY16 => be_u16(b, 1).map(|(n, o)| (u32::from(n), o)),
        tags::ARRAY32 => be_u32(b, 1),
        _ => Err(mismatch(Type::Array, b)),
    }
}

pub fn read_nil(b: &[u8]) -> WireResult<&[u8]> {
    match lead(b)? {
        tags::NIL => Ok(&b[1..]),
        _ => Err(mismatch(Type::Nil, b)),
    }
}

pub fn read_bool(b: &[u8]) -> WireResult<(bool, &[u8])> {
    match lead(b)? {
        tags::TRUE => Ok((true, &b[1..])),
        tags::FALSE => Ok((false, &b[1..])),
        _ => Err(mismatch(Type::Bool, b)),
    }
}

/// Read any integer token as `i128` so both signed and unsigned classes fit.
fn read_integer(b: &[u8], expected: Type) -> WireResult<(i128, &[u8])> {
    let l = lead(b)?;
    if tags::is_fixint(l) {
        return Ok((i128::from(l), &b[1..]));
    }
    if tags::is_negfixint(l) {
        return Ok((i128::from(l as i8), &b[1..]));
    }
    match l {
        tags::UINT8 => be_u8(b, 1).map(|(v, o)| (i128::from(v), o)),
        tags::UINT16 => be_u16(b, 1).map(|(v, o)| (i128::from(v), o)),
        tags::UINT32 => be_u32(b, 1).map(|(v, o)| (i128::from(v), o)),
        tags::UINT64 => be_u64(b, 1).map(|(v, o)| (i128::from(v), o)),
        tags::INT8 => be_i8(b, 1).map(|(v, o)| (i128::from(v), o)),
        tags::INT16 => be_i16(b, 1).map(|(v, o)| (i128::from(v), o)),
        tags::INT32 => be_i32(b, 1).map(|(v, o)| (i128::from(v), o)),
        tags::INT64 => be_i64(b, 1).map(|(v, o)| (i128::from(v), o)),
        _ => Err(mismatch(expected, b)),
    }
}

/// Generate narrowing integer readers on top of `read_integer`.
macro_rules! impl_read_int {
    ($name:ident, $type:ty, $class:expr) => {
        pub fn $name(b: &[u8]) -> WireResult<($type, &[u8])> {
            let (v, o) = read_integer(b, $class)?;
            let narrowed = <$type>::try_from(v).map_err(|_| WireError::IntOverflow {
                value: v,
                bits: <$type>::BITS,
            })?;
            Ok((narrowed, o))
        }
    };
}

impl_read_int!(read_int64, i64, Type::Int);
impl_read_int!(read_int32, i32, Type::Int);
impl_read_int!(read_int16, i16, Type::Int);
impl_read_int!(read_int8, i8, Type::Int);
impl_read_int!(read_uint64, u64, Type::Uint);
impl_read_int!(read_uint32, u32, Type::Uint);
impl_read_int!(read_uint16, u16, Type::Uint);
impl_read_int!(read_uint8, u8, Type::Uint);

pub fn read_float32(b: &[u8]) -> WireResult<(f32, &[u8])> {
    match lead(b)? {
        tags::FLOAT32 => be_u32(b, 1).map(|(bits, o)| (f32::from_bits(bits), o)),
        _ => Err(mismatch(Type::Float32, b)),
    }
}

/// Read a float64; a float32 token is widened.
pub fn read_float64(b: &[u8]) -> WireResult<(f64, &[u8])> {
    match lead(b)? {
        tags::FLOAT64 => be_u64(b, 1).map(|(bits, o)| (f64::from_bits(bits), o)),
        tags::FLOAT32 => read_float32(b).map(|(f, o)| (f64::from(f), o)),
        _ => Err(mismatch(Type::Float64, b)),
    }
}

/// Split a length-prefixed payload after a header of `hdr` bytes.
fn payload(b: &[u8], hdr: usize, len: usize) -> WireResult<(&[u8], &[u8])> {
    let (_, body) = take(b, hdr)?;
    take(body, len)
}

/// Read the payload of a `str` token without UTF-8 validation.
pub fn read_string_bytes(b: &[u8]) -> WireResult<(&[u8], &[u8])> {
    let l = lead(b)?;
    if tags::is_fixstr(l) {
        return payload(b, 1, usize::from(l & 0x1f));
    }
    match l {
        tags::STR8 => {
            let (n, _) = be_u8(b, 1)?;
            payload(b, 2, usize::from(n))
        }
        tags::STR16 => {
            let (n, _) = be_u16(b, 1)?;
            payload(b, 3, usize::from(n))
        }
        tags::STR32 => {
            let (n, _) = be_u32(b, 1)?;
            payload(b, 5, n as usize)
        }
        _ => Err(mismatch(Type::Str, b)),
    }
}

pub fn read_string(b: &[u8]) -> WireResult<(&str, &[u8])> {
    let (s, o) = read_string_bytes(b)?;
    let s = std::str::from_utf8(s).map_err(|_| WireError::InvalidUtf8)?;
    Ok((s, o))
}

/// Read the payload of a `bin` token.
pub fn read_bytes(b: &[u8]) -> WireResult<(&[u8], &[u8])> {
    match lead(b)? {
        tags::BIN8 => {
            let (n, _) = be_u8(b, 1)?;
            payload(b, 2, usize::from(n))
        }
        tags::BIN16 => {
            let (n, _) = be_u16(b, 1)?;
            payload(b, 3, usize::from(n))
        }
        tags::BIN32 => {
            let (n, _) = be_u32(b, 1)?;
            payload(b, 5, n as usize)
        }
        _ => Err(mismatch(Type::Bin, b)),
    }
}

/// Read a map key, accepting either `str` or `bin`.
pub fn read_map_key(b: &[u8]) -> WireResult<(&[u8], &[u8])> {
    match next_type(b) {
        Type::Str => read_string_bytes(b),
        Type::Bin => read_bytes(b),
        _ => Err(mismatch(Type::Str, b)),
    }
}

pub fn read_complex64(b: &[u8]) -> WireResult<(Complex64, &[u8])> {
    if next_type(b) != Type::Complex64 {
        return Err(mismatch(Type::Complex64, b));
    }
    let (re, _) = be_u32(b, 2)?;
    let (im, o) = be_u32(b, 6)?;
    Ok((Complex64::new(f32::from_bits(re), f32::from_bits(im)), o))
}

pub fn read_complex128(b: &[u8]) -> WireResult<(Complex128, &[u8])> {
    if next_type(b) != Type::Complex128 {
        return Err(mismatch(Type::Complex128, b));
    }
    let (re, _) = be_u64(b, 2)?;
    let (im, o) = be_u64(b, 10)?;
    Ok((Complex128::new(f64::from_bits(re), f64::from_bits(im)), o))
}

pub fn read_time(b: &[u8]) -> WireResult<(DateTime<Utc>, &[u8])> {
    if next_type(b) != Type::Time {
        return Err(mismatch(Type::Time, b));
    }
    let (secs, _) = be_i64(b, 3)?;
    let (nanos, o) = be_i32(b, 11)?;
    let t = Utc
        .timestamp_opt(secs, nanos as u32)
        .single()
        .ok_or(WireError::UnexpectedType(Type::Time))?;
    Ok((t, o))
}

/// Read any extension token into its type code and payload.
pub fn read_extension(b: &[u8]) -> WireResult<(RawExtension, &[u8])> {
    let (hdr, len) = match lead(b)? {
        tags::FIXEXT1 => (1, 1),
        tags::FIXEXT2 => (1, 2),
        tags::FIXEXT4 => (1, 4),
        tags::FIXEXT8 => (1, 8),
        tags::FIXEXT16 => (1, 16),
        tags::EXT8 => (2, usize::from(be_u8(b, 1)?.0)),
        tags::EXT16 => (3, usize::from(be_u16(b, 1)?.0)),
        tags::EXT32 => (5, be_u32(b, 1)?.0 as usize),
        _ => return Err(mismatch(Type::Extension, b)),
    };
    let (ext_type, _) = be_i8(b, hdr)?;
    let (data, o) = payload(b, hdr + 1, len)?;
    Ok((RawExtension::new(ext_type, data), o))
}

/// Read an extension token that must carry type code `expected`.
pub fn read_extension_typed(b: &[u8], expected: i8) -> WireResult<(RawExtension, &[u8])> {
    let (e, o) = read_extension(b)?;
    if e.ext_type != expected {
        return Err(WireError::ExtensionMismatch {
            expected,
            found: e.ext_type,
        });
    }
    Ok((e, o))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::*;

    #[test]
    fn test_next_type_classes() {
        let mut b = Vec::new();
        append_map_header(&mut b, 3);
        assert_eq!(next_type(&b), Type::Map);
        b.clear();
        append_int64(&mut b, -5);
        assert_eq!(next_type(&b), Type::Int);
        b.clear();
        append_complex64(&mut b, Complex64::new(0.0, 1.0));
        assert_eq!(next_type(&b), Type::Complex64);
        b.clear();
        append_time(&mut b, &Utc::now());
        assert_eq!(next_type(&b), Type::Time);
        assert_eq!(next_type(&[]), Type::Invalid);
        assert_eq!(next_type(&[0xc1]), Type::Invalid);
    }

    #[test]
    fn test_read_type_mismatch_reports_both_classes() {
        let mut b = Vec::new();
        append_string(&mut b, "nope");
        let err = read_map_header(&b).unwrap_err();
        assert_eq!(
            err,
            WireError::TypeError {
                expected: Type::Map,
                found: Type::Str
            }
        );
    }

    #[test]
    fn test_read_short_bytes() {
        assert_eq!(read_uint64(&[0xcd, 0x01]).unwrap_err(), WireError::ShortBytes);
        assert_eq!(read_string(&[0xa3, b'a']).unwrap_err(), WireError::ShortBytes);
        assert_eq!(read_bool(&[]).unwrap_err(), WireError::ShortBytes);
    }

    #[test]
    fn test_read_int_overflow() {
        let mut b = Vec::new();
        append_int64(&mut b, 300);
        let err = read_int8(&b).unwrap_err();
        assert_eq!(err, WireError::IntOverflow { value: 300, bits: 8 });

        b.clear();
        append_int64(&mut b, -1);
        assert!(matches!(
            read_uint64(&b),
            Err(WireError::IntOverflow { value: -1, bits: 64 })
        ));
    }

    #[test]
    fn test_read_leaves_rest() {
        let mut b = Vec::new();
        append_float32(&mut b, 2.5);
        append_bool(&mut b, false);
        let (f, rest) = read_float64(&b).expect("float32 widens");
        assert!((f - 2.5).abs() < f64::EPSILON);
        let (t, rest) = read_bool(rest).expect("bool");
        assert!(!t);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_read_complex_and_time() {
        let mut b = Vec::new();
        append_complex128(&mut b, Complex128::new(1.5, -2.5));
        let (c, rest) = read_complex128(&b).expect("complex128");
        assert_eq!(c, Complex128::new(1.5, -2.5));
        assert!(rest.is_empty());

        b.clear();
        let t = Utc.timestamp_opt(-5, 999).single().expect("valid timestamp");
        append_time(&mut b, &t);
        let (back, rest) = read_time(&b).expect("time");
        assert_eq!(back, t);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_read_extension() {
        let mut b = Vec::new();
        append_extension(&mut b, &RawExtension::new(-3, vec![9u8; 20])).expect("append ext");
        let (e, rest) = read_extension(&b).expect("ext");
        assert_eq!(e, RawExtension::new(-3, vec![9u8; 20]));
        assert!(rest.is_empty());
    }

    #[test]
    fn test_read_extension_typed() {
        let mut b = Vec::new();
        append_extension(&mut b, &RawExtension::new(7, vec![1u8, 2])).expect("append ext");
        let (e, _) = read_extension_typed(&b, 7).expect("matching code");
        assert_eq!(e.data, vec![1, 2]);
        assert_eq!(
            read_extension_typed(&b, 8).unwrap_err(),
            WireError::ExtensionMismatch {
                expected: 8,
                found: 7
            }
        );
    }
}
