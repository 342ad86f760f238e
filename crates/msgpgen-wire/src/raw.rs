// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Raw passthrough: capture the exact bytes of one encoded value.

use crate::error::{WireError, WireResult};
use crate::read::{
    next_type, read_array_header, read_bool, read_bytes, read_float32, read_float64, read_int64,
    read_map_header, read_map_key, read_nil, read_string_bytes, read_uint64, Type,
};
use crate::traits::{MsgIsZero, Msgsize};

/// Already-encoded bytes stored verbatim on encode and captured verbatim on
/// decode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raw(pub Vec<u8>);

impl Raw {
    /// Re-emit the captured bytes.
    pub fn marshal_msg(&self, b: &mut Vec<u8>) {
        b.extend_from_slice(&self.0);
    }

    /// Capture the next complete value from `bts` and return what follows it.
    ///
    /// Nested maps and arrays are walked so the capture spans every child.
    /// A bare nil token is captured as a one-byte value rather than rejected.
    /// On error `self` is left untouched.
    pub fn unmarshal_msg<'a>(&mut self, bts: &'a [u8]) -> WireResult<&'a [u8]> {
        let rest = skip_value(bts)?;
        self.0 = bts[..bts.len() - rest.len()].to_vec();
        Ok(rest)
    }
}

impl Msgsize for Raw {
    fn msgsize(&self) -> usize {
        self.0.len()
    }
}

impl MsgIsZero for Raw {
    fn msg_is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

fn skip_value(b: &[u8]) -> WireResult<&[u8]> {
    match next_type(b) {
        Type::Str => read_string_bytes(b).map(|(_, o)| o),
        Type::Bin => read_bytes(b).map(|(_, o)| o),
        Type::Map => {
            let (sz, mut o) = read_map_header(b)?;
            for _ in 0..sz {
                o = skip_map_key(o)?;
                o = skip_value(o)?;
            }
            Ok(o)
        }
        Type::Array => {
            let (sz, mut o) = read_array_header(b)?;
            for _ in 0..sz {
                o = skip_value(o)?;
            }
            Ok(o)
        }
        Type::Float64 => read_float64(b).map(|(_, o)| o),
        Type::Float32 => read_float32(b).map(|(_, o)| o),
        Type::Bool => read_bool(b).map(|(_, o)| o),
        Type::Uint => read_uint64(b).map(|(_, o)| o),
        Type::Int => read_int64(b).map(|(_, o)| o),
        Type::Nil => read_nil(b),
        Type::Extension | Type::Complex64 | Type::Complex128 | Type::Time => {
            Err(WireError::UnsupportedExtension)
        }
        Type::Invalid if b.is_empty() => Err(WireError::ShortBytes),
        other => Err(WireError::UnexpectedType(other)),
    }
}

fn skip_map_key(b: &[u8]) -> WireResult<&[u8]> {
    match next_type(b) {
        Type::Str => read_map_key(b).map(|(_, o)| o),
        Type::Uint => read_uint64(b).map(|(_, o)| o),
        Type::Int => read_int64(b).map(|(_, o)| o),
        Type::Float64 => read_float64(b).map(|(_, o)| o),
        Type::Float32 => read_float32(b).map(|(_, o)| o),
        Type::Bool => read_bool(b).map(|(_, o)| o),
        other => Err(WireError::UnexpectedMapKey(other)),
    }
}
