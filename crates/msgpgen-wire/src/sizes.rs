// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Maximum encoded sizes for data-independent wire classes.
//!
//! Integer sizes are the widest encoding of the type (tag + full width), so a
//! generator may use them as an upper bound without looking at the value.

pub const NIL_SIZE: usize = 1;
pub const BOOL_SIZE: usize = 1;

pub const INT8_SIZE: usize = 2;
pub const INT16_SIZE: usize = 3;
pub const INT32_SIZE: usize = 5;
pub const INT64_SIZE: usize = 9;
pub const INT_SIZE: usize = INT64_SIZE;

pub const UINT8_SIZE: usize = 2;
pub const UINT16_SIZE: usize = 3;
pub const UINT32_SIZE: usize = 5;
pub const UINT64_SIZE: usize = 9;
pub const UINT_SIZE: usize = UINT64_SIZE;
pub const BYTE_SIZE: usize = UINT8_SIZE;

pub const FLOAT32_SIZE: usize = 5;
pub const FLOAT64_SIZE: usize = 9;

/// fixext8: tag + type code + 2 x float32.
pub const COMPLEX64_SIZE: usize = 10;
/// fixext16: tag + type code + 2 x float64.
pub const COMPLEX128_SIZE: usize = 18;
/// ext8: tag + length + type code + i64 seconds + i32 nanoseconds.
pub const TIME_SIZE: usize = 15;

/// Largest map header (map32).
pub const MAP_HEADER_SIZE: usize = 5;
/// Largest array header (array32).
pub const ARRAY_HEADER_SIZE: usize = 5;
/// Largest bin length prefix (bin32).
pub const BYTES_PREFIX_SIZE: usize = 5;
/// Largest str length prefix (str32).
pub const STRING_PREFIX_SIZE: usize = 5;
/// Largest extension prefix (ext32: tag + u32 length + type code).
pub const EXTENSION_PREFIX_SIZE: usize = 6;

/// Length of a map header for `n` entries.
pub const fn map_header_len(n: u32) -> usize {
    if n <= 15 {
        1
    } else if n <= u16::MAX as u32 {
        3
    } else {
        5
    }
}

/// Length of an array header for `n` elements (same classes as maps).
pub const fn array_header_len(n: u32) -> usize {
    map_header_len(n)
}

/// Encoded length of a str token carrying `len` payload bytes.
pub const fn string_len(len: usize) -> usize {
    if len <= 31 {
        1 + len
    } else if len <= u8::MAX as usize {
        2 + len
    } else if len <= u16::MAX as usize {
        3 + len
    } else {
        5 + len
    }
}

/// Encoded length of a bin token carrying `len` payload bytes.
pub const fn bytes_len(len: usize) -> usize {
    if len <= u8::MAX as usize {
        2 + len
    } else if len <= u16::MAX as usize {
        3 + len
    } else {
        5 + len
    }
}
