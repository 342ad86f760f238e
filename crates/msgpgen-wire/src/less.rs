// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in less-than functions bound by the `sort` directive.

/// Generate `a < b` comparators for totally ordered primitives.
macro_rules! impl_less {
    ($($name:ident: $type:ty),* $(,)?) => {
        $(
            pub fn $name(a: &$type, b: &$type) -> bool {
                a < b
            }
        )*
    };
}

impl_less!(
    int_less: isize,
    int8_less: i8,
    int16_less: i16,
    int32_less: i32,
    int64_less: i64,
    uint_less: usize,
    uint8_less: u8,
    uint16_less: u16,
    uint32_less: u32,
    uint64_less: u64,
    string_less: String,
    bytes_less: Vec<u8>,
);

/// Floats compare by IEEE total order so sorting is deterministic with NaN.
pub fn float32_less(a: &f32, b: &f32) -> bool {
    a.total_cmp(b).is_lt()
}

pub fn float64_less(a: &f64, b: &f64) -> bool {
    a.total_cmp(b).is_lt()
}
