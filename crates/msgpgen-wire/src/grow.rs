// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Buffer growth policy for the append functions.

/// Extend `b` by `sz` zeroed bytes and return the offset where they start.
///
/// Spare capacity is reused when there is enough of it. Otherwise the buffer
/// is reallocated to `2 * capacity + sz` and the existing bytes are copied,
/// so a run of small appends costs amortised O(1) per byte.
///
/// # Panics
///
/// A target capacity that overflows the address space is unrecoverable
/// resource exhaustion and panics.
pub fn ensure(b: &mut Vec<u8>, sz: usize) -> usize {
    let len = b.len();
    let cap = b.capacity();
    if cap - len < sz {
        let target = cap.saturating_mul(2).saturating_add(sz);
        if target == usize::MAX || target > isize::MAX as usize {
            panic!("msgpgen-wire: buffer growth overflow (capacity {cap}, requested {sz})");
        }
        let mut grown = Vec::with_capacity(target);
        grown.extend_from_slice(b);
        *b = grown;
    }
    b.resize(len + sz, 0);
    len
}
