// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Contracts implemented by generated code.

/// Upper bound on the serialized size of a value.
pub trait Msgsize {
    /// Never smaller than the number of bytes the value encodes to.
    fn msgsize(&self) -> usize;
}

/// Zero-value predicate.
pub trait MsgIsZero {
    fn msg_is_zero(&self) -> bool;
}

impl<T: Msgsize + ?Sized> Msgsize for Box<T> {
    fn msgsize(&self) -> usize {
        (**self).msgsize()
    }
}

impl<T: MsgIsZero + ?Sized> MsgIsZero for Box<T> {
    fn msg_is_zero(&self) -> bool {
        (**self).msg_is_zero()
    }
}
