// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Extension types: the user extension contract and the built-in
//! fixed-layout complex number payloads.

use crate::error::WireResult;
use crate::traits::MsgIsZero;

/// Extension type code for complex64.
pub const COMPLEX64_EXTENSION: i8 = 3;
/// Extension type code for complex128.
pub const COMPLEX128_EXTENSION: i8 = 4;
/// Extension type code for timestamps.
pub const TIME_EXTENSION: i8 = 5;

/// A user-defined extension payload.
pub trait Extension {
    /// Application-specific type code.
    fn extension_type(&self) -> i8;

    /// Payload length in bytes (prefix excluded).
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write exactly `len()` payload bytes into `out`.
    fn marshal_binary_to(&self, out: &mut [u8]) -> WireResult<()>;
}

/// Opaque extension captured as type code + bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawExtension {
    pub ext_type: i8,
    pub data: Vec<u8>,
}

impl RawExtension {
    pub fn new(ext_type: i8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            ext_type,
            data: data.into(),
        }
    }
}

impl Extension for RawExtension {
    fn extension_type(&self) -> i8 {
        self.ext_type
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn marshal_binary_to(&self, out: &mut [u8]) -> WireResult<()> {
        out.copy_from_slice(&self.data);
        Ok(())
    }
}

impl MsgIsZero for RawExtension {
    fn msg_is_zero(&self) -> bool {
        self.ext_type == 0 && self.data.is_empty()
    }
}

/// Complex number with float32 parts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex64 {
    pub re: f32,
    pub im: f32,
}

impl Complex64 {
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}

/// Complex number with float64 parts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Complex128 {
    pub re: f64,
    pub im: f64,
}

impl Complex128 {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}
