// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Decode-side wire errors.

use thiserror::Error;

use crate::read::Type;

/// Errors raised while reading or re-emitting wire tokens.
///
/// Appending never fails for built-in classes; only user extensions can
/// report a marshal failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("too few bytes left to read object")]
    ShortBytes,

    #[error("attempted to decode type {found:?} with method for {expected:?}")]
    TypeError { expected: Type, found: Type },

    #[error("unexpected type {0:?}")]
    UnexpectedType(Type),

    #[error("unexpected map key type {0:?}")]
    UnexpectedMapKey(Type),

    #[error("raw passthrough does not support extensions")]
    UnsupportedExtension,

    #[error("extension type {found} does not match expected type {expected}")]
    ExtensionMismatch { expected: i8, found: i8 },

    #[error("integer {value} overflows a {bits}-bit destination")]
    IntOverflow { value: i128, bits: u32 },

    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("extension marshal failed: {0}")]
    ExtensionMarshal(String),
}

pub type WireResult<T> = core::result::Result<T, WireError>;
