// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! MessagePack wire codec used by msgpgen generated code.
//!
//! Every `append_*` function extends a caller-owned `Vec<u8>` with one
//! self-describing token and never reads bytes that were already written.
//! Every `read_*` function consumes one token from the front of a byte slice
//! and returns the decoded value together with the remaining bytes.
//!
//! # Wire classes
//!
//! | Class | Encoding |
//! |-------|----------|
//! | nil, bool | 1 byte |
//! | int in `-32..=127` | 1 byte, value embedded |
//! | other ints | tag + 1/2/4/8 bytes, smallest width that fits |
//! | float32 / float64 | tag + 4 / 8 bytes |
//! | str / bin | length class tag + payload |
//! | map / array header | 1, 3 or 5 bytes |
//! | complex64 / complex128 / timestamp | fixed 10 / 18 / 15 byte extensions |
//!
//! Sizes for every data-independent class are exported as `*_SIZE`
//! constants so that generators can fold them at generation time.

pub mod error;
pub mod ext;
pub mod grow;
pub mod less;
pub mod raw;
pub mod read;
pub mod sizes;
pub mod traits;
pub mod value;
pub mod write;

mod tags;

pub use error::{WireError, WireResult};
pub use ext::{Complex128, Complex64, Extension, RawExtension};
pub use grow::ensure;
pub use less::*;
pub use raw::Raw;
pub use read::*;
pub use sizes::*;
pub use traits::{MsgIsZero, Msgsize};
pub use value::{append_intf, guess_size, Value};
pub use write::*;
