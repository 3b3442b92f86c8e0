// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! C ABI surface for the engine's native shims.
//!
//! Exported symbols use the `tempo_` prefix. Slices passed in are borrowed
//! views owned by the caller; buffers handed out are owned by this library's
//! allocator and must come back through the paired free function.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod crash;
mod error;
mod image;
mod result;
pub mod slice;
mod utils;
pub mod vec;

pub use crash::*;
pub use error::*;
pub use image::*;
pub use result::*;
pub use slice::{ByteSlice, CharSlice, Slice};
