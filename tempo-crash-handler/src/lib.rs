// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! Process-wide fault reporting for the engine's native layer.
//!
//! The handler installs itself as the top-level fault interceptor
//! (`SetUnhandledExceptionFilter` on Windows, `sigaction` on POSIX), maps the
//! platform fault code to a fixed human-readable label, and relays that label
//! to a companion process over a named byte-stream channel. Local visibility
//! is guaranteed: whether or not the channel is reachable, the label (or the
//! channel's OS error) is presented to the user on the spot.
//!
//! The process is expected to terminate once a fault has been reported; the
//! reporter never attempts resumption or recovery.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

mod configuration;
mod constants;
mod fault_name;
mod handler;
pub mod self_test;

pub use configuration::CrashHandlerConfiguration;
pub use constants::{
    CHANNEL_WRITE_TIMEOUT, DEFAULT_MINIDUMP_PATH, REPORT_TERMINATOR,
    TEMPO_CRASH_CHANNEL_PIPE_NAME, TEMPO_CRASH_CHANNEL_SOCKET_PATH,
};
pub use fault_name::fault_name;
pub use handler::{install, FaultHandlerError};
pub use self_test::SelfTestFault;
