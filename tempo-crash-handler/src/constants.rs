// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! Well-known names and limits shared between the reporter and its external
//! listener. The listener is expected to wait on the fixed channel name below;
//! a configuration override exists so tests can listen on scratch paths.

use std::time::Duration;

/// Default report channel on Windows: a named pipe created by the companion
/// process before the engine starts.
pub const TEMPO_CRASH_CHANNEL_PIPE_NAME: &str = r"\\.\pipe\tempo-crash-handler";

/// Default report channel on POSIX: a Unix domain socket bound by the
/// companion process before the engine starts.
pub const TEMPO_CRASH_CHANNEL_SOCKET_PATH: &str = "/tmp/tempo-crash-handler.sock";

/// Marks the end of a fault-description message. The reporter writes exactly
/// one description followed by this byte, then closes the channel.
pub const REPORT_TERMINATOR: u8 = 0;

/// Upper bound on how long a channel write may stall. The process is already
/// dying; a wedged listener must not keep the fault invisible.
pub const CHANNEL_WRITE_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Where the optional minidump lands when enabled (Windows only).
pub const DEFAULT_MINIDUMP_PATH: &str = "crash.dmp";
