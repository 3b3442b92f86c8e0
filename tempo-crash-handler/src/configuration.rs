// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

use crate::constants;
use serde::{Deserialize, Serialize};

/// The longest socket path accepted on any supported POSIX target
/// (`sun_path` is 104 bytes on the BSDs/macOS, 108 on Linux; one byte is
/// reserved for the terminating NUL).
#[cfg(unix)]
const MAX_SOCKET_PATH_LEN: usize = 103;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrashHandlerConfiguration {
    // Name of the report channel; `None` selects the well-known default.
    channel_path: Option<String>,
    write_minidump: bool,
    minidump_path: Option<String>,
}

impl Default for CrashHandlerConfiguration {
    fn default() -> Self {
        Self {
            channel_path: None,
            write_minidump: false,
            minidump_path: None,
        }
    }
}

impl CrashHandlerConfiguration {
    pub fn new(
        channel_path: Option<String>,
        write_minidump: bool,
        minidump_path: Option<String>,
    ) -> anyhow::Result<Self> {
        if let Some(path) = &channel_path {
            anyhow::ensure!(!path.is_empty(), "channel path must not be empty");
            #[cfg(unix)]
            anyhow::ensure!(
                path.len() <= MAX_SOCKET_PATH_LEN,
                "channel path too long for a socket address ({} > {MAX_SOCKET_PATH_LEN} bytes)",
                path.len()
            );
        }
        if let Some(path) = &minidump_path {
            anyhow::ensure!(!path.is_empty(), "minidump path must not be empty");
        }
        Ok(Self {
            channel_path,
            write_minidump,
            minidump_path,
        })
    }

    /// The channel name to open at fault time, with the well-known default
    /// applied.
    pub fn channel_path(&self) -> &str {
        #[cfg(windows)]
        let default = constants::TEMPO_CRASH_CHANNEL_PIPE_NAME;
        #[cfg(unix)]
        let default = constants::TEMPO_CRASH_CHANNEL_SOCKET_PATH;
        self.channel_path.as_deref().unwrap_or(default)
    }

    pub fn write_minidump(&self) -> bool {
        self.write_minidump
    }

    pub fn minidump_path(&self) -> &str {
        self.minidump_path
            .as_deref()
            .unwrap_or(constants::DEFAULT_MINIDUMP_PATH)
    }
}
