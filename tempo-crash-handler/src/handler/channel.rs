// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! The report channel: a named byte-stream endpoint to the companion
//! process, opened for a single best-effort write and closed within the same
//! fault-handling invocation.

use crate::configuration::CrashHandlerConfiguration;

/// Everything the fault path needs to reach the channel, precomputed at
/// install time so the handler itself never allocates.
pub(super) struct PreparedReport {
    #[cfg(unix)]
    channel_path: std::path::PathBuf,
    #[cfg(windows)]
    channel_name: Vec<u16>,
    #[cfg(windows)]
    minidump_path: Vec<u16>,
}

impl PreparedReport {
    pub(super) fn new(config: &CrashHandlerConfiguration) -> Self {
        #[cfg(unix)]
        {
            Self {
                channel_path: std::path::PathBuf::from(config.channel_path()),
            }
        }
        #[cfg(windows)]
        {
            Self {
                channel_name: to_wide(config.channel_path()),
                minidump_path: to_wide(config.minidump_path()),
            }
        }
    }

    #[cfg(windows)]
    pub(super) fn minidump_path(&self) -> &[u16] {
        &self.minidump_path
    }
}

#[cfg(windows)]
fn to_wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

#[cfg(unix)]
pub(super) use self::unix::ReportChannel;
#[cfg(windows)]
pub(super) use self::windows::ReportChannel;

#[cfg(unix)]
mod unix {
    use super::*;
    use crate::constants::{CHANNEL_WRITE_TIMEOUT, REPORT_TERMINATOR};
    use std::io::Write;
    use std::os::unix::net::UnixStream;

    /// Open errors and write errors both surface as the raw OS error code so
    /// the presentation layer can show it without formatting machinery.
    pub(in crate::handler) struct ReportChannel {
        stream: UnixStream,
    }

    impl ReportChannel {
        pub(in crate::handler) fn open(prepared: &PreparedReport) -> Result<Self, u32> {
            let stream = UnixStream::connect(&prepared.channel_path).map_err(os_code)?;
            // Bounded, never indefinite: a wedged listener must not stall
            // the dying process.
            let _ = stream.set_write_timeout(Some(CHANNEL_WRITE_TIMEOUT));
            Ok(Self { stream })
        }

        pub(in crate::handler) fn write_report(&mut self, label: &str) -> Result<(), u32> {
            self.stream.write_all(label.as_bytes()).map_err(os_code)?;
            self.stream
                .write_all(&[REPORT_TERMINATOR])
                .map_err(os_code)?;
            self.stream.flush().map_err(os_code)
        }
    }

    fn os_code(e: std::io::Error) -> u32 {
        e.raw_os_error().unwrap_or(0) as u32
    }
}

#[cfg(windows)]
mod windows {
    use super::*;
    use crate::constants::REPORT_TERMINATOR;
    use ::windows::core::PCWSTR;
    use ::windows::Win32::Foundation::{CloseHandle, GENERIC_READ, GENERIC_WRITE, HANDLE};
    use ::windows::Win32::Storage::FileSystem::{
        CreateFileW, WriteFile, FILE_ATTRIBUTE_NORMAL, FILE_SHARE_NONE, OPEN_EXISTING,
    };

    pub(in crate::handler) struct ReportChannel {
        handle: HANDLE,
    }

    impl ReportChannel {
        pub(in crate::handler) fn open(prepared: &PreparedReport) -> Result<Self, u32> {
            // The pipe is bidirectional by contract even though the reporter
            // only ever writes. Opening fails immediately when no listener
            // has created the pipe, which is the bound we want.
            let handle = unsafe {
                CreateFileW(
                    PCWSTR::from_raw(prepared.channel_name.as_ptr()),
                    (GENERIC_READ | GENERIC_WRITE).0,
                    FILE_SHARE_NONE,
                    None,
                    OPEN_EXISTING,
                    FILE_ATTRIBUTE_NORMAL,
                    None,
                )
            }
            .map_err(win32_code)?;
            Ok(Self { handle })
        }

        pub(in crate::handler) fn write_report(&mut self, label: &str) -> Result<(), u32> {
            self.write_all(label.as_bytes())?;
            self.write_all(&[REPORT_TERMINATOR])
        }

        fn write_all(&mut self, bytes: &[u8]) -> Result<(), u32> {
            let mut written = 0u32;
            unsafe { WriteFile(self.handle, Some(bytes), Some(&mut written), None) }
                .map_err(win32_code)?;
            if written as usize != bytes.len() {
                return Err(0);
            }
            Ok(())
        }
    }

    impl Drop for ReportChannel {
        fn drop(&mut self) {
            unsafe {
                let _ = CloseHandle(self.handle);
            }
        }
    }

    fn win32_code(e: ::windows::core::Error) -> u32 {
        // HRESULT_FROM_WIN32 keeps the original code in the low word.
        (e.code().0 & 0xFFFF) as u32
    }
}
