// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! Guaranteed local visibility for a handled fault.
//!
//! This is the fallback (and, on success, the redundant second copy) of the
//! fault description: a modal message box on Windows, a raw stderr write on
//! POSIX. Messages are assembled in fixed-size buffers; the fault path must
//! not allocate.

/// Large enough for the longest label plus the channel-error scaffolding.
const MESSAGE_CAPACITY: usize = 192;

pub(super) struct MessageBuf {
    bytes: [u8; MESSAGE_CAPACITY],
    len: usize,
}

impl MessageBuf {
    pub(super) const fn new() -> Self {
        Self {
            bytes: [0; MESSAGE_CAPACITY],
            len: 0,
        }
    }

    /// Appends as much of `s` as fits; overflow is silently truncated.
    pub(super) fn push_str(&mut self, s: &str) {
        self.push_bytes(s.as_bytes());
    }

    pub(super) fn push_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.len == MESSAGE_CAPACITY {
                break;
            }
            self.bytes[self.len] = b;
            self.len += 1;
        }
    }

    /// Appends `value` in decimal without going through `core::fmt`.
    pub(super) fn push_decimal(&mut self, value: u32) {
        let mut digits = [0u8; 10];
        let mut n = value;
        let mut count = 0;
        loop {
            digits[count] = b'0' + (n % 10) as u8;
            n /= 10;
            count += 1;
            if n == 0 {
                break;
            }
        }
        while count > 0 {
            count -= 1;
            if self.len == MESSAGE_CAPACITY {
                break;
            }
            self.bytes[self.len] = digits[count];
            self.len += 1;
        }
    }

    pub(super) fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Presents the resolved fault label.
pub(super) fn present_fault(label: &str) {
    let mut message = MessageBuf::new();
    message.push_str(label);
    present(&message);
}

/// Presents a channel failure together with the underlying OS error code.
pub(super) fn present_channel_error(stage: &'static str, os_error: u32) {
    let mut message = MessageBuf::new();
    message.push_str(stage);
    message.push_str(" (os error ");
    message.push_decimal(os_error);
    message.push_str(")");
    present(&message);
}

#[cfg(unix)]
fn present(message: &MessageBuf) {
    // write(2) is async-signal-safe; there is no modal dialog to rely on
    // off-Windows, stderr is the guaranteed visibility mechanism.
    let mut line = MessageBuf::new();
    line.push_str("tempo-crash-handler: ");
    line.push_bytes(message.as_bytes());
    let bytes = line.as_bytes();
    unsafe {
        libc::write(libc::STDERR_FILENO, bytes.as_ptr().cast(), bytes.len());
        libc::write(libc::STDERR_FILENO, b"\n".as_ptr().cast(), 1);
    }
}

#[cfg(windows)]
fn present(message: &MessageBuf) {
    use windows::core::{w, PCWSTR};
    use windows::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

    // Labels and error text are plain ASCII; widening byte-by-byte into a
    // stack buffer keeps the path allocation-free.
    let mut wide = [0u16; MESSAGE_CAPACITY + 1];
    for (i, &b) in message.as_bytes().iter().enumerate() {
        wide[i] = b as u16;
    }
    unsafe {
        MessageBoxW(
            None,
            PCWSTR::from_raw(wide.as_ptr()),
            w!("Tempo Crash Handler"),
            MB_OK | MB_ICONERROR,
        );
    }
}
