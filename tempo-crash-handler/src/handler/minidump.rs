// Copyright 2025-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

#![cfg(windows)]

//! Optional minidump capture, off by default.

use windows::core::PCWSTR;
use windows::Win32::Foundation::{CloseHandle, BOOL, GENERIC_WRITE};
use windows::Win32::Storage::FileSystem::{
    CreateFileW, CREATE_ALWAYS, FILE_ATTRIBUTE_NORMAL, FILE_SHARE_WRITE,
};
use windows::Win32::System::Diagnostics::Debug::{
    MiniDumpWriteDump, EXCEPTION_POINTERS, MINIDUMP_EXCEPTION_INFORMATION, MiniDumpNormal,
};
use windows::Win32::System::Threading::{
    GetCurrentProcess, GetCurrentProcessId, GetCurrentThreadId,
};

/// Writes a `MiniDumpNormal` dump for the faulting thread to `dump_path`
/// (NUL-terminated UTF-16, precomputed at install time).
///
/// # Safety
/// `exception_info` must be null or the pointer handed to the top-level
/// exception filter.
pub(super) unsafe fn write_minidump(
    dump_path: &[u16],
    exception_info: *const EXCEPTION_POINTERS,
) -> windows::core::Result<()> {
    let file = CreateFileW(
        PCWSTR::from_raw(dump_path.as_ptr()),
        GENERIC_WRITE.0,
        FILE_SHARE_WRITE,
        None,
        CREATE_ALWAYS,
        FILE_ATTRIBUTE_NORMAL,
        None,
    )?;

    let exception = MINIDUMP_EXCEPTION_INFORMATION {
        ThreadId: GetCurrentThreadId(),
        ExceptionPointers: exception_info as *mut EXCEPTION_POINTERS,
        ClientPointers: BOOL(0),
    };
    let exception_param = if exception_info.is_null() {
        None
    } else {
        Some(&exception as *const MINIDUMP_EXCEPTION_INFORMATION)
    };

    let result = MiniDumpWriteDump(
        GetCurrentProcess(),
        GetCurrentProcessId(),
        file,
        MiniDumpNormal,
        exception_param,
        None,
        None,
    );
    let _ = CloseHandle(file);
    result
}
