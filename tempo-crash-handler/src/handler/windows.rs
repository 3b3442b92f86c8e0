// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

#![cfg(windows)]

//! Windows fault interception via the top-level unhandled exception filter.

use crate::fault_name::fault_name;
use crate::handler::{minidump, FaultHandlerError};
use std::ptr;
use std::sync::atomic::Ordering::SeqCst;
use windows::Win32::System::Diagnostics::Debug::{
    SetUnhandledExceptionFilter, EXCEPTION_POINTERS,
};

// winnt: tell the dispatcher the fault is handled; no further default
// processing, no resumption.
const EXCEPTION_EXECUTE_HANDLER: i32 = 1;

/// Registers the filter. The previous registration, if any, is replaced; the
/// most recently installed filter is the only one that fires.
pub(super) fn register() {
    // Safety: replacing the process-wide filter has no preconditions.
    unsafe { SetUnhandledExceptionFilter(Some(unhandled_exception_filter)) };
}

unsafe extern "system" fn unhandled_exception_filter(
    exception_info: *const EXCEPTION_POINTERS,
) -> i32 {
    let _ = handle_exception_impl(exception_info);
    // The process is expected to terminate once the dispatcher sees this.
    EXCEPTION_EXECUTE_HANDLER
}

unsafe fn handle_exception_impl(
    exception_info: *const EXCEPTION_POINTERS,
) -> Result<(), FaultHandlerError> {
    // One report per process; a fault inside the reporting path comes back
    // here and is swallowed.
    if super::FAULTS_HANDLED.fetch_add(1, SeqCst) > 0 {
        return Ok(());
    }

    // Claim the state and leak it: nothing may be dropped during a crash.
    let state = super::STATE.swap(ptr::null_mut(), SeqCst);
    if state.is_null() {
        return Err(FaultHandlerError::NoConfiguration);
    }
    // Safety: only ever null or a leaked box from `install`.
    let (config, prepared) = &*state;

    if config.write_minidump() {
        // Best-effort: a dump failure must never block the report.
        let _ = minidump::write_minidump(prepared.minidump_path(), exception_info);
    }

    let label = fault_name(exception_code(exception_info));
    super::report_fault(label, prepared);
    Ok(())
}

fn exception_code(exception_info: *const EXCEPTION_POINTERS) -> u32 {
    // A null record still classifies (to the unknown label) rather than
    // faulting a second time.
    unsafe {
        if exception_info.is_null() {
            return 0;
        }
        let record = (*exception_info).ExceptionRecord;
        if record.is_null() {
            return 0;
        }
        (*record).ExceptionCode.0 as u32
    }
}
