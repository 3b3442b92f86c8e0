// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

#![cfg(unix)]

//! POSIX fault interception.
//!
//! The fault path uses only async-signal-safe operations
//! (<https://man7.org/linux/man-pages/man7/signal-safety.7.html>):
//! connect/write/close on the report channel, write(2) to stderr, sigaction
//! and raise for the hand-off to the default disposition.

use crate::fault_name::fault_name;
use crate::handler::FaultHandlerError;
use anyhow::Context;
use libc::{c_int, c_void, siginfo_t, MAP_ANON, MAP_PRIVATE, PROT_NONE, PROT_READ, PROT_WRITE};
use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};
use std::ptr;
use std::sync::atomic::Ordering::SeqCst;

/// The signals the reporter intercepts. Everything else keeps its previous
/// disposition and classifies as "Unknown Signal" if it ever reaches us.
const FATAL_SIGNALS: [Signal; 6] = [
    Signal::SIGSEGV,
    Signal::SIGINT,
    Signal::SIGFPE,
    Signal::SIGILL,
    Signal::SIGTERM,
    Signal::SIGABRT,
];

/// Registers the fault handler for every signal in [`FATAL_SIGNALS`], running
/// it on a dedicated alternate stack so stack exhaustion is still reportable.
pub(super) fn register_fault_handlers() -> anyhow::Result<()> {
    // Safety: this function has no documented preconditions.
    unsafe { create_alt_stack()? };

    let sig_action = SigAction::new(
        SigHandler::SigAction(handle_fatal_signal),
        SaFlags::SA_NODEFER | SaFlags::SA_ONSTACK,
        SigSet::empty(),
    );
    for signal in FATAL_SIGNALS {
        // Safety: the handler below restricts itself to signal-safe calls.
        unsafe { signal::sigaction(signal, &sig_action) }
            .with_context(|| format!("failed to register the fault handler for {signal:?}"))?;
    }
    Ok(())
}

/// Allocates the alternate signal stack, with a guard page at the low end.
/// The default SIGSTKSZ (8KB on most targets) is too tight for the channel
/// machinery, so the stack is sized to at least 16 pages.
unsafe fn create_alt_stack() -> anyhow::Result<()> {
    let page_size = match libc::sysconf(libc::_SC_PAGESIZE) {
        n if n > 0 => n as usize,
        _ => 4096,
    };
    let stack_size = std::cmp::max(libc::SIGSTKSZ, 16 * page_size);
    let stackp = libc::mmap(
        ptr::null_mut(),
        stack_size + page_size,
        PROT_READ | PROT_WRITE,
        MAP_PRIVATE | MAP_ANON,
        -1,
        0,
    );
    anyhow::ensure!(
        stackp != libc::MAP_FAILED,
        "failed to allocate the alternate signal stack"
    );
    let guard_result = libc::mprotect(stackp, page_size, PROT_NONE);
    anyhow::ensure!(
        guard_result == 0,
        "failed to set up the alternate stack guard page"
    );
    let stackp = stackp.add(page_size);

    let stack = libc::stack_t {
        ss_sp: stackp,
        ss_flags: 0,
        ss_size: stack_size,
    };
    let rval = libc::sigaltstack(&stack, ptr::null_mut());
    anyhow::ensure!(rval == 0, "sigaltstack failed {rval}");
    Ok(())
}

extern "C" fn handle_fatal_signal(signum: c_int, sig_info: *mut siginfo_t, _ucontext: *mut c_void) {
    // Report (guarded to at most once per process), then hand the signal to
    // its default disposition so the process terminates; the reporter never
    // resumes execution.
    let _ = handle_fatal_signal_impl(signum, sig_info);
    // SAFETY: no preconditions.
    unsafe { raise_default(signum) };
}

fn handle_fatal_signal_impl(
    signum: c_int,
    sig_info: *const siginfo_t,
) -> Result<(), FaultHandlerError> {
    // A fault inside this handler lands here again (SA_NODEFER) and is
    // swallowed by the one-time guard; the re-raise below still runs.
    if super::FAULTS_HANDLED.fetch_add(1, SeqCst) > 0 {
        return Ok(());
    }

    // Claim the state and leak it: nothing may be dropped during a crash.
    let state = super::STATE.swap(ptr::null_mut(), SeqCst);
    if state.is_null() {
        return Err(FaultHandlerError::NoConfiguration);
    }
    // Safety: only ever null or a leaked box from `install`.
    let (_config, prepared) = unsafe { &*state };

    let si_code = if sig_info.is_null() {
        0
    } else {
        // Safety: the kernel hands us a valid siginfo_t (SA_SIGINFO).
        unsafe { (*sig_info).si_code }
    };
    let label = fault_name(signum, si_code);
    super::report_fault(label, prepared);
    Ok(())
}

/// Restores the default disposition and re-raises, so the process ends the
/// way it would have without the reporter (core dump included, where
/// enabled). `_exit` is the backstop if the signal somehow does not end us.
unsafe fn raise_default(signum: c_int) -> ! {
    if let Ok(signal) = Signal::try_from(signum) {
        let sig_action = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
        let _ = signal::sigaction(signal, &sig_action);
        let _ = libc::raise(signum);
    }
    libc::_exit(128 + signum);
}
