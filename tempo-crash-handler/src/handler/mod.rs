// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! Install-time state and the shared reporting flow.
//!
//! Note that the fault path below restricts itself to async-signal-safe
//! operations: the descriptor lookup is a static match, the channel state is
//! precomputed at install time, and the only mutations are atomic swaps.
//! Nothing set up here is ever dropped once a fault is being handled.

mod channel;
mod presentation;
#[cfg(windows)]
mod minidump;
#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

use crate::configuration::CrashHandlerConfiguration;
use channel::{PreparedReport, ReportChannel};
use std::ptr;
use std::sync::atomic::Ordering::SeqCst;
use std::sync::atomic::{AtomicBool, AtomicPtr, AtomicU64};

// Process-lifetime singleton state with init-on-install semantics. Mutexes
// are off-limits inside a fault handler, so an `AtomicPtr` holds the
// configuration; it is only ever null or a leaked `Box::into_raw`.
static STATE: AtomicPtr<(CrashHandlerConfiguration, PreparedReport)> =
    AtomicPtr::new(ptr::null_mut());
static INSTALL_STARTED: AtomicBool = AtomicBool::new(false);
// One-time guard: at most one fault is reported per process.
static FAULTS_HANDLED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, thiserror::Error)]
pub enum FaultHandlerError {
    #[error("no fault handler configuration available")]
    NoConfiguration,
}

/// Registers the reporter as the process's top-level fault interceptor.
///
/// Installing is idempotent: a second call refreshes the stored configuration
/// and leaves the existing registration in place, so a subsequent fault is
/// still reported exactly once. There is no uninstall; the reporter stays
/// active for the lifetime of the process.
///
/// PRECONDITIONS:
///     None
/// SAFETY:
///     Fault-handling functions are not guaranteed to be reentrant.
///     No other fault-handler functions should be called concurrently.
/// ATOMICITY:
///     The configuration swap is atomic, the registration itself is not. A
///     fault that lands in between is handled by whichever interceptor is
///     current at that instant.
pub fn install(config: CrashHandlerConfiguration) -> anyhow::Result<()> {
    let prepared = PreparedReport::new(&config);
    let state = Box::into_raw(Box::new((config, prepared)));
    let old = STATE.swap(state, SeqCst);
    if !old.is_null() {
        // Safety: this can only come from the box above.
        unsafe { drop(Box::from_raw(old)) };
    }

    if INSTALL_STARTED.swap(true, SeqCst) {
        log::debug!("fault handler already installed, configuration updated");
        return Ok(());
    }

    #[cfg(unix)]
    if let Err(e) = unix::register_fault_handlers() {
        INSTALL_STARTED.store(false, SeqCst);
        return Err(e);
    }
    #[cfg(windows)]
    windows::register();

    log::debug!("fault handler installed");
    Ok(())
}

/// The two-step delivery flow: attempt to reach the external listener, then
/// guarantee local visibility regardless of the outcome. External delivery is
/// opportunistic; a single attempt, no retries.
fn report_fault(label: &'static str, prepared: &PreparedReport) {
    match ReportChannel::open(prepared) {
        Err(os_error) => {
            presentation::present_channel_error(
                "failed to open the crash report channel",
                os_error,
            );
        }
        Ok(mut channel) => {
            match channel.write_report(label) {
                Err(os_error) => presentation::present_channel_error(
                    "failed to write to the crash report channel",
                    os_error,
                ),
                // The label is presented locally even when delivery
                // succeeded; the listener's side is fire-and-forget.
                Ok(()) => presentation::present_fault(label),
            }
            // Channel closes when it drops, within this invocation.
        }
    }
}
