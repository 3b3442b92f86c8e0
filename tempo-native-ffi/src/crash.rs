// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

use crate::slice::{AsBytes, CharSlice};
use crate::{wrap_with_void_ffi_result, VoidResult};
use function_name::named;
use tempo_crash_handler::{CrashHandlerConfiguration, SelfTestFault};

#[repr(C)]
pub struct CrashHandlerConfig<'a> {
    /// Name of the report channel the handler opens at fault time. An empty
    /// slice selects the well-known default.
    pub channel_path: CharSlice<'a>,
    /// Whether to capture a minidump before reporting (Windows only).
    pub write_minidump: bool,
    /// Where the minidump lands when enabled; empty selects the default.
    pub minidump_path: CharSlice<'a>,
}

impl<'a> TryFrom<CrashHandlerConfig<'a>> for CrashHandlerConfiguration {
    type Error = anyhow::Error;
    fn try_from(value: CrashHandlerConfig<'a>) -> anyhow::Result<Self> {
        let channel_path = value.channel_path.try_to_string_option()?;
        let minidump_path = value.minidump_path.try_to_string_option()?;
        Self::new(channel_path, value.write_minidump, minidump_path)
    }
}

#[no_mangle]
#[must_use]
#[named]
/// Installs the crash handler as the process's top-level fault interceptor.
/// The handler stays active for the process lifetime; there is no uninstall.
///
/// # Preconditions
///   None. Calling again refreshes the configuration; a subsequent fault is
///   still reported exactly once.
/// # Safety
///   Crash-handling functions are not reentrant.
///   No other crash-handler functions should be called concurrently.
/// # Atomicity
///   This function is not atomic. A crash during its execution may lead to
///   unexpected fault-handling behaviour.
pub unsafe extern "C" fn tempo_crash_install(config: CrashHandlerConfig) -> VoidResult {
    wrap_with_void_ffi_result!({
        tempo_crash_handler::install(config.try_into()?)?;
    })
}

#[no_mangle]
/// Triggers a deliberate fault to exercise the installed handler end-to-end.
/// Verification only; the process does not survive the call.
pub extern "C" fn tempo_crash_self_test(fault: SelfTestFault) {
    tempo_crash_handler::self_test::trigger(fault);
}
