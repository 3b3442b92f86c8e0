// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! Deliberate-fault triggers.
//!
//! These exist purely to exercise the reporter end-to-end and have no role
//! outside verification. Each trigger genuinely faults (or raises the
//! platform-native equivalent) rather than panicking, so the report travels
//! the same interception path a real crash would.

use std::hint::black_box;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTestFault {
    AccessViolation,
    IntegerDivision,
    StackExhaustion,
    /// Runs all three in order; only the first fault is ever handled.
    Sequence,
}

impl std::str::FromStr for SelfTestFault {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "access_violation" => Ok(Self::AccessViolation),
            "integer_division" => Ok(Self::IntegerDivision),
            "stack_exhaustion" => Ok(Self::StackExhaustion),
            "sequence" => Ok(Self::Sequence),
            _ => Err(anyhow::anyhow!("unknown self-test fault {s:?}")),
        }
    }
}

/// Triggers the requested fault. Does not return: the process either dies
/// through the fault path or aborts.
pub fn trigger(fault: SelfTestFault) -> ! {
    match fault {
        SelfTestFault::AccessViolation => unsafe { write_null() },
        SelfTestFault::IntegerDivision => raise_integer_division(),
        SelfTestFault::StackExhaustion => {
            let _ = recurse(0);
        }
        SelfTestFault::Sequence => {
            unsafe { write_null() };
            raise_integer_division();
            let _ = recurse(0);
        }
    }
    // Reached only if every trigger somehow failed to fault.
    std::process::abort()
}

/// A memory access violation: a volatile store through a null pointer.
#[inline(never)]
unsafe fn write_null() {
    let p: *mut u32 = black_box(std::ptr::null_mut());
    p.write_volatile(black_box(1));
}

/// An integer division trap. Checked arithmetic means safe code cannot reach
/// the hardware fault, so the platform primitive raises the same code.
fn raise_integer_division() {
    #[cfg(unix)]
    // Safety: raising a signal at ourselves has no preconditions.
    unsafe {
        libc::raise(libc::SIGFPE);
    }
    #[cfg(windows)]
    {
        const INT_DIVIDE_BY_ZERO: u32 =
            windows::Win32::Foundation::EXCEPTION_INT_DIVIDE_BY_ZERO.0 as u32;
        // Safety: raising a structured exception has no preconditions.
        unsafe {
            windows::Win32::System::Diagnostics::Debug::RaiseException(
                INT_DIVIDE_BY_ZERO,
                0,
                None,
            );
        }
    }
}

#[allow(unconditional_recursion)]
#[inline(never)]
fn recurse(depth: u64) -> u64 {
    // The frame is big enough to defeat tail-call shaping and to exhaust the
    // stack quickly.
    let frame = [depth; 512];
    black_box(&frame);
    recurse(depth + 1).wrapping_add(black_box(frame[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_kind_parsing() {
        assert_eq!(
            "access_violation".parse::<SelfTestFault>().unwrap(),
            SelfTestFault::AccessViolation
        );
        assert_eq!(
            "integer_division".parse::<SelfTestFault>().unwrap(),
            SelfTestFault::IntegerDivision
        );
        assert_eq!(
            "stack_exhaustion".parse::<SelfTestFault>().unwrap(),
            SelfTestFault::StackExhaustion
        );
        assert_eq!(
            "sequence".parse::<SelfTestFault>().unwrap(),
            SelfTestFault::Sequence
        );
        assert!("divide".parse::<SelfTestFault>().is_err());
    }
}
