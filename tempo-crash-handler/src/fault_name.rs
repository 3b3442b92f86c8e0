// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

//! Total mapping from platform fault identifiers to fixed labels.
//!
//! The lookup is deliberately infallible: every representable code resolves
//! to *some* static string, with an explicit unknown fallback. The handler
//! runs in a corrupted process, so classification must never allocate,
//! branch deeply, or fail.

#[cfg(unix)]
pub use unix::fault_name;
#[cfg(windows)]
pub use windows::fault_name;

#[cfg(unix)]
mod unix {
    use libc::c_int;

    /// Resolves a fatal signal (and, for SIGFPE/SIGILL, its `si_code`
    /// sub-code) to a descriptive label.
    ///
    /// See <https://man7.org/linux/man-pages/man2/sigaction.2.html> for the
    /// sub-code taxonomy.
    pub fn fault_name(signum: c_int, si_code: c_int) -> &'static str {
        match signum {
            libc::SIGSEGV => "SIGSEGV: Segmentation Fault",
            libc::SIGINT => "SIGINT: Interrupt",
            libc::SIGFPE => match si_code {
                libc::FPE_INTDIV => "SIGFPE: Integer Divide by Zero",
                libc::FPE_INTOVF => "SIGFPE: Integer Overflow",
                libc::FPE_FLTDIV => "SIGFPE: Floating Point Divide by Zero",
                libc::FPE_FLTOVF => "SIGFPE: Floating Point Overflow",
                libc::FPE_FLTUND => "SIGFPE: Floating Point Underflow",
                libc::FPE_FLTRES => "SIGFPE: Floating Point Inexact Result",
                libc::FPE_FLTINV => "SIGFPE: Floating Point Invalid Operation",
                libc::FPE_FLTSUB => "SIGFPE: Subscript Out of Range",
                _ => "SIGFPE: Arithmetic Exception",
            },
            libc::SIGILL => match si_code {
                libc::ILL_ILLOPC => "SIGILL: Illegal Opcode",
                libc::ILL_ILLOPN => "SIGILL: Illegal Operand",
                libc::ILL_ILLADR => "SIGILL: Illegal Address",
                libc::ILL_ILLTRP => "SIGILL: Illegal Trap",
                libc::ILL_PRVOPC => "SIGILL: Privileged Opcode",
                libc::ILL_PRVREG => "SIGILL: Privileged Register",
                libc::ILL_COPROC => "SIGILL: Coprocessor Error",
                libc::ILL_BADSTK => "SIGILL: Internal Stack Error",
                _ => "SIGILL: Illegal Instruction",
            },
            libc::SIGTERM => "SIGTERM: Termination Requested",
            libc::SIGABRT => "SIGABRT: Abnormal Termination",
            _ => "Unknown Signal",
        }
    }

}

#[cfg(windows)]
mod windows {
    use windows::Win32::Foundation;

    // The filter receives the code as a DWORD; the crate models the same
    // values as NTSTATUS.
    const ACCESS_VIOLATION: u32 = Foundation::EXCEPTION_ACCESS_VIOLATION.0 as u32;
    const ARRAY_BOUNDS_EXCEEDED: u32 = Foundation::EXCEPTION_ARRAY_BOUNDS_EXCEEDED.0 as u32;
    const BREAKPOINT: u32 = Foundation::EXCEPTION_BREAKPOINT.0 as u32;
    const DATATYPE_MISALIGNMENT: u32 = Foundation::EXCEPTION_DATATYPE_MISALIGNMENT.0 as u32;
    const FLT_DENORMAL_OPERAND: u32 = Foundation::EXCEPTION_FLT_DENORMAL_OPERAND.0 as u32;
    const FLT_DIVIDE_BY_ZERO: u32 = Foundation::EXCEPTION_FLT_DIVIDE_BY_ZERO.0 as u32;
    const FLT_INEXACT_RESULT: u32 = Foundation::EXCEPTION_FLT_INEXACT_RESULT.0 as u32;
    const FLT_INVALID_OPERATION: u32 = Foundation::EXCEPTION_FLT_INVALID_OPERATION.0 as u32;
    const FLT_OVERFLOW: u32 = Foundation::EXCEPTION_FLT_OVERFLOW.0 as u32;
    const FLT_STACK_CHECK: u32 = Foundation::EXCEPTION_FLT_STACK_CHECK.0 as u32;
    const FLT_UNDERFLOW: u32 = Foundation::EXCEPTION_FLT_UNDERFLOW.0 as u32;
    const ILLEGAL_INSTRUCTION: u32 = Foundation::EXCEPTION_ILLEGAL_INSTRUCTION.0 as u32;
    const IN_PAGE_ERROR: u32 = Foundation::EXCEPTION_IN_PAGE_ERROR.0 as u32;
    const INT_DIVIDE_BY_ZERO: u32 = Foundation::EXCEPTION_INT_DIVIDE_BY_ZERO.0 as u32;
    const INT_OVERFLOW: u32 = Foundation::EXCEPTION_INT_OVERFLOW.0 as u32;
    const INVALID_DISPOSITION: u32 = Foundation::EXCEPTION_INVALID_DISPOSITION.0 as u32;
    const NONCONTINUABLE: u32 = Foundation::EXCEPTION_NONCONTINUABLE_EXCEPTION.0 as u32;
    const PRIV_INSTRUCTION: u32 = Foundation::EXCEPTION_PRIV_INSTRUCTION.0 as u32;
    const SINGLE_STEP: u32 = Foundation::EXCEPTION_SINGLE_STEP.0 as u32;
    const STACK_OVERFLOW: u32 = Foundation::EXCEPTION_STACK_OVERFLOW.0 as u32;

    /// Resolves a structured-exception code to a descriptive label. Windows
    /// codes carry no sub-code: every arithmetic and illegal-instruction
    /// variant is its own top-level code.
    pub fn fault_name(code: u32) -> &'static str {
        match code {
            ACCESS_VIOLATION => "EXCEPTION_ACCESS_VIOLATION",
            ARRAY_BOUNDS_EXCEEDED => "EXCEPTION_ARRAY_BOUNDS_EXCEEDED",
            BREAKPOINT => "EXCEPTION_BREAKPOINT",
            DATATYPE_MISALIGNMENT => "EXCEPTION_DATATYPE_MISALIGNMENT",
            FLT_DENORMAL_OPERAND => "EXCEPTION_FLT_DENORMAL_OPERAND",
            FLT_DIVIDE_BY_ZERO => "EXCEPTION_FLT_DIVIDE_BY_ZERO",
            FLT_INEXACT_RESULT => "EXCEPTION_FLT_INEXACT_RESULT",
            FLT_INVALID_OPERATION => "EXCEPTION_FLT_INVALID_OPERATION",
            FLT_OVERFLOW => "EXCEPTION_FLT_OVERFLOW",
            FLT_STACK_CHECK => "EXCEPTION_FLT_STACK_CHECK",
            FLT_UNDERFLOW => "EXCEPTION_FLT_UNDERFLOW",
            ILLEGAL_INSTRUCTION => "EXCEPTION_ILLEGAL_INSTRUCTION",
            IN_PAGE_ERROR => "EXCEPTION_IN_PAGE_ERROR",
            INT_DIVIDE_BY_ZERO => "EXCEPTION_INT_DIVIDE_BY_ZERO",
            INT_OVERFLOW => "EXCEPTION_INT_OVERFLOW",
            INVALID_DISPOSITION => "EXCEPTION_INVALID_DISPOSITION",
            NONCONTINUABLE => "EXCEPTION_NONCONTINUABLE_EXCEPTION",
            PRIV_INSTRUCTION => "EXCEPTION_PRIV_INSTRUCTION",
            SINGLE_STEP => "EXCEPTION_SINGLE_STEP",
            STACK_OVERFLOW => "EXCEPTION_STACK_OVERFLOW",
            _ => "UNKNOWN EXCEPTION",
        }
    }

}
