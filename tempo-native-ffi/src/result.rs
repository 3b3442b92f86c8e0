// Copyright 2024-Present the Tempo Engine developers.
// SPDX-License-Identifier: Apache-2.0

use crate::Error;

/// A generic result type for when an operation may fail,
/// but there's nothing to return in the case of success.
#[repr(C)]
pub enum VoidResult {
    Ok(
        /// Do not use the value of Ok. This value only exists to overcome
        /// Rust -> C code generation.
        bool,
    ),
    Err(Error),
}

impl From<anyhow::Result<()>> for VoidResult {
    fn from(value: anyhow::Result<()>) -> Self {
        match value {
            Ok(_) => Self::Ok(true),
            Err(err) => Self::Err(err.into()),
        }
    }
}

impl From<VoidResult> for anyhow::Result<()> {
    fn from(value: VoidResult) -> Self {
        match value {
            VoidResult::Ok(_) => Self::Ok(()),
            VoidResult::Err(err) => Self::Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ok_round_trip() {
        let result: VoidResult = anyhow::Ok(()).into();
        assert!(matches!(result, VoidResult::Ok(_)));
    }

    #[test]
    fn test_err_carries_context() {
        let result: VoidResult = Err(anyhow::anyhow!("pipe name rejected")).into();
        match result {
            VoidResult::Err(err) => assert!(err.as_ref().contains("pipe name rejected")),
            VoidResult::Ok(_) => panic!("expected an error"),
        }
    }
}
