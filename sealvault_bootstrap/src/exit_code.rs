// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Maps library errors to POSIX-style process exit codes (`sysexits.h`
//! conventions) so the demonstration binary exits with a code a calling
//! script can branch on, rather than always `1`.

use std::process::ExitCode as ProcessExitCode;

use sealvault_domain::VaultError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Ok = 0,
    GeneralError = 1,
    DataError = 65,
    NoInput = 66,
    Unavailable = 69,
    IoError = 74,
    TempFail = 75,
}

impl From<ExitCode> for ProcessExitCode {
    fn from(code: ExitCode) -> Self {
        ProcessExitCode::from(code as u8)
    }
}

/// Classifies a `VaultError` into an exit code using its own
/// `category()`/`is_recoverable()` methods rather than re-deriving the
/// taxonomy here.
pub fn map_error_to_exit_code(error: &VaultError) -> ExitCode {
    match error {
        VaultError::CorruptHeader(_)
        | VaultError::UnknownCipher(_)
        | VaultError::UnsupportedVersion(_)
        | VaultError::CorruptPayload(_)
        | VaultError::MalformedBody(_) => ExitCode::DataError,
        VaultError::InvalidCompositeKey => ExitCode::NoInput,
        VaultError::InvalidKey(_) => ExitCode::DataError,
        VaultError::IoFailure(_) => ExitCode::IoError,
        VaultError::Cancelled => ExitCode::TempFail,
    }
}

pub fn result_to_exit_code<T>(result: Result<T, VaultError>) -> ProcessExitCode {
    match result {
        Ok(_) => ExitCode::Ok.into(),
        Err(error) => {
            tracing::error!(target: "bootstrap", "{error}");
            map_error_to_exit_code(&error).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_composite_key_maps_to_no_input() {
        assert_eq!(map_error_to_exit_code(&VaultError::InvalidCompositeKey), ExitCode::NoInput);
    }

    #[test]
    fn cancelled_maps_to_temp_fail() {
        assert_eq!(map_error_to_exit_code(&VaultError::Cancelled), ExitCode::TempFail);
    }

    #[test]
    fn ok_result_maps_to_zero() {
        let code: ProcessExitCode = result_to_exit_code::<()>(Ok(())).into();
        assert_eq!(format!("{code:?}"), format!("{:?}", ProcessExitCode::from(ExitCode::Ok)));
    }
}
