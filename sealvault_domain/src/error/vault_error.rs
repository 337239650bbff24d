// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A single, hierarchical error type for every failure the core library can
//! surface across `open`, `save`, and `merge_in`. Errors are categorized so
//! callers can branch on recoverability without matching every variant, and
//! `InvalidCompositeKey` is deliberately indistinguishable from a corrupted
//! stream-start region — leaking which half of a wrong key failed would hand
//! an attacker a free oracle.

use thiserror::Error;

/// Domain-specific errors for the vault engine.
///
/// Each variant corresponds to one of the failure kinds named in the file
/// format and crypto design: header parsing, cipher negotiation, envelope
/// decryption, block-hash framing, body structure, key assembly, and
/// cooperative cancellation.
#[derive(Error, Debug, Clone)]
pub enum VaultError {
    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    #[error("unknown cipher: {0}")]
    UnknownCipher(String),

    #[error("unsupported format version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid composite key")]
    InvalidCompositeKey,

    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    #[error("malformed body: {0}")]
    MalformedBody(String),

    #[error("I/O failure: {0}")]
    IoFailure(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("cancelled")]
    Cancelled,
}

impl VaultError {
    pub fn corrupt_header(msg: impl Into<String>) -> Self {
        Self::CorruptHeader(msg.into())
    }

    pub fn unknown_cipher(msg: impl Into<String>) -> Self {
        Self::UnknownCipher(msg.into())
    }

    pub fn corrupt_payload(msg: impl Into<String>) -> Self {
        Self::CorruptPayload(msg.into())
    }

    pub fn malformed_body(msg: impl Into<String>) -> Self {
        Self::MalformedBody(msg.into())
    }

    pub fn invalid_key(msg: impl Into<String>) -> Self {
        Self::InvalidKey(msg.into())
    }

    /// True for errors a caller could plausibly retry (transient I/O),
    /// false for anything that indicates a structurally bad file or key.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VaultError::IoFailure(_))
    }

    /// True for errors that indicate a security-relevant condition
    /// (wrong key, tampered payload) rather than a plain format bug.
    pub fn is_security_error(&self) -> bool {
        matches!(
            self,
            VaultError::InvalidCompositeKey | VaultError::CorruptPayload(_)
        )
    }

    /// Coarse category label, handy for logging and metrics dimensions.
    pub fn category(&self) -> &'static str {
        match self {
            VaultError::CorruptHeader(_) => "header",
            VaultError::UnknownCipher(_) => "header",
            VaultError::UnsupportedVersion(_) => "header",
            VaultError::InvalidCompositeKey => "key",
            VaultError::CorruptPayload(_) => "payload",
            VaultError::MalformedBody(_) => "body",
            VaultError::IoFailure(_) => "io",
            VaultError::InvalidKey(_) => "key",
            VaultError::Cancelled => "cancellation",
        }
    }
}

impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::IoFailure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrong_key_and_corrupt_payload_are_both_security_errors() {
        assert!(VaultError::InvalidCompositeKey.is_security_error());
        assert!(VaultError::CorruptPayload("block hash mismatch".into()).is_security_error());
        assert!(!VaultError::CorruptHeader("missing field".into()).is_security_error());
    }

    #[test]
    fn io_failure_is_the_only_recoverable_kind() {
        assert!(VaultError::IoFailure("disk full".into()).is_recoverable());
        assert!(!VaultError::InvalidCompositeKey.is_recoverable());
    }
}
