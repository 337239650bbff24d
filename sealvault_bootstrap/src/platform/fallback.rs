// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Non-Unix fallback: environment-variable-based identity lookup. Good
//! enough to feed the composite key's OS-account source; it does not need
//! to be tamper-proof, only stable on the same machine (§4.1).

use super::Platform;

pub struct FallbackPlatform;

impl FallbackPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FallbackPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for FallbackPlatform {
    fn user_identifier(&self) -> String {
        std::env::var("USERNAME")
            .or_else(|_| std::env::var("USER"))
            .unwrap_or_else(|_| "unknown-user".to_string())
    }

    fn machine_identifier(&self) -> String {
        std::env::var("COMPUTERNAME")
            .or_else(|_| std::env::var("HOSTNAME"))
            .unwrap_or_else(|_| "unknown-host".to_string())
    }

    fn platform_name(&self) -> &'static str {
        "unknown"
    }
}
