// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Platform Abstraction
//!
//! OS-specific identity lookups the bootstrap layer needs and the domain
//! layer must not perform itself (§5: the domain crate never touches the
//! OS directly). Today that's exactly one thing: the user and machine
//! identifiers that feed composite-key source #3 (§4.1 "OS-account
//! token").
//!
//! Compile-time platform selection, same pattern as the rest of the
//! bootstrap layer: a `Platform` trait, one implementation per OS family,
//! and a `create_platform()` factory that picks the right one via `cfg`.

#[cfg(unix)]
mod unix;

#[cfg(unix)]
pub use unix::UnixPlatform;

#[cfg(not(unix))]
mod fallback;

#[cfg(not(unix))]
pub use fallback::FallbackPlatform;

/// OS-account identity the composite-key service hashes into the
/// OS-account token source (§4.1).
pub trait Platform: Send + Sync {
    /// A platform-stable identifier for the current user. Stable across
    /// runs on the same machine; not guaranteed stable across machines.
    fn user_identifier(&self) -> String;

    /// A platform-stable identifier for the current machine.
    fn machine_identifier(&self) -> String;

    fn platform_name(&self) -> &'static str;
}

#[cfg(unix)]
type PlatformImpl = UnixPlatform;

#[cfg(not(unix))]
type PlatformImpl = FallbackPlatform;

/// Returns the platform implementation for the current OS, selected at
/// compile time.
pub fn create_platform() -> Box<dyn Platform> {
    Box::new(PlatformImpl::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_non_empty_and_stable_across_calls() {
        let platform = create_platform();
        let user_a = platform.user_identifier();
        let user_b = platform.user_identifier();
        assert!(!user_a.is_empty());
        assert_eq!(user_a, user_b);

        let machine_a = platform.machine_identifier();
        assert!(!machine_a.is_empty());
        assert_eq!(machine_a, platform.machine_identifier());
    }

    #[test]
    fn platform_name_is_not_empty() {
        assert!(!create_platform().platform_name().is_empty());
    }
}
