// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Per-entity timestamps (§3): creation, last-modification, last-access,
//! expiry (gated by a flag), and the location-changed marker used by moves.

use chrono::{DateTime, Utc};

/// The five timestamps (four instants plus the `expires` flag) every group
/// and entry carries, plus the move-tracking `location_changed` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamps {
    pub creation: DateTime<Utc>,
    pub last_modification: DateTime<Utc>,
    pub last_access: DateTime<Utc>,
    pub location_changed: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
    pub expires: bool,
}

impl Timestamps {
    /// All five fields set to `now`, `expires = false`. Used by `new()`
    /// constructors across the entity model.
    pub fn now() -> Self {
        let now = Self::truncate_to_seconds(Utc::now());
        Self {
            creation: now,
            last_modification: now,
            last_access: now,
            location_changed: now,
            expiry: now,
            expires: false,
        }
    }

    /// Timestamps in the body codec are UTC at second granularity (§3); any
    /// sub-second component surviving a round-trip would break the equality
    /// law in §8, so every constructed instant is truncated here.
    pub fn truncate_to_seconds(instant: DateTime<Utc>) -> DateTime<Utc> {
        DateTime::from_timestamp(instant.timestamp(), 0).unwrap_or(instant)
    }

    /// Whether `expiry` has passed, given the `expires` gate (§3: "expiry is
    /// read only when the flag is true").
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires && self.expiry <= now
    }

    /// Stamps `last_modification` (and, implicitly, the caller pushes the
    /// pre-edit snapshot to history separately — see `Entry::record_edit`).
    pub fn touch_modified(&mut self, at: DateTime<Utc>) {
        self.last_modification = Self::truncate_to_seconds(at);
    }

    pub fn touch_accessed(&mut self, at: DateTime<Utc>) {
        self.last_access = Self::truncate_to_seconds(at);
    }

    pub fn touch_location_changed(&mut self, at: DateTime<Utc>) {
        self.location_changed = Self::truncate_to_seconds(at);
    }
}

/// Three-valued inheritance flag used by `Group::enable_auto_type` and
/// `Group::enable_searching` (§3): a group may explicitly enable, disable,
/// or defer to its parent's setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Inherit,
    Enabled,
    Disabled,
}

impl Default for TriState {
    fn default() -> Self {
        TriState::Inherit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn now_truncates_to_whole_seconds() {
        let ts = Timestamps::now();
        assert_eq!(ts.creation.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn expiry_is_only_honored_when_expires_is_set() {
        let mut ts = Timestamps::now();
        ts.expiry = ts.creation - Duration::seconds(10);
        assert!(!ts.is_expired_at(Utc::now()));
        ts.expires = true;
        assert!(ts.is_expired_at(Utc::now()));
    }
}
