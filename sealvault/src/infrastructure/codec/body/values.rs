// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Scalar value encodings shared by `meta.rs`, `group.rs`, `entry.rs`, and
//! `times.rs` (§4.6 "Value encoding"): base64 UUIDs, ISO-8601 UTC
//! timestamps, and literal `True`/`False` booleans.

use base64::Engine;
use chrono::{DateTime, Utc};

use sealvault_domain::value_objects::{EntityId, TriState};
use sealvault_domain::VaultError;

pub fn uuid_to_base64(id: &EntityId) -> String {
    base64::engine::general_purpose::STANDARD.encode(id.as_bytes())
}

pub fn uuid_from_base64(text: &str) -> Result<EntityId, VaultError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(text.trim())
        .map_err(|e| VaultError::malformed_body(format!("bad UUID base64: {e}")))?;
    let bytes: [u8; 16] = bytes
        .try_into()
        .map_err(|_| VaultError::malformed_body("UUID did not decode to 16 bytes"))?;
    Ok(EntityId::from_bytes(bytes))
}

pub fn bool_to_str(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

pub fn bool_from_str(text: &str) -> bool {
    text.eq_ignore_ascii_case("true")
}

pub fn tristate_to_str(value: TriState) -> &'static str {
    match value {
        TriState::Inherit => "null",
        TriState::Enabled => "true",
        TriState::Disabled => "false",
    }
}

pub fn tristate_from_str(text: &str) -> TriState {
    match text {
        "true" => TriState::Enabled,
        "false" => TriState::Disabled,
        _ => TriState::Inherit,
    }
}

pub fn timestamp_to_string(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339()
}

pub fn timestamp_from_str(text: &str) -> Result<DateTime<Utc>, VaultError> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| VaultError::malformed_body(format!("bad timestamp {text:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_round_trips_through_base64() {
        let id = EntityId::new();
        let text = uuid_to_base64(&id);
        assert_eq!(uuid_from_base64(&text).unwrap(), id);
    }

    #[test]
    fn nil_uuid_decodes_explicitly() {
        let id = EntityId::nil();
        let text = uuid_to_base64(&id);
        let decoded = uuid_from_base64(&text).unwrap();
        assert!(decoded.is_nil());
    }

    #[test]
    fn bool_round_trips() {
        assert!(bool_from_str(bool_to_str(true)));
        assert!(!bool_from_str(bool_to_str(false)));
    }

    #[test]
    fn tristate_round_trips() {
        for value in [TriState::Inherit, TriState::Enabled, TriState::Disabled] {
            assert_eq!(tristate_from_str(tristate_to_str(value)), value);
        }
    }

    #[test]
    fn timestamp_round_trips_at_second_granularity() {
        let now = sealvault_domain::value_objects::Timestamps::now().creation;
        let text = timestamp_to_string(now);
        assert_eq!(timestamp_from_str(&text).unwrap(), now);
    }
}
