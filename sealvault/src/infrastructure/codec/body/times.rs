// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `<Times>` (§4.6, §3): the five timestamps plus the `expires` flag shared
//! by every `Group` and `Entry`.

use sealvault_domain::value_objects::Timestamps;
use sealvault_domain::VaultError;

use super::values::{bool_from_str, bool_to_str, timestamp_from_str, timestamp_to_string};
use super::xml_tree::{find_child, required_child_text};
use sealvault_domain::value_objects::OpaqueElement;

pub fn parse(el: &OpaqueElement) -> Result<Timestamps, VaultError> {
    let times = find_child(el, "Times").ok_or_else(|| VaultError::malformed_body("missing <Times>"))?;
    Ok(Timestamps {
        creation: timestamp_from_str(required_child_text(times, "CreationTime")?)?,
        last_modification: timestamp_from_str(required_child_text(times, "LastModificationTime")?)?,
        last_access: timestamp_from_str(required_child_text(times, "LastAccessTime")?)?,
        location_changed: timestamp_from_str(required_child_text(times, "LocationChanged")?)?,
        expiry: timestamp_from_str(required_child_text(times, "ExpiryTime")?)?,
        expires: bool_from_str(required_child_text(times, "Expires")?),
    })
}

pub fn to_element(times: &Timestamps) -> OpaqueElement {
    let mut el = OpaqueElement::new("Times");
    push_text(&mut el, "CreationTime", timestamp_to_string(times.creation));
    push_text(&mut el, "LastModificationTime", timestamp_to_string(times.last_modification));
    push_text(&mut el, "LastAccessTime", timestamp_to_string(times.last_access));
    push_text(&mut el, "LocationChanged", timestamp_to_string(times.location_changed));
    push_text(&mut el, "ExpiryTime", timestamp_to_string(times.expiry));
    push_text(&mut el, "Expires", bool_to_str(times.expires).to_string());
    el
}

fn push_text(parent: &mut OpaqueElement, tag: &str, text: String) {
    let mut child = OpaqueElement::new(tag);
    child.text = text;
    parent.children.push(child);
}
