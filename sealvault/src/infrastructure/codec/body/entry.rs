// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `<Entry>` (§4.6): scalar fields, the `<String>`/`<Binary>` bags, the
//! `<AutoType>` block, and an optional `<History>` list of prior snapshots.
//! Protected `<String><Value>` elements are the one place this module talks
//! to the inner-stream masker directly, in strict document order — own
//! fields first, then each history snapshot's own fields in order, exactly
//! the sequence the writer used (§4.5 order invariant).

use sealvault_domain::entities::{Entry, STANDARD_FIELDS};
use sealvault_domain::services::InnerStreamMasker;
use sealvault_domain::value_objects::{
    AutoTypeAssociation, AutoTypeSettings, MemoryProtectionConfig, ObfuscationLevel, OpaqueElement,
};
use sealvault_domain::VaultError;

use super::binary_pool::BinaryPool;
use super::times;
use super::values::{bool_from_str, bool_to_str, uuid_from_base64, uuid_to_base64};
use super::xml_tree::{child_text, find_child, required_child_text, splice_unknown_elements};

use base64::Engine;

const SCALAR_CHILD_TAGS: &[&str] = &[
    "UUID",
    "IconID",
    "CustomIconUUID",
    "ForegroundColor",
    "BackgroundColor",
    "OverrideURL",
    "Tags",
    "Times",
    "String",
    "Binary",
    "AutoType",
    "History",
];

/// Parses one `<Entry>` element. `is_history` suppresses recursing into a
/// nested `<History>` block — a history snapshot never nests further
/// history (§3 invariant).
pub fn from_element(
    el: &OpaqueElement,
    masker: &mut InnerStreamMasker,
    process_seed: &[u8],
    pool: &BinaryPool,
    memory_protection: &MemoryProtectionConfig,
    is_history: bool,
) -> Result<Entry, VaultError> {
    let uuid = uuid_from_base64(required_child_text(el, "UUID")?)?;
    if uuid.is_nil() {
        return Err(VaultError::malformed_body("Entry UUID must not be all-zero"));
    }
    let mut entry = Entry::bare(uuid);

    entry.icon_id = child_text(el, "IconID").and_then(|t| t.parse().ok()).unwrap_or(0);
    entry.custom_icon_uuid = child_text(el, "CustomIconUUID").map(uuid_from_base64).transpose()?;
    entry.foreground_color = non_empty(child_text(el, "ForegroundColor"));
    entry.background_color = non_empty(child_text(el, "BackgroundColor"));
    entry.override_url = non_empty(child_text(el, "OverrideURL"));
    entry.tags = child_text(el, "Tags")
        .map(|t| t.split(';').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect())
        .unwrap_or_default();
    entry.times = times::parse(el)?;

    for child in &el.children {
        if child.tag == "String" {
            let name = required_child_text(child, "Key")?.to_string();
            let value_el = find_child(child, "Value").ok_or_else(|| VaultError::malformed_body("String missing Value"))?;
            let protected = value_el
                .attributes
                .iter()
                .any(|(k, v)| k == "Protected" && v.eq_ignore_ascii_case("true"));
            if protected {
                let masked = base64::engine::general_purpose::STANDARD
                    .decode(value_el.text.trim())
                    .map_err(|e| VaultError::malformed_body(format!("bad protected value base64: {e}")))?;
                let protected_string = masker.unmask_into_protected(&masked, process_seed);
                entry.set_string(&name, protected_string.read(), true, process_seed);
            } else {
                entry.set_string(&name, value_el.text.clone(), false, process_seed);
            }
        } else if child.tag == "Binary" {
            let name = required_child_text(child, "Key")?.to_string();
            let value_el = find_child(child, "Value").ok_or_else(|| VaultError::malformed_body("Binary missing Value"))?;
            let reference: usize = value_el
                .attributes
                .iter()
                .find(|(k, _)| k == "Ref")
                .and_then(|(_, v)| v.parse().ok())
                .ok_or_else(|| VaultError::malformed_body("Binary Value missing Ref"))?;
            entry.set_binary(&name, pool.get(reference)?.to_vec());
        }
    }

    if let Some(auto_type_el) = find_child(el, "AutoType") {
        entry.auto_type = parse_auto_type(auto_type_el);
    }

    if !is_history {
        if let Some(history_el) = find_child(el, "History") {
            for child in &history_el.children {
                if child.tag == "Entry" {
                    let snapshot = from_element(child, masker, process_seed, pool, memory_protection, true)?;
                    entry.push_history_snapshot(snapshot);
                }
            }
        }
    }

    let protect_flags = [
        memory_protection.title,
        memory_protection.user_name,
        memory_protection.password,
        memory_protection.url,
        memory_protection.notes,
    ];
    for (name, protect) in STANDARD_FIELDS.iter().zip(protect_flags) {
        if entry.get_string(name).is_none() {
            entry.set_string(name, "", protect, process_seed);
        }
    }

    entry.unknown_elements = el
        .children
        .iter()
        .enumerate()
        .filter(|(_, c)| !SCALAR_CHILD_TAGS.contains(&c.tag.as_str()))
        .map(|(index, c)| {
            let mut c = c.clone();
            c.source_index = index;
            c
        })
        .collect();

    Ok(entry)
}

pub fn to_element(entry: &Entry, masker: &mut InnerStreamMasker, pool: &mut BinaryPool) -> OpaqueElement {
    let mut el = OpaqueElement::new("Entry");
    push_text(&mut el, "UUID", uuid_to_base64(&entry.uuid));
    push_text(&mut el, "IconID", entry.icon_id.to_string());
    if let Some(icon) = entry.custom_icon_uuid {
        push_text(&mut el, "CustomIconUUID", uuid_to_base64(&icon));
    }
    push_text(&mut el, "ForegroundColor", entry.foreground_color.clone().unwrap_or_default());
    push_text(&mut el, "BackgroundColor", entry.background_color.clone().unwrap_or_default());
    push_text(&mut el, "OverrideURL", entry.override_url.clone().unwrap_or_default());
    push_text(&mut el, "Tags", entry.tags.join(";"));
    el.children.push(times::to_element(&entry.times));

    for (name, value) in entry.strings() {
        let mut string_el = OpaqueElement::new("String");
        push_text(&mut string_el, "Key", name.clone());
        let mut value_el = OpaqueElement::new("Value");
        if value.is_protected() {
            value_el.attributes.push(("Protected".to_string(), "True".to_string()));
            let masked = masker.mask(value.read().as_bytes());
            value_el.text = base64::engine::general_purpose::STANDARD.encode(masked);
        } else {
            value_el.text = value.read();
        }
        string_el.children.push(value_el);
        el.children.push(string_el);
    }

    for (name, bytes) in entry.binaries() {
        let reference = pool.intern(bytes.clone());
        let mut binary_el = OpaqueElement::new("Binary");
        push_text(&mut binary_el, "Key", name.clone());
        let mut value_el = OpaqueElement::new("Value");
        value_el.attributes.push(("Ref".to_string(), reference.to_string()));
        binary_el.children.push(value_el);
        el.children.push(binary_el);
    }

    el.children.push(auto_type_to_element(&entry.auto_type));

    if !entry.history().is_empty() {
        let mut history_el = OpaqueElement::new("History");
        for snapshot in entry.history() {
            history_el.children.push(to_element(snapshot, masker, pool));
        }
        el.children.push(history_el);
    }

    el.children = splice_unknown_elements(el.children, &entry.unknown_elements);

    el
}

fn parse_auto_type(el: &OpaqueElement) -> AutoTypeSettings {
    let enabled = child_text(el, "Enabled").map(bool_from_str).unwrap_or(false);
    let obfuscation_level = match child_text(el, "DataTransferObfuscation") {
        Some("1") => ObfuscationLevel::TwoChannelAutoType,
        _ => ObfuscationLevel::None,
    };
    let default_sequence = non_empty(child_text(el, "DefaultSequence"));
    let associations = el
        .children
        .iter()
        .filter(|c| c.tag == "Association")
        .map(|c| AutoTypeAssociation {
            window_pattern: child_text(c, "Window").unwrap_or_default().to_string(),
            sequence: child_text(c, "KeystrokeSequence").unwrap_or_default().to_string(),
        })
        .collect();
    AutoTypeSettings {
        enabled,
        obfuscation_level,
        default_sequence,
        associations,
    }
}

fn auto_type_to_element(auto_type: &AutoTypeSettings) -> OpaqueElement {
    let mut el = OpaqueElement::new("AutoType");
    push_text(&mut el, "Enabled", bool_to_str(auto_type.enabled).to_string());
    let obfuscation = match auto_type.obfuscation_level {
        ObfuscationLevel::None => "0",
        ObfuscationLevel::TwoChannelAutoType => "1",
    };
    push_text(&mut el, "DataTransferObfuscation", obfuscation.to_string());
    if let Some(sequence) = &auto_type.default_sequence {
        push_text(&mut el, "DefaultSequence", sequence.clone());
    }
    for assoc in &auto_type.associations {
        let mut assoc_el = OpaqueElement::new("Association");
        push_text(&mut assoc_el, "Window", assoc.window_pattern.clone());
        push_text(&mut assoc_el, "KeystrokeSequence", assoc.sequence.clone());
        el.children.push(assoc_el);
    }
    el
}

fn push_text(parent: &mut OpaqueElement, tag: &str, text: String) {
    let mut child = OpaqueElement::new(tag);
    child.text = text;
    parent.children.push(child);
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.filter(|t| !t.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_standard_fields_and_protected_password() {
        let mut entry = Entry::new(&MemoryProtectionConfig::default(), b"process-seed");
        entry.set_string("Title", "Site", false, b"process-seed");
        entry.set_string("Password", "p4ss!", true, b"process-seed");

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let element = to_element(&entry, &mut writer, &mut pool);

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let parsed = from_element(&element, &mut reader, b"process-seed", &pool, &MemoryProtectionConfig::default(), false).unwrap();

        assert_eq!(parsed.uuid, entry.uuid);
        assert_eq!(parsed.get_string("Title").unwrap().read(), "Site");
        assert_eq!(parsed.get_string("Password").unwrap().read(), "p4ss!");
        assert!(parsed.get_string("Password").unwrap().is_protected());
    }

    #[test]
    fn round_trips_history_snapshots_in_order() {
        let mut entry = Entry::new(&MemoryProtectionConfig::default(), b"seed");
        entry.set_string("Title", "first", false, b"seed");
        entry.record_edit(chrono::Utc::now());
        entry.set_string("Title", "second", false, b"seed");

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let element = to_element(&entry, &mut writer, &mut pool);

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let parsed = from_element(&element, &mut reader, b"seed", &pool, &MemoryProtectionConfig::default(), false).unwrap();

        assert_eq!(parsed.history().len(), 1);
        assert_eq!(parsed.history()[0].get_string("Title").unwrap().read(), "first");
        assert!(parsed.history()[0].history().is_empty());
    }

    #[test]
    fn round_trips_binary_attachments_through_the_pool() {
        let mut entry = Entry::new(&MemoryProtectionConfig::default(), b"seed");
        entry.set_binary("attachment.txt", b"file contents".to_vec());

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let element = to_element(&entry, &mut writer, &mut pool);

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let parsed = from_element(&element, &mut reader, b"seed", &pool, &MemoryProtectionConfig::default(), false).unwrap();
        assert_eq!(parsed.binaries(), &[("attachment.txt".to_string(), b"file contents".to_vec())]);
    }

    #[test]
    fn rejects_a_nil_uuid() {
        let mut entry = Entry::new(&MemoryProtectionConfig::default(), b"seed");
        entry.uuid = sealvault_domain::value_objects::EntityId::nil();

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let element = to_element(&entry, &mut writer, &mut pool);

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let err = from_element(&element, &mut reader, b"seed", &pool, &MemoryProtectionConfig::default(), false).unwrap_err();
        assert!(matches!(err, VaultError::MalformedBody(_)));
    }

    #[test]
    fn backfills_absent_standard_fields_as_empty() {
        let mut el = OpaqueElement::new("Entry");
        el.children.push({
            let mut uuid_el = OpaqueElement::new("UUID");
            uuid_el.text = uuid_to_base64(&sealvault_domain::value_objects::EntityId::new());
            uuid_el
        });
        el.children.push(times::to_element(&sealvault_domain::value_objects::Timestamps::now()));
        let mut title_el = OpaqueElement::new("String");
        title_el.children.push({
            let mut key = OpaqueElement::new("Key");
            key.text = "Title".to_string();
            key
        });
        title_el.children.push({
            let mut value = OpaqueElement::new("Value");
            value.text = "Only Title".to_string();
            value
        });
        el.children.push(title_el);

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let pool = BinaryPool::new();
        let protection = MemoryProtectionConfig::default();
        let parsed = from_element(&el, &mut reader, b"seed", &pool, &protection, false).unwrap();

        for name in STANDARD_FIELDS {
            assert_eq!(parsed.get_string(name).unwrap().read(), if name == "Title" { "Only Title" } else { "" });
        }
        assert!(parsed.get_string("Password").unwrap().is_protected());
    }

    #[test]
    fn unknown_elements_splice_back_into_their_original_slot() {
        let mut entry = Entry::new(&MemoryProtectionConfig::default(), b"seed");
        entry.set_string("Title", "Site", false, b"seed");

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let mut element = to_element(&entry, &mut writer, &mut pool);
        let icon_index = element.children.iter().position(|c| c.tag == "IconID").unwrap();
        element.children.insert(icon_index + 1, {
            let mut future = OpaqueElement::new("QualityCheck");
            future.text = "0".to_string();
            future
        });

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let parsed = from_element(&element, &mut reader, b"seed", &pool, &MemoryProtectionConfig::default(), false).unwrap();

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let re_emitted = to_element(&parsed, &mut writer, &mut pool);
        let emitted_index = re_emitted.children.iter().position(|c| c.tag == "QualityCheck").unwrap();
        assert_eq!(emitted_index, icon_index + 1);
    }
}
