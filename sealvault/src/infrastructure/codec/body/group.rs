// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `<Group>` (§4.6): scalar fields followed by child `<Group>` and
//! `<Entry>` elements. Children are converted in two passes — every direct
//! `<Entry>` first, then every direct `<Group>` — so the inner-stream
//! masker is always consumed in "own entries before child groups" order
//! (§4.5), matching `Group::walk_pre_order` regardless of how the two
//! element kinds happened to interleave on disk.

use sealvault_domain::entities::Group;
use sealvault_domain::services::InnerStreamMasker;
use sealvault_domain::value_objects::{MemoryProtectionConfig, OpaqueElement, TriState};
use sealvault_domain::VaultError;

use super::binary_pool::BinaryPool;
use super::entry;
use super::times;
use super::values::{bool_from_str, bool_to_str, tristate_from_str, tristate_to_str, uuid_from_base64, uuid_to_base64};
use super::xml_tree::{child_text, find_child, required_child_text, splice_unknown_elements};

const SCALAR_CHILD_TAGS: &[&str] = &[
    "UUID",
    "Name",
    "Notes",
    "IconID",
    "CustomIconUUID",
    "Times",
    "IsExpanded",
    "DefaultAutoTypeSequence",
    "EnableAutoType",
    "EnableSearching",
    "LastTopVisibleEntry",
    "Group",
    "Entry",
];

pub fn from_element(
    el: &OpaqueElement,
    masker: &mut InnerStreamMasker,
    process_seed: &[u8],
    pool: &BinaryPool,
    memory_protection: &MemoryProtectionConfig,
) -> Result<Group, VaultError> {
    let uuid = uuid_from_base64(required_child_text(el, "UUID")?)?;
    if uuid.is_nil() {
        return Err(VaultError::malformed_body("Group UUID must not be all-zero"));
    }
    let mut group = Group::new(required_child_text(el, "Name")?);
    group.uuid = uuid;
    group.notes = child_text(el, "Notes").unwrap_or_default().to_string();
    group.icon_id = child_text(el, "IconID").and_then(|t| t.parse().ok()).unwrap_or(0);
    group.custom_icon_uuid = child_text(el, "CustomIconUUID").map(uuid_from_base64).transpose()?;
    group.times = times::parse(el)?;
    group.expanded = child_text(el, "IsExpanded").map(bool_from_str).unwrap_or(true);
    group.default_auto_type_sequence = child_text(el, "DefaultAutoTypeSequence")
        .filter(|t| !t.is_empty())
        .map(str::to_string);
    group.enable_auto_type = child_text(el, "EnableAutoType").map(tristate_from_str).unwrap_or(TriState::Inherit);
    group.enable_searching = child_text(el, "EnableSearching").map(tristate_from_str).unwrap_or(TriState::Inherit);
    group.last_top_visible_entry = child_text(el, "LastTopVisibleEntry")
        .filter(|t| !t.is_empty())
        .map(uuid_from_base64)
        .transpose()?;

    for child in &el.children {
        if child.tag == "Entry" {
            group.entries.push(entry::from_element(child, masker, process_seed, pool, memory_protection, false)?);
        }
    }
    for child in &el.children {
        if child.tag == "Group" {
            group.groups.push(from_element(child, masker, process_seed, pool, memory_protection)?);
        }
    }

    group.unknown_elements = el
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

    Ok(group)
}

pub fn to_element(group: &Group, masker: &mut InnerStreamMasker, pool: &mut BinaryPool) -> OpaqueElement {
    let mut el = OpaqueElement::new("Group");
    push_text(&mut el, "UUID", uuid_to_base64(&group.uuid));
    push_text(&mut el, "Name", group.name.clone());
    push_text(&mut el, "Notes", group.notes.clone());
    push_text(&mut el, "IconID", group.icon_id.to_string());
    if let Some(icon) = group.custom_icon_uuid {
        push_text(&mut el, "CustomIconUUID", uuid_to_base64(&icon));
    }
    el.children.push(times::to_element(&group.times));
    push_text(&mut el, "IsExpanded", bool_to_str(group.expanded).to_string());
    push_text(&mut el, "DefaultAutoTypeSequence", group.default_auto_type_sequence.clone().unwrap_or_default());
    push_text(&mut el, "EnableAutoType", tristate_to_str(group.enable_auto_type).to_string());
    push_text(&mut el, "EnableSearching", tristate_to_str(group.enable_searching).to_string());
    if let Some(last) = group.last_top_visible_entry {
        push_text(&mut el, "LastTopVisibleEntry", uuid_to_base64(&last));
    }

    for entry in &group.entries {
        el.children.push(entry::to_element(entry, masker, pool));
    }
    for child in &group.groups {
        el.children.push(to_element(child, masker, pool));
    }

    el.children = splice_unknown_elements(el.children, &group.unknown_elements);

    el
}

fn push_text(parent: &mut OpaqueElement, tag: &str, text: String) {
    let mut child = OpaqueElement::new(tag);
    child.text = text;
    parent.children.push(child);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealvault_domain::entities::Entry as DomainEntry;

    #[test]
    fn round_trips_nested_groups_and_entries_in_masker_order() {
        let mut root = Group::new_root();
        root.entries.push(DomainEntry::new(&MemoryProtectionConfig::default(), b"seed"));
        let mut child = Group::new("Child");
        child.entries.push(DomainEntry::new(&MemoryProtectionConfig::default(), b"seed"));
        root.groups.push(child);

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let element = to_element(&root, &mut writer, &mut pool);

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let parsed = from_element(&element, &mut reader, b"seed", &pool, &MemoryProtectionConfig::default()).unwrap();

        assert_eq!(parsed.entry_count(), 2);
        assert_eq!(parsed.groups.len(), 1);
        assert_eq!(parsed.groups[0].name, "Child");
    }

    #[test]
    fn rejects_a_nil_uuid() {
        let mut root = Group::new_root();
        root.uuid = sealvault_domain::value_objects::EntityId::nil();

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let element = to_element(&root, &mut writer, &mut pool);

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let err = from_element(&element, &mut reader, b"seed", &pool, &MemoryProtectionConfig::default()).unwrap_err();
        assert!(matches!(err, VaultError::MalformedBody(_)));
    }

    #[test]
    fn unknown_elements_splice_back_into_their_original_slot() {
        let root = Group::new_root();

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let mut element = to_element(&root, &mut writer, &mut pool);
        let name_index = element.children.iter().position(|c| c.tag == "Name").unwrap();
        element.children.insert(name_index + 1, {
            let mut future = OpaqueElement::new("Tags");
            future.text = "future".to_string();
            future
        });

        let mut reader = InnerStreamMasker::new(b"stream-key");
        let parsed = from_element(&element, &mut reader, b"seed", &pool, &MemoryProtectionConfig::default()).unwrap();

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let mut pool = BinaryPool::new();
        let re_emitted = to_element(&parsed, &mut writer, &mut pool);
        let emitted_index = re_emitted.children.iter().position(|c| c.tag == "Tags").unwrap();
        assert_eq!(emitted_index, name_index + 1);
    }
}
