// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `<Meta>` (§4.6, §3 `[SUPPLEMENT]`): database-level settings — name,
//! description, recycle-bin and history-retention configuration, the
//! memory-protection defaults, and the `CustomIcons` pool. None of this
//! touches the inner-stream masker; nothing in `Meta` is a protected
//! string.

use std::collections::HashMap;

use base64::Engine;
use chrono::Utc;

use sealvault_domain::entities::{CustomIcon, Database};
use sealvault_domain::value_objects::{EntityId, MemoryProtectionConfig, OpaqueElement};
use sealvault_domain::VaultError;

use super::values::{bool_from_str, bool_to_str, timestamp_from_str, timestamp_to_string, uuid_from_base64, uuid_to_base64};
use super::xml_tree::{child_text, find_child, required_child_text};

/// Applies every `<Meta>` field onto `db`, leaving `db.root` and
/// `db.deleted` untouched — those belong to `<Root>` (§4.6).
pub fn apply_to(el: &OpaqueElement, db: &mut Database) -> Result<(), VaultError> {
    db.name = child_text(el, "DatabaseName").unwrap_or_default().to_string();
    db.description = child_text(el, "DatabaseDescription").unwrap_or_default().to_string();
    db.default_username = child_text(el, "DefaultUserName").unwrap_or_default().to_string();
    db.color = child_text(el, "Color").filter(|t| !t.is_empty()).map(str::to_string);
    db.maintenance_history_days = child_text(el, "MaintenanceHistoryDays").and_then(|t| t.parse().ok()).unwrap_or(365);
    db.recycle_bin_enabled = child_text(el, "RecycleBinEnabled").map(bool_from_str).unwrap_or(true);
    db.recycle_bin_uuid = child_text(el, "RecycleBinUUID").filter(|t| !t.is_empty()).map(uuid_from_base64).transpose()?;
    db.recycle_bin_changed = child_text(el, "RecycleBinChanged").map(timestamp_from_str).transpose()?.unwrap_or_else(Utc::now);
    db.entry_templates_group = child_text(el, "EntryTemplatesGroup")
        .filter(|t| !t.is_empty())
        .map(uuid_from_base64)
        .transpose()?;
    db.entry_templates_group_changed = child_text(el, "EntryTemplatesGroupChanged")
        .map(timestamp_from_str)
        .transpose()?
        .unwrap_or_else(Utc::now);
    db.last_selected_group = child_text(el, "LastSelectedGroup").filter(|t| !t.is_empty()).map(uuid_from_base64).transpose()?;
    db.last_top_visible_group = child_text(el, "LastTopVisibleGroup").filter(|t| !t.is_empty()).map(uuid_from_base64).transpose()?;
    db.history_max_items = child_text(el, "HistoryMaxItems").and_then(|t| t.parse().ok()).unwrap_or(10);
    db.history_max_size = child_text(el, "HistoryMaxSize").and_then(|t| t.parse().ok()).unwrap_or(6 * 1024 * 1024);

    if let Some(mp) = find_child(el, "MemoryProtection") {
        db.memory_protection = MemoryProtectionConfig {
            title: child_text(mp, "ProtectTitle").map(bool_from_str).unwrap_or(false),
            user_name: child_text(mp, "ProtectUserName").map(bool_from_str).unwrap_or(false),
            password: child_text(mp, "ProtectPassword").map(bool_from_str).unwrap_or(true),
            url: child_text(mp, "ProtectURL").map(bool_from_str).unwrap_or(false),
            notes: child_text(mp, "ProtectNotes").map(bool_from_str).unwrap_or(false),
        };
    }

    db.custom_icons = HashMap::new();
    if let Some(icons) = find_child(el, "CustomIcons") {
        for icon_el in &icons.children {
            if icon_el.tag != "Icon" {
                continue;
            }
            let uuid = uuid_from_base64(required_child_text(icon_el, "UUID")?)?;
            let data = base64::engine::general_purpose::STANDARD
                .decode(required_child_text(icon_el, "Data")?.trim())
                .map_err(|e| VaultError::malformed_body(format!("bad custom icon base64: {e}")))?;
            let name = child_text(icon_el, "Name").unwrap_or_default().to_string();
            let last_modification = child_text(icon_el, "LastModificationTime")
                .map(timestamp_from_str)
                .transpose()?
                .unwrap_or_else(Utc::now);
            db.custom_icons.insert(uuid, CustomIcon { data, name, last_modification });
        }
    }

    Ok(())
}

pub fn to_element(db: &Database) -> OpaqueElement {
    let mut el = OpaqueElement::new("Meta");
    push_text(&mut el, "DatabaseName", db.name.clone());
    push_text(&mut el, "DatabaseDescription", db.description.clone());
    push_text(&mut el, "DefaultUserName", db.default_username.clone());
    push_text(&mut el, "Color", db.color.clone().unwrap_or_default());
    push_text(&mut el, "MaintenanceHistoryDays", db.maintenance_history_days.to_string());
    push_text(&mut el, "RecycleBinEnabled", bool_to_str(db.recycle_bin_enabled).to_string());
    if let Some(uuid) = db.recycle_bin_uuid {
        push_text(&mut el, "RecycleBinUUID", uuid_to_base64(&uuid));
    }
    push_text(&mut el, "RecycleBinChanged", timestamp_to_string(db.recycle_bin_changed));
    if let Some(uuid) = db.entry_templates_group {
        push_text(&mut el, "EntryTemplatesGroup", uuid_to_base64(&uuid));
    }
    push_text(&mut el, "EntryTemplatesGroupChanged", timestamp_to_string(db.entry_templates_group_changed));
    if let Some(uuid) = db.last_selected_group {
        push_text(&mut el, "LastSelectedGroup", uuid_to_base64(&uuid));
    }
    if let Some(uuid) = db.last_top_visible_group {
        push_text(&mut el, "LastTopVisibleGroup", uuid_to_base64(&uuid));
    }
    push_text(&mut el, "HistoryMaxItems", db.history_max_items.to_string());
    push_text(&mut el, "HistoryMaxSize", db.history_max_size.to_string());

    let mut mp = OpaqueElement::new("MemoryProtection");
    push_text(&mut mp, "ProtectTitle", bool_to_str(db.memory_protection.title).to_string());
    push_text(&mut mp, "ProtectUserName", bool_to_str(db.memory_protection.user_name).to_string());
    push_text(&mut mp, "ProtectPassword", bool_to_str(db.memory_protection.password).to_string());
    push_text(&mut mp, "ProtectURL", bool_to_str(db.memory_protection.url).to_string());
    push_text(&mut mp, "ProtectNotes", bool_to_str(db.memory_protection.notes).to_string());
    el.children.push(mp);

    let mut icons = OpaqueElement::new("CustomIcons");
    let mut ordered: Vec<(&EntityId, &CustomIcon)> = db.custom_icons.iter().collect();
    ordered.sort_by_key(|(uuid, _)| **uuid);
    for (uuid, icon) in ordered {
        let mut icon_el = OpaqueElement::new("Icon");
        push_text(&mut icon_el, "UUID", uuid_to_base64(uuid));
        push_text(&mut icon_el, "Data", base64::engine::general_purpose::STANDARD.encode(&icon.data));
        push_text(&mut icon_el, "Name", icon.name.clone());
        push_text(&mut icon_el, "LastModificationTime", timestamp_to_string(icon.last_modification));
        icons.children.push(icon_el);
    }
    el.children.push(icons);

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
    use sealvault_domain::services::derive_composite_key;
    use sealvault_domain::value_objects::KeySource;

    fn test_key() -> sealvault_domain::value_objects::CompositeKey {
        let sources = vec![KeySource::Passphrase(b"test".to_vec())];
        derive_composite_key(&sources, &[0u8; 32], 1, &[0u8; 32], None).unwrap()
    }

    #[test]
    fn round_trips_scalar_fields_and_memory_protection() {
        let mut db = Database::new(test_key(), 6000);
        db.name = "My Vault".to_string();
        db.description = "desc".to_string();
        db.memory_protection.title = true;

        let element = to_element(&db);
        let mut parsed = Database::new(test_key(), 6000);
        apply_to(&element, &mut parsed).unwrap();

        assert_eq!(parsed.name, "My Vault");
        assert_eq!(parsed.description, "desc");
        assert!(parsed.memory_protection.title);
        assert!(parsed.memory_protection.password);
    }

    #[test]
    fn round_trips_custom_icons() {
        let mut db = Database::new(test_key(), 6000);
        let icon_uuid = EntityId::new();
        db.custom_icons.insert(
            icon_uuid,
            CustomIcon { data: vec![1, 2, 3, 4], name: "icon".to_string(), last_modification: Utc::now() },
        );

        let element = to_element(&db);
        let mut parsed = Database::new(test_key(), 6000);
        apply_to(&element, &mut parsed).unwrap();

        let icon = parsed.custom_icons.get(&icon_uuid).unwrap();
        assert_eq!(icon.data, vec![1, 2, 3, 4]);
        assert_eq!(icon.name, "icon");
    }
}
