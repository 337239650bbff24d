// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `Database` (§3): the aggregate root — the group tree, tombstones, the
//! composite key, and the cipher/compression/history-retention settings
//! that the outer and body codecs need to serialize it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::entities::{DeletedObject, Group};
use crate::repositories::IoLocation;
use crate::value_objects::{CompositeKey, EntityId, MemoryProtectionConfig};

/// The single cipher the format supports (§4.2: CipherUUID must equal the
/// AES UUID; anything else is `UnknownCipher`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cipher {
    Aes256,
}

impl Cipher {
    /// `31C1F2E6-BF71-4350-BE58-05216AFC5AFF`, the only recognized
    /// CipherUUID value (§4.2).
    pub const AES_UUID: [u8; 16] = [
        0x31, 0xC1, 0xF2, 0xE6, 0xBF, 0x71, 0x43, 0x50, 0xBE, 0x58, 0x05, 0x21, 0x6A, 0xFC, 0x5A,
        0xFF,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    GZip,
}

/// An embedded custom icon — raw PNG bytes plus the bookkeeping fields a
/// front-end uses to prune icons nobody references anymore.
#[derive(Debug, Clone)]
pub struct CustomIcon {
    pub data: Vec<u8>,
    pub name: String,
    pub last_modification: DateTime<Utc>,
}

/// The aggregate root. One `Database` owns exactly one group tree (the
/// root group lives at `root` directly — there is no separate "is this the
/// root" flag, the field's existence is the invariant).
pub struct Database {
    pub root: Group,
    pub deleted: Vec<DeletedObject>,
    pub master_key: CompositeKey,
    pub data_cipher: Cipher,
    pub compression: Compression,
    pub key_transform_rounds: u64,
    pub memory_protection: MemoryProtectionConfig,
    pub name: String,
    pub description: String,
    pub default_username: String,
    pub maintenance_history_days: u32,
    pub custom_icons: HashMap<EntityId, CustomIcon>,
    pub source: Option<IoLocation>,
    pub modified: bool,
    pub open: bool,

    // Supplemental `<Meta>` fields carried alongside the core aggregate.
    pub color: Option<String>,
    pub recycle_bin_enabled: bool,
    pub recycle_bin_uuid: Option<EntityId>,
    pub recycle_bin_changed: DateTime<Utc>,
    pub entry_templates_group: Option<EntityId>,
    pub entry_templates_group_changed: DateTime<Utc>,
    pub last_selected_group: Option<EntityId>,
    pub last_top_visible_group: Option<EntityId>,
    pub history_max_items: u32,
    pub history_max_size: u64,
}

/// History retention defaults (§3, SPEC_FULL §Meta fields).
pub const DEFAULT_HISTORY_MAX_ITEMS: u32 = 10;
pub const DEFAULT_HISTORY_MAX_SIZE: u64 = 6 * 1024 * 1024;
pub const DEFAULT_MAINTENANCE_HISTORY_DAYS: u32 = 365;

impl Database {
    /// A fresh, empty database: one root group, no entries, default
    /// cipher/compression/retention settings. `master_key` and
    /// `key_transform_rounds` must still be set by the caller before the
    /// first save (composite key assembly is the caller's responsibility,
    /// via `services::composite_key_service`).
    pub fn new(master_key: CompositeKey, key_transform_rounds: u64) -> Self {
        let now = Utc::now();
        Self {
            root: Group::new_root(),
            deleted: Vec::new(),
            master_key,
            data_cipher: Cipher::Aes256,
            compression: Compression::GZip,
            key_transform_rounds,
            memory_protection: MemoryProtectionConfig::default(),
            name: String::new(),
            description: String::new(),
            default_username: String::new(),
            maintenance_history_days: DEFAULT_MAINTENANCE_HISTORY_DAYS,
            custom_icons: HashMap::new(),
            source: None,
            modified: false,
            open: true,
            color: None,
            recycle_bin_enabled: true,
            recycle_bin_uuid: None,
            recycle_bin_changed: now,
            entry_templates_group: None,
            entry_templates_group_changed: now,
            last_selected_group: None,
            last_top_visible_group: None,
            history_max_items: DEFAULT_HISTORY_MAX_ITEMS,
            history_max_size: DEFAULT_HISTORY_MAX_SIZE,
        }
    }

    /// Applies the configured history limits to every entry in the tree, at
    /// save time (§3, §8: "trimmed on save, not on load").
    pub fn trim_all_history(&mut self, now: DateTime<Utc>) {
        let max_age = chrono::Duration::days(self.maintenance_history_days as i64);
        let max_items = self.history_max_items as usize;
        fn walk(group: &mut Group, max_items: usize, max_age: chrono::Duration, now: DateTime<Utc>) {
            for entry in &mut group.entries {
                entry.trim_history(max_items, max_age, now);
            }
            for child in &mut group.groups {
                walk(child, max_items, max_age, now);
            }
        }
        walk(&mut self.root, max_items, max_age, now);
    }

    /// Moves the group or entry identified by `uuid` to `deleted`,
    /// recording the current time as `deletion_time` (§3 "Lifecycle").
    /// Returns `false` if nothing with that UUID was found.
    pub fn delete_entry(&mut self, uuid: EntityId, at: DateTime<Utc>) -> bool {
        if self.root.take_entry(uuid).is_some() {
            self.deleted.push(DeletedObject::new(uuid, at));
            self.modified = true;
            true
        } else {
            false
        }
    }

    pub fn delete_group(&mut self, uuid: EntityId, at: DateTime<Utc>) -> bool {
        if self.root.uuid == uuid {
            return false;
        }
        if self.root.take_group(uuid).is_some() {
            self.deleted.push(DeletedObject::new(uuid, at));
            self.modified = true;
            true
        } else {
            false
        }
    }
}
