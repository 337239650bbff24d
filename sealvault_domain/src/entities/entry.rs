// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `Entry` (§3): a single secret record — a standard-field string bag, an
//! attachment bag, auto-type settings, and its own history of prior
//! snapshots.

use chrono::{DateTime, Utc};

use crate::value_objects::{
    AutoTypeSettings, EntityId, OpaqueElement, ProtectedString, Timestamps,
};

/// The five standard string field names every live entry must carry,
/// possibly with an empty value (§3, §4.6).
pub const STANDARD_FIELDS: [&str; 5] = ["Title", "UserName", "Password", "URL", "Notes"];

/// A secret record. `strings` and `binaries` are ordered maps (insertion
/// order is the UI-visible and on-disk order), represented as `Vec<(String,
/// _)>` rather than a dependency on an indexed-map crate, matching their
/// small expected cardinality.
#[derive(Clone)]
pub struct Entry {
    pub uuid: EntityId,
    pub icon_id: u32,
    pub custom_icon_uuid: Option<EntityId>,
    strings: Vec<(String, ProtectedString)>,
    binaries: Vec<(String, Vec<u8>)>,
    pub auto_type: AutoTypeSettings,
    /// Past snapshots of this entry. Invariant: every element's `uuid`
    /// equals `self.uuid` and its own `history` is empty (§3: "history
    /// contains only past snapshots ... and never nests further history").
    history: Vec<Entry>,
    pub times: Timestamps,
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub override_url: Option<String>,
    pub tags: Vec<String>,
    pub unknown_elements: Vec<OpaqueElement>,
}

impl Entry {
    /// A fresh entry with a new UUID, current timestamps, and the five
    /// standard fields present (empty), protected per `memory_protection`.
    pub fn new(memory_protection: &crate::value_objects::MemoryProtectionConfig, process_seed: &[u8]) -> Self {
        let mut entry = Self {
            uuid: EntityId::new(),
            icon_id: 0,
            custom_icon_uuid: None,
            strings: Vec::new(),
            binaries: Vec::new(),
            auto_type: AutoTypeSettings::default(),
            history: Vec::new(),
            times: Timestamps::now(),
            foreground_color: None,
            background_color: None,
            override_url: None,
            tags: Vec::new(),
            unknown_elements: Vec::new(),
        };
        let protect_flags = [
            memory_protection.title,
            memory_protection.user_name,
            memory_protection.password,
            memory_protection.url,
            memory_protection.notes,
        ];
        for (name, protect) in STANDARD_FIELDS.iter().zip(protect_flags) {
            entry.set_string(name, "", protect, process_seed);
        }
        entry
    }

    /// Builds a bare entry with the given identity and no standard fields
    /// populated — used by the body codec while parsing, which appends
    /// fields as it encounters `<String>` elements in document order.
    pub fn bare(uuid: EntityId) -> Self {
        Self {
            uuid,
            icon_id: 0,
            custom_icon_uuid: None,
            strings: Vec::new(),
            binaries: Vec::new(),
            auto_type: AutoTypeSettings::default(),
            history: Vec::new(),
            times: Timestamps::now(),
            foreground_color: None,
            background_color: None,
            override_url: None,
            tags: Vec::new(),
            unknown_elements: Vec::new(),
        }
    }

    pub fn strings(&self) -> &[(String, ProtectedString)] {
        &self.strings
    }

    pub fn get_string(&self, name: &str) -> Option<&ProtectedString> {
        self.strings.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Inserts or replaces a field, preserving its position if it already
    /// exists, appending it otherwise (insertion-order invariant).
    pub fn set_string(&mut self, name: &str, value: impl Into<String>, protect: bool, process_seed: &[u8]) {
        let protected = if protect {
            ProtectedString::protected(value, process_seed)
        } else {
            ProtectedString::plain(value)
        };
        if let Some(slot) = self.strings.iter_mut().find(|(n, _)| n == name) {
            slot.1 = protected;
        } else {
            self.strings.push((name.to_string(), protected));
        }
    }

    pub fn binaries(&self) -> &[(String, Vec<u8>)] {
        &self.binaries
    }

    pub fn set_binary(&mut self, name: &str, data: Vec<u8>) {
        if let Some(slot) = self.binaries.iter_mut().find(|(n, _)| n == name) {
            slot.1 = data;
        } else {
            self.binaries.push((name.to_string(), data));
        }
    }

    pub fn history(&self) -> &[Entry] {
        &self.history
    }

    /// Pushes a snapshot of this entry's current state (minus its own
    /// history, per the never-nests invariant) onto `history`, then stamps
    /// `last_modification`.
    pub fn record_edit(&mut self, at: DateTime<Utc>) {
        let mut snapshot = self.clone();
        snapshot.history.clear();
        self.history.push(snapshot);
        self.times.touch_modified(at);
    }

    /// Trims `history` to `max_items` most-recent snapshots and drops any
    /// snapshot older than `max_age_days`, applied at save time (§3, §8:
    /// "trimmed on save, not on load").
    pub fn trim_history(&mut self, max_items: usize, max_age: chrono::Duration, now: DateTime<Utc>) {
        self.history.retain(|h| now - h.times.last_modification <= max_age);
        if self.history.len() > max_items {
            let overflow = self.history.len() - max_items;
            self.history.drain(0..overflow);
        }
    }

    pub fn push_history_snapshot(&mut self, snapshot: Entry) {
        self.history.push(snapshot);
    }

    pub fn touch_accessed(&mut self, at: DateTime<Utc>) {
        self.times.touch_accessed(at);
    }

    /// Reassigns this entry's identity and cascades it to every history
    /// snapshot, preserving the "`h.uuid == e.uuid`" invariant (§8). Used by
    /// the merge engine's `CreateNewUuids` policy.
    pub(crate) fn remap_uuid(&mut self, new_uuid: EntityId) {
        self.uuid = new_uuid;
        for snapshot in &mut self.history {
            snapshot.uuid = new_uuid;
        }
    }

    /// Copies every field from `other` except `history` and `uuid`, used by
    /// the merge engine once history reconciliation has already been
    /// applied separately so a field copy can't clobber it.
    pub(crate) fn copy_scalar_fields_from(&mut self, other: &Entry) {
        self.icon_id = other.icon_id;
        self.custom_icon_uuid = other.custom_icon_uuid;
        self.strings = other.strings.clone();
        self.binaries = other.binaries.clone();
        self.auto_type = other.auto_type.clone();
        self.times = other.times;
        self.foreground_color = other.foreground_color.clone();
        self.background_color = other.background_color.clone();
        self.override_url = other.override_url.clone();
        self.tags = other.tags.clone();
        self.unknown_elements = other.unknown_elements.clone();
    }
}
