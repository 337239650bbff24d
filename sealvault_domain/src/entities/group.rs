// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `Group` (§3): a named node in the tree, holding ordered child groups and
//! entries. No `parent` field is stored (§9 "Cyclic parent pointers") —
//! ancestry is reconstructed by traversals that carry the chain on the
//! stack, so the tree is a plain owned recursive structure with no
//! `Rc`/`RefCell` and no possibility of a dangling back-reference.

use crate::entities::Entry;
use crate::value_objects::{EntityId, OpaqueElement, TriState, Timestamps};

/// A folder in the tree. `groups` and `entries` preserve insertion/UI
/// order across save and load (§3).
#[derive(Clone)]
pub struct Group {
    pub uuid: EntityId,
    pub name: String,
    pub notes: String,
    pub icon_id: u32,
    pub custom_icon_uuid: Option<EntityId>,
    pub times: Timestamps,
    pub expanded: bool,
    pub default_auto_type_sequence: Option<String>,
    pub enable_auto_type: TriState,
    pub enable_searching: TriState,
    pub last_top_visible_entry: Option<EntityId>,
    pub groups: Vec<Group>,
    pub entries: Vec<Entry>,
    pub unknown_elements: Vec<OpaqueElement>,
}

impl Group {
    /// A fresh, empty group with a new UUID and current timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            uuid: EntityId::new(),
            name: name.into(),
            notes: String::new(),
            icon_id: 0,
            custom_icon_uuid: None,
            times: Timestamps::now(),
            expanded: true,
            default_auto_type_sequence: None,
            enable_auto_type: TriState::Inherit,
            enable_searching: TriState::Inherit,
            last_top_visible_entry: None,
            groups: Vec::new(),
            entries: Vec::new(),
            unknown_elements: Vec::new(),
        }
    }

    /// The conventional root-group name used by a freshly created database.
    pub fn new_root() -> Self {
        Self::new("Root")
    }

    /// Depth-first, pre-order visit over this group's subtree: the group
    /// itself, then its own entries, then each child subtree in stored
    /// order — matching the document-order traversal used by the
    /// inner-stream masker (§4.5) and the public pre-order visitor (§6).
    /// `on_group`/`on_entry` return `false` to stop the walk early.
    pub fn walk_pre_order<'a>(
        &'a self,
        on_group: &mut dyn FnMut(&'a Group) -> bool,
        on_entry: &mut dyn FnMut(&'a Group, &'a Entry) -> bool,
    ) -> bool {
        if !on_group(self) {
            return false;
        }
        for entry in &self.entries {
            if !on_entry(self, entry) {
                return false;
            }
        }
        for child in &self.groups {
            if !child.walk_pre_order(on_group, on_entry) {
                return false;
            }
        }
        true
    }

    /// Finds the group with `uuid` anywhere in this subtree (including
    /// `self`).
    pub fn find_group(&self, uuid: EntityId) -> Option<&Group> {
        if self.uuid == uuid {
            return Some(self);
        }
        self.groups.iter().find_map(|g| g.find_group(uuid))
    }

    pub fn find_group_mut(&mut self, uuid: EntityId) -> Option<&mut Group> {
        if self.uuid == uuid {
            return Some(self);
        }
        self.groups.iter_mut().find_map(|g| g.find_group_mut(uuid))
    }

    /// Finds the entry with `uuid` anywhere in this subtree.
    pub fn find_entry(&self, uuid: EntityId) -> Option<&Entry> {
        if let Some(entry) = self.entries.iter().find(|e| e.uuid == uuid) {
            return Some(entry);
        }
        self.groups.iter().find_map(|g| g.find_entry(uuid))
    }

    pub fn find_entry_mut(&mut self, uuid: EntityId) -> Option<&mut Entry> {
        if let Some(index) = self.entries.iter().position(|e| e.uuid == uuid) {
            return self.entries.get_mut(index);
        }
        self.groups.iter_mut().find_map(|g| g.find_entry_mut(uuid))
    }

    /// Removes and returns the entry with `uuid`, searched anywhere in this
    /// subtree.
    pub fn take_entry(&mut self, uuid: EntityId) -> Option<Entry> {
        if let Some(index) = self.entries.iter().position(|e| e.uuid == uuid) {
            return Some(self.entries.remove(index));
        }
        self.groups.iter_mut().find_map(|g| g.take_entry(uuid))
    }

    /// Removes and returns the group with `uuid` (never `self`), searched
    /// anywhere in this subtree.
    pub fn take_group(&mut self, uuid: EntityId) -> Option<Group> {
        if let Some(index) = self.groups.iter().position(|g| g.uuid == uuid) {
            return Some(self.groups.remove(index));
        }
        self.groups.iter_mut().find_map(|g| g.take_group(uuid))
    }

    /// Counts every live entry in this subtree.
    pub fn entry_count(&self) -> usize {
        self.entries.len() + self.groups.iter().map(Group::entry_count).sum::<usize>()
    }
}
