// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The merge engine (§4.7): three-way reconciliation of a source database
//! into a local one, by UUID, under one of five policies.
//!
//! Reconciliation runs in two flat passes (groups, then entries) rather
//! than one tree-recursive pass: each pass collects the source side
//! read-only first, then applies one lookup-and-mutate step per record
//! against `local.root`. That keeps every mutable borrow of the local tree
//! non-overlapping, which a single recursive walk holding both a subtree
//! reference and a root reference could not do safely.

use chrono::{DateTime, Utc};

use crate::entities::{Database, DeletedObject, Entry, Group};
use crate::error::VaultError;
use crate::value_objects::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    OverwriteExisting,
    OverwriteIfNewer,
    KeepExisting,
    CreateNewUuids,
    Synchronize,
}

/// Merges `source` into `local` under `policy` (§4.7). `local` is mutated
/// in place; `source` is read-only (internally cloned before any
/// `CreateNewUuids` remapping, so the caller's copy is untouched).
pub fn merge_in(local: &mut Database, source: &Database, policy: MergePolicy) -> Result<(), VaultError> {
    let mut working_root = source.root.clone();
    if policy == MergePolicy::CreateNewUuids {
        remap_uuids(&mut working_root);
    }
    let now = Utc::now();

    apply_group_fields(&mut local.root, &working_root, policy);

    let mut group_records = Vec::new();
    collect_groups(&working_root, None, &mut group_records);
    for (parent_uuid, incoming) in &group_records {
        if incoming.uuid == working_root.uuid {
            continue; // root already reconciled above
        }
        match local.root.find_group_mut(incoming.uuid) {
            Some(existing) => apply_group_fields(existing, incoming, policy),
            None => {
                let parent_uuid = parent_uuid.unwrap_or(local.root.uuid);
                match local.root.find_group_mut(parent_uuid) {
                    Some(parent) => parent.groups.push(incoming.clone()),
                    None => local.root.groups.push(incoming.clone()),
                }
            }
        }
    }

    let mut entry_records = Vec::new();
    collect_entries(&working_root, &mut entry_records);
    for (owner_uuid, incoming) in &entry_records {
        reconcile_entry(local, *owner_uuid, incoming, policy, now);
    }

    if policy == MergePolicy::Synchronize {
        union_tombstones(local, &source.deleted);
        apply_tombstones(local, now);
    }

    local.modified = true;
    Ok(())
}

fn reconcile_entry(local: &mut Database, owner_uuid: EntityId, incoming: &Entry, policy: MergePolicy, now: DateTime<Utc>) {
    let found_existing = local.root.find_entry(incoming.uuid).is_some();
    if !found_existing {
        // `owner_uuid` is the group that owns this entry in the source
        // tree; when local and source share ancestry that group already
        // exists locally (groups are reconciled before entries above). If
        // it doesn't — the two trees diverged above this point — the
        // entry is adopted under the local root rather than dropped.
        match local.root.find_group_mut(owner_uuid) {
            Some(owner) => owner.entries.push(incoming.clone()),
            None => local.root.entries.push(incoming.clone()),
        }
        return;
    }

    if policy == MergePolicy::Synchronize {
        let should_relocate = local
            .root
            .find_entry(incoming.uuid)
            .map(|existing| incoming.times.location_changed > existing.times.location_changed)
            .unwrap_or(false);
        if should_relocate {
            if let Some(mut taken) = local.root.take_entry(incoming.uuid) {
                apply_entry_fields(&mut taken, incoming, policy, now);
                if let Some(owner) = local.root.find_group_mut(owner_uuid) {
                    owner.entries.push(taken);
                }
            }
            return;
        }
    }

    if let Some(existing) = local.root.find_entry_mut(incoming.uuid) {
        apply_entry_fields(existing, incoming, policy, now);
    }
}

/// Whether `incoming` should overwrite `existing` under `policy`, given
/// both sides' last-modification times. Equal times favor the existing
/// (local) side (§4.7 "Tie-breaks: equal modification times favor `L`").
fn should_overwrite(policy: MergePolicy, existing: &DateTime<Utc>, incoming: &DateTime<Utc>) -> bool {
    match policy {
        MergePolicy::KeepExisting => false,
        MergePolicy::OverwriteExisting | MergePolicy::CreateNewUuids => true,
        MergePolicy::OverwriteIfNewer | MergePolicy::Synchronize => incoming > existing,
    }
}

fn apply_group_fields(existing: &mut Group, incoming: &Group, policy: MergePolicy) {
    if !should_overwrite(policy, &existing.times.last_modification, &incoming.times.last_modification) {
        return;
    }
    existing.name = incoming.name.clone();
    existing.notes = incoming.notes.clone();
    existing.icon_id = incoming.icon_id;
    existing.custom_icon_uuid = incoming.custom_icon_uuid;
    existing.times = incoming.times;
    existing.expanded = incoming.expanded;
    existing.default_auto_type_sequence = incoming.default_auto_type_sequence.clone();
    existing.enable_auto_type = incoming.enable_auto_type;
    existing.enable_searching = incoming.enable_searching;
    existing.last_top_visible_entry = incoming.last_top_visible_entry;
    existing.unknown_elements = incoming.unknown_elements.clone();
}

fn apply_entry_fields(existing: &mut Entry, incoming: &Entry, policy: MergePolicy, _now: DateTime<Utc>) {
    if policy == MergePolicy::Synchronize {
        merge_history(existing, incoming);
    }
    if !should_overwrite(policy, &existing.times.last_modification, &incoming.times.last_modification) {
        return;
    }
    existing.copy_scalar_fields_from(incoming);
}

/// Unions two entries' history by snapshot timestamp, keeping the source's
/// version on an exact-timestamp collision (§9 Open Question (b)), then
/// leaves count/age trimming to `Database::trim_all_history` at save time
/// (§3, §8: "trimmed on save, not on load").
fn merge_history(existing: &mut Entry, incoming: &Entry) {
    for snapshot in incoming.history() {
        let already_present = existing
            .history()
            .iter()
            .any(|h| h.times.last_modification == snapshot.times.last_modification);
        if !already_present {
            existing.push_history_snapshot(snapshot.clone());
        }
    }
}

fn without_children(group: &Group) -> Group {
    let mut shallow = group.clone();
    shallow.groups.clear();
    shallow.entries.clear();
    shallow
}

fn collect_groups(group: &Group, parent_uuid: Option<EntityId>, out: &mut Vec<(Option<EntityId>, Group)>) {
    out.push((parent_uuid, without_children(group)));
    for child in &group.groups {
        collect_groups(child, Some(group.uuid), out);
    }
}

fn collect_entries(group: &Group, out: &mut Vec<(EntityId, Entry)>) {
    for entry in &group.entries {
        out.push((group.uuid, entry.clone()));
    }
    for child in &group.groups {
        collect_entries(child, out);
    }
}

/// Rewrites every UUID in `group`'s subtree (groups, entries, history) to
/// fresh values (§4.7 step 1, `CreateNewUuids`).
fn remap_uuids(group: &mut Group) {
    group.uuid = EntityId::new();
    for entry in &mut group.entries {
        entry.remap_uuid(EntityId::new());
    }
    for child in &mut group.groups {
        remap_uuids(child);
    }
}

fn union_tombstones(local: &mut Database, source_deleted: &[DeletedObject]) {
    for tombstone in source_deleted {
        if !local.deleted.iter().any(|d| d.uuid == tombstone.uuid) {
            local.deleted.push(*tombstone);
        }
    }
}

/// For every tombstoned UUID, deletes the live entity if its
/// last-modification precedes the tombstone's deletion time (§4.7 step 4).
fn apply_tombstones(local: &mut Database, _now: DateTime<Utc>) {
    let tombstones = local.deleted.clone();
    for tombstone in &tombstones {
        if let Some(entry) = local.root.find_entry(tombstone.uuid) {
            if entry.times.last_modification < tombstone.deletion_time {
                local.root.take_entry(tombstone.uuid);
            }
        } else if let Some(group) = local.root.find_group(tombstone.uuid) {
            if group.times.last_modification < tombstone.deletion_time && group.uuid != local.root.uuid {
                local.root.take_group(tombstone.uuid);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{CompositeKey, MemoryProtectionConfig};

    fn empty_database() -> Database {
        Database::new(CompositeKey::from_final_key([0u8; 32]), 6000)
    }

    #[test]
    fn synchronize_adopts_new_entry_from_source() {
        let mut local = empty_database();
        let e1 = Entry::new(&MemoryProtectionConfig::default(), b"seed");
        local.root.entries.push(e1.clone());

        let mut source = empty_database();
        source.root.entries.push(e1);
        let e2 = Entry::new(&MemoryProtectionConfig::default(), b"seed");
        source.root.entries.push(e2);

        merge_in(&mut local, &source, MergePolicy::Synchronize).unwrap();
        assert_eq!(local.root.entry_count(), 2);
    }

    #[test]
    fn synchronize_tombstone_newer_than_local_edit_removes_entry() {
        let mut local = empty_database();
        let entry = Entry::new(&MemoryProtectionConfig::default(), b"seed");
        let uuid = entry.uuid;
        local.root.entries.push(entry);

        let mut source = empty_database();
        source.deleted.push(DeletedObject::new(uuid, Utc::now() + chrono::Duration::seconds(10)));

        merge_in(&mut local, &source, MergePolicy::Synchronize).unwrap();
        assert_eq!(local.root.entry_count(), 0);
        assert!(local.deleted.iter().any(|d| d.uuid == uuid));
    }

    #[test]
    fn keep_existing_never_overwrites_local_group_fields() {
        let mut local = empty_database();
        local.root.name = "local-name".to_string();
        let mut source = empty_database();
        source.root.uuid = local.root.uuid;
        source.root.name = "source-name".to_string();
        source.root.times.last_modification = local.root.times.last_modification + chrono::Duration::seconds(10);

        merge_in(&mut local, &source, MergePolicy::KeepExisting).unwrap();
        assert_eq!(local.root.name, "local-name");
    }

    #[test]
    fn overwrite_if_newer_only_takes_strictly_newer_changes() {
        let mut local = empty_database();
        local.root.name = "local-name".to_string();
        let mut source = empty_database();
        source.root.uuid = local.root.uuid;
        source.root.name = "source-name".to_string();
        source.root.times.last_modification = local.root.times.last_modification - chrono::Duration::seconds(10);

        merge_in(&mut local, &source, MergePolicy::OverwriteIfNewer).unwrap();
        assert_eq!(local.root.name, "local-name");
    }
}
