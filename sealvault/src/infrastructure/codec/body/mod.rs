// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The decompressed, unmasked inner payload (§4.6): `<KeePassFile>` wrapping
//! `<Meta>` and `<Root>`, the latter holding the group tree and the
//! `<DeletedObjects>` tombstone list. This module owns the document's
//! overall shape; `meta.rs`, `group.rs`, and `entry.rs` own one element
//! kind each.

mod binary_pool;
mod entry;
mod group;
mod meta;
mod times;
mod values;
mod xml_tree;

use sealvault_domain::entities::{Database, DeletedObject};
use sealvault_domain::services::InnerStreamMasker;
use sealvault_domain::value_objects::OpaqueElement;
use sealvault_domain::VaultError;

use binary_pool::BinaryPool;
use values::{timestamp_from_str, timestamp_to_string, uuid_from_base64, uuid_to_base64};
use xml_tree::{find_child, parse_document, required_child_text, write_document};

/// Parses the inner document into `db`: `db.root`, `db.deleted`, and every
/// `<Meta>` field are overwritten. `db.master_key`, `db.data_cipher`,
/// `db.compression`, and `db.key_transform_rounds` come from the outer
/// header and are left untouched (§4.2, §4.6).
pub fn parse(
    xml: &[u8],
    masker: &mut InnerStreamMasker,
    process_seed: &[u8],
    db: &mut Database,
) -> Result<(), VaultError> {
    let document = parse_document(xml)?;
    if document.tag != "KeePassFile" {
        return Err(VaultError::malformed_body(format!("unexpected root element <{}>", document.tag)));
    }

    let meta_el = find_child(&document, "Meta").ok_or_else(|| VaultError::malformed_body("missing <Meta>"))?;
    meta::apply_to(meta_el, db)?;
    let pool = BinaryPool::from_meta(meta_el)?;

    let root_el = find_child(&document, "Root").ok_or_else(|| VaultError::malformed_body("missing <Root>"))?;
    let group_el = find_child(root_el, "Group").ok_or_else(|| VaultError::malformed_body("<Root> missing <Group>"))?;
    db.root = group::from_element(group_el, masker, process_seed, &pool, &db.memory_protection)?;

    db.deleted = Vec::new();
    if let Some(deleted_el) = find_child(root_el, "DeletedObjects") {
        for child in &deleted_el.children {
            if child.tag != "DeletedObject" {
                continue;
            }
            let uuid = uuid_from_base64(required_child_text(child, "UUID")?)?;
            let deletion_time = timestamp_from_str(required_child_text(child, "DeletionTime")?)?;
            db.deleted.push(DeletedObject::new(uuid, deletion_time));
        }
    }

    Ok(())
}

/// Serializes `db`'s `Meta`, group tree, and tombstones into a fresh inner
/// document, ready for compression and masking (§4.6).
pub fn serialize(db: &Database, masker: &mut InnerStreamMasker) -> Result<Vec<u8>, VaultError> {
    let mut pool = BinaryPool::new();
    let root_group_el = group::to_element(&db.root, masker, &mut pool);

    let mut meta_el = meta::to_element(db);
    meta_el.children.push(pool.to_element());

    let mut deleted_el = OpaqueElement::new("DeletedObjects");
    for tombstone in &db.deleted {
        let mut entry = OpaqueElement::new("DeletedObject");
        push_text(&mut entry, "UUID", uuid_to_base64(&tombstone.uuid));
        push_text(&mut entry, "DeletionTime", timestamp_to_string(tombstone.deletion_time));
        deleted_el.children.push(entry);
    }

    let mut root_el = OpaqueElement::new("Root");
    root_el.children.push(root_group_el);
    root_el.children.push(deleted_el);

    let mut document = OpaqueElement::new("KeePassFile");
    document.children.push(meta_el);
    document.children.push(root_el);

    write_document(&document)
}

fn push_text(parent: &mut OpaqueElement, tag: &str, text: String) {
    let mut child = OpaqueElement::new(tag);
    child.text = text;
    parent.children.push(child);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sealvault_domain::services::derive_composite_key;
    use sealvault_domain::value_objects::KeySource;

    fn test_db() -> Database {
        let sources = vec![KeySource::Passphrase(b"test".to_vec())];
        let key = derive_composite_key(&sources, &[0u8; 32], 1, &[0u8; 32], None).unwrap();
        Database::new(key, 1)
    }

    #[test]
    fn round_trips_an_empty_database_through_the_document_shape() {
        let mut db = test_db();
        db.name = "My Vault".to_string();

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let xml = serialize(&db, &mut writer).unwrap();

        let mut parsed = test_db();
        let mut reader = InnerStreamMasker::new(b"stream-key");
        parse(&xml, &mut reader, &[0u8; 32], &mut parsed).unwrap();

        assert_eq!(parsed.name, "My Vault");
        assert_eq!(parsed.root.entry_count(), 0);
        assert!(parsed.deleted.is_empty());
    }

    #[test]
    fn round_trips_entries_and_tombstones() {
        use sealvault_domain::entities::Entry;
        use sealvault_domain::value_objects::EntityId;

        let mut db = test_db();
        let mut entry = Entry::new(&db.memory_protection, &[0u8; 32]);
        entry.set_string("Title", "Example", false, &[0u8; 32]);
        entry.set_string("Password", "hunter2", true, &[0u8; 32]);
        db.root.entries.push(entry);
        db.deleted.push(DeletedObject::new(EntityId::new(), Utc::now()));

        let mut writer = InnerStreamMasker::new(b"stream-key");
        let xml = serialize(&db, &mut writer).unwrap();

        let mut parsed = test_db();
        let mut reader = InnerStreamMasker::new(b"stream-key");
        parse(&xml, &mut reader, &[0u8; 32], &mut parsed).unwrap();

        assert_eq!(parsed.root.entry_count(), 1);
        assert_eq!(parsed.root.entries[0].get_string("Title").unwrap().read(), "Example");
        assert_eq!(parsed.root.entries[0].get_string("Password").unwrap().read(), "hunter2");
        assert_eq!(parsed.deleted.len(), 1);
    }
}
