// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Search (§6): by UUID or by substring/regex over a configurable field
//! mask. Purely a read over an already-open in-memory tree, so unlike
//! `open`/`save`/`merge_in` there is no blocking-pool offload here — a
//! regex scan over a vault's entries finishes well under the threshold
//! that would justify leaving the async executor.

use sealvault_domain::entities::{Database, Entry};
use sealvault_domain::services::{search, SearchOptions};
use sealvault_domain::value_objects::EntityId;
use tracing::instrument;

use crate::infrastructure::observability::ObservabilityService;

pub struct SearchEntriesUseCase {
    observability: ObservabilityService,
}

impl SearchEntriesUseCase {
    pub fn new(observability: ObservabilityService) -> Self {
        Self { observability }
    }

    /// Finds the entry with `uuid` anywhere in `db`.
    pub async fn find_by_uuid<'a>(&self, db: &'a Database, uuid: EntityId) -> Option<&'a Entry> {
        let guard = self.observability.start_operation("search").await;
        let found = db.root.find_entry(uuid);
        guard.finish(true).await;
        found
    }

    /// Finds every entry in `db` whose fields match `query` under `options`.
    #[instrument(skip(self, db, options))]
    pub async fn execute<'a>(&self, db: &'a Database, query: &str, options: &SearchOptions) -> Result<Vec<&'a Entry>, regex::Error> {
        let guard = self.observability.start_operation("search").await;
        let result = search(&db.root, query, options);
        guard.finish(result.is_ok()).await;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealvault_domain::services::derive_composite_key;
    use sealvault_domain::value_objects::KeySource;

    fn fresh_database() -> Database {
        let sources = vec![KeySource::Passphrase(b"correct horse battery staple".to_vec())];
        let master_key = derive_composite_key(&sources, &[0u8; 32], 1, &[0u8; 32], None).unwrap();
        Database::new(master_key, 50)
    }

    #[tokio::test]
    async fn finds_an_entry_by_title_substring() {
        let mut db = fresh_database();
        let mut entry = Entry::new(&db.memory_protection, &[0u8; 32]);
        entry.set_string("Title", "My Bank Account", false, &[0u8; 32]);
        let uuid = entry.uuid;
        db.root.entries.push(entry);

        let use_case = SearchEntriesUseCase::new(ObservabilityService::new(Default::default()));
        let results = use_case.execute(&db, "bank", &SearchOptions::default()).await.unwrap();
        assert_eq!(results.len(), 1);

        assert!(use_case.find_by_uuid(&db, uuid).await.is_some());
        assert!(use_case.find_by_uuid(&db, EntityId::new()).await.is_none());
    }
}
