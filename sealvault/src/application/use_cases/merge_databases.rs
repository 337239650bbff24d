// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `merge_in` (§4.7, §6): reconciles a source database into a local one
//! under one of the five merge policies. Tree-walking over a large
//! database is the other CPU-bound operation in this library (besides key
//! derivation), so it runs on the blocking pool like `open`/`save` do.

use std::sync::Arc;

use sealvault_domain::entities::Database;
use sealvault_domain::repositories::IoAdapter;
use sealvault_domain::services::MergePolicy;
use sealvault_domain::VaultError;
use tracing::instrument;

use crate::infrastructure::observability::ObservabilityService;

pub struct MergeDatabasesUseCase {
    // Held for symmetry with the other use cases and for a future local
    // cache of merge conflict reports; `merge_in` itself takes no I/O.
    _adapter: Arc<dyn IoAdapter>,
    observability: ObservabilityService,
}

impl MergeDatabasesUseCase {
    pub fn new(adapter: Arc<dyn IoAdapter>, observability: ObservabilityService) -> Self {
        Self { _adapter: adapter, observability }
    }

    /// Merges `source` into `local` under `policy`, handing both databases
    /// back to the caller once the blocking-pool task completes.
    #[instrument(skip(self, local, source))]
    pub async fn execute(&self, mut local: Database, source: Database, policy: MergePolicy) -> Result<Database, VaultError> {
        let guard = self.observability.start_operation("merge_in").await;

        let result = tokio::task::spawn_blocking(move || {
            let outcome = sealvault_domain::services::merge_in(&mut local, &source, policy);
            (local, outcome)
        })
        .await
        .map_err(|join_err| VaultError::IoFailure(format!("merge task panicked: {join_err}")));

        let (local, outcome) = match result {
            Ok(pair) => pair,
            Err(join_failure) => {
                guard.finish(false).await;
                return Err(join_failure);
            }
        };

        guard.finish(outcome.is_ok()).await;
        outcome?;
        Ok(local)
    }
}
