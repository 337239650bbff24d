// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `open` (§6): reads the file bytes through the injected `IoAdapter`,
//! then runs the whole-file codec's CPU-bound parse/decrypt/key-derivation
//! path on a blocking-pool thread so it never stalls the caller's async
//! runtime (§5, SPEC_FULL §5 `[AMBIENT]`).

use std::sync::Arc;

use sealvault_domain::entities::Database;
use sealvault_domain::repositories::{IoAdapter, IoLocation, StatusCallback};
use sealvault_domain::value_objects::KeySource;
use sealvault_domain::VaultError;
use tracing::instrument;

use crate::infrastructure::codec;
use crate::infrastructure::observability::ObservabilityService;

pub struct OpenDatabaseUseCase {
    adapter: Arc<dyn IoAdapter>,
    observability: ObservabilityService,
}

impl OpenDatabaseUseCase {
    pub fn new(adapter: Arc<dyn IoAdapter>, observability: ObservabilityService) -> Self {
        Self { adapter, observability }
    }

    /// Reads `location` and opens it under `sources`. `status` is sampled
    /// synchronously inside the blocking task, matching the ≤8192-round
    /// granularity the domain layer itself enforces.
    #[instrument(skip(self, sources, status))]
    pub async fn execute(
        &self,
        location: IoLocation,
        sources: Vec<KeySource>,
        mut status: Option<Box<dyn StatusCallback + Send>>,
    ) -> Result<Database, VaultError> {
        let guard = self.observability.start_operation("open").await;

        let adapter = Arc::clone(&self.adapter);
        let location_for_read = location.clone();
        let result = tokio::task::spawn_blocking(move || {
            let bytes = adapter.open_read(&location_for_read)?;
            codec::open(&bytes, &sources, status.as_deref_mut().map(|cb| cb as &mut dyn StatusCallback))
        })
        .await
        .map_err(|join_err| VaultError::IoFailure(format!("open task panicked: {join_err}")))?;

        guard.finish(result.is_ok()).await;
        let mut db = result?;
        db.source = Some(location);
        Ok(db)
    }
}
