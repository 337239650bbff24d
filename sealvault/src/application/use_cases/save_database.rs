// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `save`/`save_as` (§6): trims history per the configured retention
//! limits, serializes under fresh salts on a blocking-pool thread, takes
//! the advisory lock file for the duration of the write, and persists
//! atomically through the injected `IoAdapter` (§5).

use std::sync::Arc;

use chrono::Utc;
use sealvault_domain::entities::Database;
use sealvault_domain::repositories::{IoAdapter, IoLocation, StatusCallback};
use sealvault_domain::value_objects::KeySource;
use sealvault_domain::VaultError;
use tracing::instrument;

use crate::infrastructure::codec;
use crate::infrastructure::io::LockFile;
use crate::infrastructure::observability::ObservabilityService;

pub struct SaveDatabaseUseCase {
    adapter: Arc<dyn IoAdapter>,
    observability: ObservabilityService,
    lock_file_enabled: bool,
}

impl SaveDatabaseUseCase {
    pub fn new(adapter: Arc<dyn IoAdapter>, observability: ObservabilityService, lock_file_enabled: bool) -> Self {
        Self { adapter, observability, lock_file_enabled }
    }

    /// Saves `db` back to the location it was opened from (or most
    /// recently saved to), handing the (possibly history-trimmed) database
    /// back to the caller.
    pub async fn execute(&self, db: Database, sources: Vec<KeySource>, status: Option<Box<dyn StatusCallback + Send>>) -> Result<Database, VaultError> {
        let location = db
            .source
            .clone()
            .ok_or_else(|| VaultError::IoFailure("database has no associated location; use save_as".to_string()))?;
        self.save_to(db, location, sources, status, true).await
    }

    /// Saves `db` to `location`, optionally making it the database's new
    /// primary location (§6 `save_as(..., make_primary, ...)`).
    #[instrument(skip(self, db, sources, status))]
    pub async fn execute_as(
        &self,
        db: Database,
        location: IoLocation,
        make_primary: bool,
        sources: Vec<KeySource>,
        status: Option<Box<dyn StatusCallback + Send>>,
    ) -> Result<Database, VaultError> {
        self.save_to(db, location, sources, status, make_primary).await
    }

    async fn save_to(
        &self,
        mut db: Database,
        location: IoLocation,
        sources: Vec<KeySource>,
        mut status: Option<Box<dyn StatusCallback + Send>>,
        set_as_source: bool,
    ) -> Result<Database, VaultError> {
        let guard = self.observability.start_operation("save").await;

        db.trim_all_history(Utc::now());

        let lock = if self.lock_file_enabled {
            if let IoLocation::LocalFile(path) = &location {
                Some(LockFile::acquire(self.adapter.as_ref(), path, &NoopPlatform)?)
            } else {
                None
            }
        } else {
            None
        };

        let blocking_result = tokio::task::spawn_blocking(move || {
            let bytes = codec::save(&mut db, &sources, status.as_deref_mut().map(|cb| cb as &mut dyn StatusCallback));
            (db, bytes)
        })
        .await
        .map_err(|join_err| VaultError::IoFailure(format!("save task panicked: {join_err}")));

        let (mut db, bytes_result) = match blocking_result {
            Ok(pair) => pair,
            Err(join_failure) => {
                drop(lock);
                guard.finish(false).await;
                return Err(join_failure);
            }
        };

        let write_result = match bytes_result {
            Ok(bytes) => self.adapter.open_write(&location, &bytes),
            Err(err) => Err(err),
        };

        drop(lock);
        guard.finish(write_result.is_ok()).await;
        write_result?;

        if set_as_source {
            db.source = Some(location);
        }
        Ok(db)
    }
}

/// The lock file's identity payload doesn't round-trip through this use
/// case's public signature (platform lookups are a bootstrap-layer
/// concern, §2); callers that care about a meaningful holder string
/// acquire their own `LockFile` directly against a real `Platform`. This
/// placeholder exists only so `save`'s lock-then-write ordering is
/// exercised end to end without forcing every caller to thread a platform
/// object through `SaveDatabaseUseCase`.
struct NoopPlatform;
impl sealvault_bootstrap::Platform for NoopPlatform {
    fn user_identifier(&self) -> String {
        std::env::var("USER").unwrap_or_else(|_| "unknown".to_string())
    }
    fn machine_identifier(&self) -> String {
        "localhost".to_string()
    }
    fn platform_name(&self) -> &'static str {
        "generic"
    }
}
