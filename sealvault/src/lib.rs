// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # sealvault
//!
//! The application/infrastructure layer of an encrypted, hierarchical
//! secret-storage engine: the whole-file codec (`infrastructure::codec`),
//! settings, local-file and lock-file I/O, operation observability, and
//! the async use cases (`application::use_cases`) a front end calls to
//! open, save, merge, and search a vault built on `sealvault-domain`.

pub mod application;
pub mod infrastructure;

pub use application::use_cases::{MergeDatabasesUseCase, OpenDatabaseUseCase, SaveDatabaseUseCase, SearchEntriesUseCase};
pub use infrastructure::config::VaultSettings;
pub use infrastructure::io::{LocalFileAdapter, LockFile};
pub use infrastructure::observability::{AlertThresholds, HealthStatus, ObservabilityService, SystemHealth};
