// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! `IoLocation` (§6): an abstracted path the core stores and passes back to
//! an injected `IoAdapter`, rather than touching the filesystem or network
//! itself. Keeping this at arm's length is what lets `sealvault-domain`
//! stay synchronous and I/O-free (§5: "the core never touches the network
//! directly").

use std::path::PathBuf;

use crate::error::VaultError;

/// A recognized location scheme. The core treats both variants as opaque
/// values — only the injected `IoAdapter` implementation interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IoLocation {
    LocalFile(PathBuf),
    OpaqueUrl(String),
}

impl IoLocation {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self::LocalFile(path.into())
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::OpaqueUrl(url.into())
    }
}

/// The injected adapter the core calls to actually move bytes. Application
/// code provides the implementation (a local filesystem adapter, a cloud
/// backend, a test double); the domain crate never does I/O on its own.
/// `Send + Sync` so application code can share one adapter across the
/// blocking-pool threads the key-strengthening offload runs on (§5).
pub trait IoAdapter: Send + Sync {
    fn open_read(&self, location: &IoLocation) -> Result<Vec<u8>, VaultError>;
    fn open_write(&self, location: &IoLocation, contents: &[u8]) -> Result<(), VaultError>;
    fn rename(&self, from: &IoLocation, to: &IoLocation) -> Result<(), VaultError>;
    fn delete(&self, location: &IoLocation) -> Result<(), VaultError>;
    fn exists(&self, location: &IoLocation) -> Result<bool, VaultError>;
}
