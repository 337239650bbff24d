// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The advisory `<name>.lock` side-file (§6): written next to the main
//! file during save, holding the machine+user identifier of the writer,
//! and removed on close. Presence by another identity is advisory only —
//! the core never refuses to open or save based on it; a caller that wants
//! to warn the user checks `LockFile::holder` itself.

use std::path::{Path, PathBuf};

use sealvault_bootstrap::Platform;
use sealvault_domain::repositories::{IoAdapter, IoLocation};
use sealvault_domain::VaultError;

/// A lock-file sibling to a vault file, scoped to the lifetime of one open
/// database. Acquired on open/before save, released on `Drop` (or an
/// explicit `release`) so an interrupted process doesn't wedge a stale
/// lock in place forever — unlike the main file's own atomic-rename
/// discipline, the lock file itself is best-effort and never fsynced.
pub struct LockFile<'a> {
    adapter: &'a dyn IoAdapter,
    location: IoLocation,
    held: bool,
}

impl<'a> LockFile<'a> {
    /// The `<name>.lock` path alongside `vault_path`.
    pub fn path_for(vault_path: &Path) -> PathBuf {
        let file_name = vault_path.file_name().and_then(|n| n.to_str()).unwrap_or("vault");
        vault_path.with_file_name(format!("{file_name}.lock"))
    }

    /// Writes `<name>.lock` containing `"<user>@<machine>"` for the given
    /// platform identity. Overwrites any existing lock file unconditionally
    /// — the lock is advisory, not a mutex, so the core does not treat a
    /// pre-existing lock as an error (§6 "presence by another user is
    /// advisory only").
    pub fn acquire(adapter: &'a dyn IoAdapter, vault_path: &Path, platform: &dyn Platform) -> Result<Self, VaultError> {
        let location = IoLocation::local(Self::path_for(vault_path));
        let contents = format!("{}@{}", platform.user_identifier(), platform.machine_identifier());
        adapter.open_write(&location, contents.as_bytes())?;
        Ok(Self { adapter, location, held: true })
    }

    /// Reads the current holder identity, if a lock file exists.
    pub fn holder(adapter: &dyn IoAdapter, vault_path: &Path) -> Result<Option<String>, VaultError> {
        let location = IoLocation::local(Self::path_for(vault_path));
        if !adapter.exists(&location)? {
            return Ok(None);
        }
        let bytes = adapter.open_read(&location)?;
        Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
    }

    /// Removes the lock file. Safe to call more than once.
    pub fn release(&mut self) -> Result<(), VaultError> {
        if self.held {
            self.adapter.delete(&self.location)?;
            self.held = false;
        }
        Ok(())
    }
}

impl Drop for LockFile<'_> {
    fn drop(&mut self) {
        let _ = self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::io::LocalFileAdapter;
    use tempfile::tempdir;

    struct FakePlatform;
    impl Platform for FakePlatform {
        fn user_identifier(&self) -> String {
            "alice".to_string()
        }
        fn machine_identifier(&self) -> String {
            "workstation".to_string()
        }
        fn platform_name(&self) -> &'static str {
            "fake"
        }
    }

    #[test]
    fn acquire_writes_user_at_machine() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("vault.kdbx");
        let adapter = LocalFileAdapter::new();

        let _lock = LockFile::acquire(&adapter, &vault_path, &FakePlatform).unwrap();
        let holder = LockFile::holder(&adapter, &vault_path).unwrap();
        assert_eq!(holder, Some("alice@workstation".to_string()));
    }

    #[test]
    fn dropping_the_lock_removes_the_file() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("vault.kdbx");
        let adapter = LocalFileAdapter::new();

        {
            let _lock = LockFile::acquire(&adapter, &vault_path, &FakePlatform).unwrap();
            assert!(LockFile::holder(&adapter, &vault_path).unwrap().is_some());
        }
        assert!(LockFile::holder(&adapter, &vault_path).unwrap().is_none());
    }

    #[test]
    fn holder_is_none_when_no_lock_file_exists() {
        let dir = tempdir().unwrap();
        let vault_path = dir.path().join("vault.kdbx");
        let adapter = LocalFileAdapter::new();

        assert!(LockFile::holder(&adapter, &vault_path).unwrap().is_none());
    }
}
