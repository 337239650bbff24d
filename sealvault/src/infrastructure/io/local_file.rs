// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Local-filesystem `IoAdapter` (§6, §5): `open_write` is atomic at the
//! file level — write to a sibling temporary, fsync, then rename over the
//! destination — so a crash mid-write never leaves a half-written file in
//! the primary's place (§5 "Ordering guarantees").

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sealvault_domain::repositories::{IoAdapter, IoLocation};
use sealvault_domain::VaultError;

/// The only `IoAdapter` this crate ships: local files addressed by
/// `IoLocation::LocalFile`. An `IoLocation::OpaqueUrl` is out of scope
/// (§1 "platform key-vault integrations" and network sync are external
/// collaborators) and is rejected with `IoFailure`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileAdapter;

impl LocalFileAdapter {
    pub fn new() -> Self {
        Self
    }

    fn path_of<'a>(location: &'a IoLocation) -> Result<&'a Path, VaultError> {
        match location {
            IoLocation::LocalFile(path) => Ok(path.as_path()),
            IoLocation::OpaqueUrl(url) => Err(VaultError::IoFailure(format!(
                "LocalFileAdapter cannot resolve opaque URL location: {url}"
            ))),
        }
    }
}

impl IoAdapter for LocalFileAdapter {
    fn open_read(&self, location: &IoLocation) -> Result<Vec<u8>, VaultError> {
        let path = Self::path_of(location)?;
        fs::read(path).map_err(VaultError::from)
    }

    /// Writes `contents` to a sibling temporary file, fsyncs it, then
    /// renames it over `location` — the destination either holds the old
    /// bytes or the new ones in full, never a partial write (§5).
    fn open_write(&self, location: &IoLocation, contents: &[u8]) -> Result<(), VaultError> {
        let path = Self::path_of(location)?;
        let temp_path = sibling_temp_path(path);

        let mut file = File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path).map_err(|err| {
            let _ = fs::remove_file(&temp_path);
            VaultError::from(err)
        })
    }

    fn rename(&self, from: &IoLocation, to: &IoLocation) -> Result<(), VaultError> {
        let from = Self::path_of(from)?;
        let to = Self::path_of(to)?;
        fs::rename(from, to).map_err(VaultError::from)
    }

    fn delete(&self, location: &IoLocation) -> Result<(), VaultError> {
        let path = Self::path_of(location)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(VaultError::from(err)),
        }
    }

    fn exists(&self, location: &IoLocation) -> Result<bool, VaultError> {
        let path = Self::path_of(location)?;
        Ok(path.exists())
    }
}

/// `<name>.tmp-<pid>` next to `path`, so a concurrent save from a second
/// process (unsupported but not actively dangerous, §5) does not collide
/// on the same temporary name.
fn sibling_temp_path(path: &Path) -> PathBuf {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("sealvault");
    let temp_name = format!(".{file_name}.tmp-{}", std::process::id());
    path.with_file_name(temp_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let location = IoLocation::local(dir.path().join("vault.kdbx"));
        let adapter = LocalFileAdapter::new();

        adapter.open_write(&location, b"file contents").unwrap();
        assert_eq!(adapter.open_read(&location).unwrap(), b"file contents");
    }

    #[test]
    fn open_write_leaves_no_temp_file_behind_on_success() {
        let dir = tempdir().unwrap();
        let location = IoLocation::local(dir.path().join("vault.kdbx"));
        let adapter = LocalFileAdapter::new();

        adapter.open_write(&location, b"contents").unwrap();
        let leftover: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp-"))
            .collect();
        assert!(leftover.is_empty());
    }

    #[test]
    fn overwriting_an_existing_file_replaces_its_contents_atomically() {
        let dir = tempdir().unwrap();
        let location = IoLocation::local(dir.path().join("vault.kdbx"));
        let adapter = LocalFileAdapter::new();

        adapter.open_write(&location, b"first version").unwrap();
        adapter.open_write(&location, b"second version").unwrap();
        assert_eq!(adapter.open_read(&location).unwrap(), b"second version");
    }

    #[test]
    fn exists_reflects_presence() {
        let dir = tempdir().unwrap();
        let location = IoLocation::local(dir.path().join("vault.kdbx"));
        let adapter = LocalFileAdapter::new();

        assert!(!adapter.exists(&location).unwrap());
        adapter.open_write(&location, b"x").unwrap();
        assert!(adapter.exists(&location).unwrap());
    }

    #[test]
    fn delete_is_idempotent_when_the_file_is_already_gone() {
        let dir = tempdir().unwrap();
        let location = IoLocation::local(dir.path().join("vault.kdbx"));
        let adapter = LocalFileAdapter::new();

        assert!(adapter.delete(&location).is_ok());
    }

    #[test]
    fn opaque_url_is_rejected() {
        let adapter = LocalFileAdapter::new();
        let location = IoLocation::url("https://example.invalid/vault.kdbx");
        assert!(adapter.open_read(&location).is_err());
    }
}
