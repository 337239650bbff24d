// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The injected `IoAdapter` implementation (§6): a local-filesystem
//! concrete type behind the domain's `IoLocation`/`IoAdapter` port, plus
//! the advisory lock-file side-file written next to the main file during
//! save.

mod lock_file;
mod local_file;

pub use lock_file::LockFile;
pub use local_file::LocalFileAdapter;
