// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # sealvault-domain
//!
//! The pure domain layer of an encrypted, hierarchical secret-storage
//! engine: the entity model (groups, entries, history, tombstones), the
//! value objects that back it (protected strings, timestamps, composite
//! key sources), and the cryptographic and merge services built on top of
//! them.
//!
//! This crate is deliberately synchronous and has no knowledge of the
//! filesystem, the network, or an async runtime — the outer file codec,
//! logging, and configuration concerns live one layer up, in `sealvault`.
//! I/O is only ever reached through the `repositories::IoAdapter` seam,
//! which callers inject.

pub mod entities;
pub mod error;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::{Cipher, Compression, Database, DeletedObject, Entry, Group};
pub use error::VaultError;
pub use services::MergePolicy;
