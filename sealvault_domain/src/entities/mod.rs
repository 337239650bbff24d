// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The entity model (§3): groups, entries, deleted-object tombstones, and
//! the `Database` aggregate that owns them. Groups form a plain owned tree
//! — no `Rc`/`RefCell`, no stored parent pointer (§9 "Cyclic parent
//! pointers"); traversals carry the ancestor chain on the call stack
//! instead of following a back-reference.

mod database;
mod deleted_object;
mod entry;
mod group;

pub use database::{Cipher, Compression, Database};
pub use deleted_object::DeletedObject;
pub use entry::{Entry, STANDARD_FIELDS};
pub use group::Group;
