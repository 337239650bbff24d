// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Value objects: immutable, identity-free data shared across the entity
//! model — UUIDs, timestamps, protected strings, memory-protection
//! configuration, auto-type settings, composite key sources, and opaque
//! (unknown) XML payloads preserved for round-tripping.

mod auto_type;
mod composite_key;
mod entity_id;
mod memory_protection_config;
mod opaque_element;
mod protected_string;
mod timestamp;

pub use auto_type::{AutoTypeAssociation, AutoTypeSettings, ObfuscationLevel};
pub use composite_key::{CompositeKey, KeySource};
pub use entity_id::EntityId;
pub use memory_protection_config::MemoryProtectionConfig;
pub use opaque_element::OpaqueElement;
pub use protected_string::ProtectedString;
pub use timestamp::{Timestamps, TriState};
