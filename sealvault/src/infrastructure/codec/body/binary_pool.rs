// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The `Meta/Binaries` pool (§4.6): entries reference attachment bytes by
//! index rather than inlining them, so the same attachment shared across
//! several entries is stored once. `Entry::binaries` holds the actual
//! bytes, not the index — this pool exists only at the XML boundary.

use std::collections::HashMap;

use base64::Engine;
use sealvault_domain::value_objects::OpaqueElement;
use sealvault_domain::VaultError;

use super::xml_tree::find_child;

pub struct BinaryPool {
    data: Vec<Vec<u8>>,
    by_content: HashMap<Vec<u8>, usize>,
}

impl BinaryPool {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            by_content: HashMap::new(),
        }
    }

    /// Interns `bytes`, returning its pool index. Identical content already
    /// present is reused rather than duplicated.
    pub fn intern(&mut self, bytes: Vec<u8>) -> usize {
        if let Some(&index) = self.by_content.get(&bytes) {
            return index;
        }
        let index = self.data.len();
        self.by_content.insert(bytes.clone(), index);
        self.data.push(bytes);
        index
    }

    pub fn get(&self, index: usize) -> Result<&[u8], VaultError> {
        self.data
            .get(index)
            .map(|v| v.as_slice())
            .ok_or_else(|| VaultError::malformed_body(format!("binary reference {index} out of range")))
    }

    pub fn to_element(&self) -> OpaqueElement {
        let mut binaries = OpaqueElement::new("Binaries");
        for (index, bytes) in self.data.iter().enumerate() {
            let mut el = OpaqueElement::new("Binary");
            el.attributes.push(("ID".to_string(), index.to_string()));
            el.text = base64::engine::general_purpose::STANDARD.encode(bytes);
            binaries.children.push(el);
        }
        binaries
    }

    pub fn from_meta(meta: &OpaqueElement) -> Result<Self, VaultError> {
        let mut pool = Self::new();
        let Some(binaries) = find_child(meta, "Binaries") else {
            return Ok(pool);
        };
        for el in &binaries.children {
            if el.tag != "Binary" {
                continue;
            }
            let id: usize = el
                .attributes
                .iter()
                .find(|(k, _)| k == "ID")
                .and_then(|(_, v)| v.parse().ok())
                .ok_or_else(|| VaultError::malformed_body("Binary element missing numeric ID"))?;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(el.text.trim())
                .map_err(|e| VaultError::malformed_body(format!("bad binary base64: {e}")))?;
            if id >= pool.data.len() {
                pool.data.resize(id + 1, Vec::new());
            }
            pool.data[id] = bytes;
        }
        Ok(pool)
    }
}

impl Default for BinaryPool {
    fn default() -> Self {
        Self::new()
    }
}
