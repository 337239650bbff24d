// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Unknown-XML preservation (§9 "Unknown XML preservation", §4.6). Elements
//! the body codec does not recognize are kept as opaque subtrees attached
//! to their owning group or entry, and re-emitted in their original
//! position on save.

/// An XML element the body codec did not model explicitly: its tag name,
/// attributes, and raw inner content, preserved verbatim. `children` holds
/// any nested opaque elements, so a whole unrecognized subtree round-trips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<OpaqueElement>,
    /// This element's position among its parent's original children, set
    /// only when the element is collected as one of an Entry/Group's
    /// `unknown_elements` — used to splice it back into the same slot on
    /// save instead of appending it after every recognized field.
    pub source_index: usize,
}

impl OpaqueElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            source_index: 0,
        }
    }
}
