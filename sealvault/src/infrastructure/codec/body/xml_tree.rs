// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! A thin adapter wrapping `quick_xml`'s streaming reader/writer behind a
//! single generic tree shape (§4.6 "streaming, event-based codec ...
//! consistent with the teacher's adapter pattern"). `meta.rs`, `group.rs`,
//! and `entry.rs` never call into `quick_xml` directly — they only read and
//! build `OpaqueElement` trees, which already doubles as this format's
//! unknown-element preservation type (§9 "Unknown XML preservation").
//!
//! `quick_xml::Error` cannot get a blanket `From` impl onto `VaultError`
//! from here (orphan rule: neither type is local to this crate), so every
//! call site maps it explicitly through `xml_err`.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use sealvault_domain::value_objects::OpaqueElement;
use sealvault_domain::VaultError;

fn xml_err(err: quick_xml::Error) -> VaultError {
    VaultError::malformed_body(err.to_string())
}

fn attr_err(err: quick_xml::events::attributes::AttrError) -> VaultError {
    VaultError::malformed_body(err.to_string())
}

/// Parses `xml` into a single `OpaqueElement` rooted at the document's one
/// top-level element (`<KeePassFile>`).
pub fn parse_document(xml: &[u8]) -> Result<OpaqueElement, VaultError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();
    loop {
        let event = reader.read_event_into(&mut buf).map_err(xml_err)?;
        match event {
            Event::Start(start) => return parse_element(&mut reader, &start),
            Event::Eof => return Err(VaultError::malformed_body("document has no root element")),
            _ => {}
        }
        buf.clear();
    }
}

fn start_to_element(start: &BytesStart) -> Result<OpaqueElement, VaultError> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = OpaqueElement::new(tag);
    for attr in start.attributes() {
        let attr = attr.map_err(attr_err)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(xml_err)?.into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn parse_element(reader: &mut Reader<&[u8]>, start: &BytesStart) -> Result<OpaqueElement, VaultError> {
    let mut element = start_to_element(start)?;
    let mut buf = Vec::new();
    loop {
        let event = reader.read_event_into(&mut buf).map_err(xml_err)?;
        match event {
            Event::Start(child_start) => {
                let child = parse_element(reader, &child_start)?;
                element.children.push(child);
            }
            Event::Empty(child_start) => {
                element.children.push(start_to_element(&child_start)?);
            }
            Event::Text(text) => {
                element.text.push_str(&text.unescape().map_err(xml_err)?);
            }
            Event::CData(cdata) => {
                element.text.push_str(&String::from_utf8_lossy(&cdata.into_inner()));
            }
            Event::End(_) => break,
            Event::Eof => return Err(VaultError::malformed_body("unexpected end of document")),
            _ => {}
        }
        buf.clear();
    }
    Ok(element)
}

/// Serializes `root` back into a UTF-8 XML document, two-space indented.
pub fn write_document(root: &OpaqueElement) -> Result<Vec<u8>, VaultError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    write_element(&mut writer, root)?;
    Ok(writer.into_inner().into_inner())
}

fn write_element<W: Write>(writer: &mut Writer<W>, el: &OpaqueElement) -> Result<(), VaultError> {
    let mut start = BytesStart::new(el.tag.as_str());
    for (key, value) in &el.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if el.children.is_empty() && el.text.is_empty() {
        writer.write_event(Event::Empty(start)).map_err(xml_err)?;
        return Ok(());
    }

    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    if !el.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&el.text)))
            .map_err(xml_err)?;
    }
    for child in &el.children {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(end)).map_err(xml_err)?;
    Ok(())
}

pub fn find_child<'a>(el: &'a OpaqueElement, tag: &str) -> Option<&'a OpaqueElement> {
    el.children.iter().find(|c| c.tag == tag)
}

pub fn child_text<'a>(el: &'a OpaqueElement, tag: &str) -> Option<&'a str> {
    find_child(el, tag).map(|c| c.text.as_str())
}

pub fn required_child_text<'a>(el: &'a OpaqueElement, tag: &str) -> Result<&'a str, VaultError> {
    child_text(el, tag).ok_or_else(|| VaultError::malformed_body(format!("missing required <{tag}>")))
}

/// Re-inserts `unknown` elements among `known` (already in emission order)
/// at each one's recorded `source_index`, so an unrecognized element saved
/// back to disk lands in the same slot it was read from rather than
/// trailing after every recognized field (§4.6/§9 unknown-element
/// preservation). Unknowns are inserted in ascending `source_index` order
/// so earlier insertions don't shift later ones past their target slot.
pub fn splice_unknown_elements(known: Vec<OpaqueElement>, unknown: &[OpaqueElement]) -> Vec<OpaqueElement> {
    let mut ordered: Vec<&OpaqueElement> = unknown.iter().collect();
    ordered.sort_by_key(|el| el.source_index);
    let mut out = known;
    for el in ordered {
        let at = el.source_index.min(out.len());
        out.insert(at, el.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_nested_elements_and_attributes() {
        let mut root = OpaqueElement::new("KeePassFile");
        let mut meta = OpaqueElement::new("Meta");
        meta.children.push({
            let mut name = OpaqueElement::new("DatabaseName");
            name.text = "My Vault".to_string();
            name
        });
        root.children.push(meta);
        let mut value = OpaqueElement::new("Value");
        value.attributes.push(("Protected".to_string(), "True".to_string()));
        value.text = "c2VjcmV0".to_string();
        root.children.push(value);

        let xml = write_document(&root).unwrap();
        let parsed = parse_document(&xml).unwrap();

        assert_eq!(parsed.tag, "KeePassFile");
        assert_eq!(child_text(find_child(&parsed, "Meta").unwrap(), "DatabaseName"), Some("My Vault"));
        let value = find_child(&parsed, "Value").unwrap();
        assert_eq!(value.attributes, vec![("Protected".to_string(), "True".to_string())]);
        assert_eq!(value.text, "c2VjcmV0");
    }

    #[test]
    fn empty_element_round_trips_as_self_closing() {
        let mut root = OpaqueElement::new("Root");
        root.children.push(OpaqueElement::new("IsExpanded"));
        let xml = write_document(&root).unwrap();
        let parsed = parse_document(&xml).unwrap();
        assert_eq!(child_text(&parsed, "IsExpanded"), Some(""));
    }

    #[test]
    fn splice_unknown_elements_lands_back_in_its_original_slot() {
        let known = vec![
            OpaqueElement::new("A"),
            OpaqueElement::new("B"),
            OpaqueElement::new("C"),
        ];
        let mut unknown = OpaqueElement::new("Extra");
        unknown.source_index = 1;

        let spliced = splice_unknown_elements(known, &[unknown]);
        let tags: Vec<&str> = spliced.iter().map(|e| e.tag.as_str()).collect();
        assert_eq!(tags, vec!["A", "Extra", "B", "C"]);
    }
}
