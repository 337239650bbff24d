// /////////////////////////////////////////////////////////////////////////////
// sealvault
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Search (§6): find entries by UUID, or by substring/regex over a
//! configurable field mask. Read-only over the tree, so it borrows rather
//! than mutates — unlike the merge engine, there is no reconciliation here.

use regex::RegexBuilder;

use crate::entities::{Entry, Group};
use crate::value_objects::EntityId;

/// Which entry fields a substring/regex search considers, mirroring the
/// field list in §6 ("Titles, UserNames, URLs, Passwords, Notes, Other,
/// UUIDs, Tags"). `other` matches any non-standard string field name.
#[derive(Debug, Clone, Copy)]
pub struct FieldMask {
    pub titles: bool,
    pub user_names: bool,
    pub urls: bool,
    pub passwords: bool,
    pub notes: bool,
    pub other: bool,
    pub uuids: bool,
    pub tags: bool,
}

impl FieldMask {
    /// Every field considered — the natural default for a free-text search
    /// box with nothing more specific configured.
    pub fn all() -> Self {
        Self {
            titles: true,
            user_names: true,
            urls: true,
            passwords: true,
            notes: true,
            other: true,
            uuids: true,
            tags: true,
        }
    }

    /// The common case: everything but `Passwords`, so a plain search never
    /// surfaces a secret value in a results list.
    pub fn visible_fields() -> Self {
        Self {
            passwords: false,
            ..Self::all()
        }
    }
}

impl Default for FieldMask {
    fn default() -> Self {
        Self::visible_fields()
    }
}

/// Whether a query is matched literally (case-sensitivity still
/// configurable) or compiled as a regular expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Substring,
    Regex,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchOptions {
    pub field_mask: FieldMask,
    pub case_insensitive: bool,
    pub query_kind: QueryKind,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            field_mask: FieldMask::default(),
            case_insensitive: true,
            query_kind: QueryKind::Substring,
        }
    }
}

/// A predicate over one entry's searchable text, built once per call to
/// `search` and reused across the whole tree rather than re-parsing the
/// query (and re-compiling a regex) per entry.
enum Matcher {
    Substring { needle: String, case_insensitive: bool },
    Regex(regex::Regex),
}

impl Matcher {
    fn compile(query: &str, options: &SearchOptions) -> Result<Self, regex::Error> {
        match options.query_kind {
            QueryKind::Substring => Ok(Matcher::Substring {
                needle: if options.case_insensitive { query.to_lowercase() } else { query.to_string() },
                case_insensitive: options.case_insensitive,
            }),
            QueryKind::Regex => {
                let compiled = RegexBuilder::new(query).case_insensitive(options.case_insensitive).build()?;
                Ok(Matcher::Regex(compiled))
            }
        }
    }

    fn is_match(&self, haystack: &str) -> bool {
        match self {
            Matcher::Substring { needle, case_insensitive } => {
                if *case_insensitive {
                    haystack.to_lowercase().contains(needle.as_str())
                } else {
                    haystack.contains(needle.as_str())
                }
            }
            Matcher::Regex(re) => re.is_match(haystack),
        }
    }
}

/// Finds the entry with `uuid` anywhere under `root` (§6 "Search: by
/// UUID"). A thin wrapper over `Group::find_entry` kept here so both
/// lookup kinds share one public entry point.
pub fn find_by_uuid(root: &Group, uuid: EntityId) -> Option<&Entry> {
    root.find_entry(uuid)
}

/// Finds every entry under `root` whose fields (per `options.field_mask`)
/// match `query`, interpreted as a literal substring or a regular
/// expression per `options.query_kind`.
///
/// Returns `InvalidKey`-shaped failure only if `query` fails to compile as
/// a regex; a bad substring query cannot fail.
pub fn search<'a>(root: &'a Group, query: &str, options: &SearchOptions) -> Result<Vec<&'a Entry>, regex::Error> {
    let matcher = Matcher::compile(query, options)?;
    let mut matches = Vec::new();
    collect_matches(root, &matcher, &options.field_mask, &mut matches);
    Ok(matches)
}

fn collect_matches<'a>(group: &'a Group, matcher: &Matcher, mask: &FieldMask, out: &mut Vec<&'a Entry>) {
    for entry in &group.entries {
        if entry_matches(entry, matcher, mask) {
            out.push(entry);
        }
    }
    for child in &group.groups {
        collect_matches(child, matcher, mask, out);
    }
}

fn entry_matches(entry: &Entry, matcher: &Matcher, mask: &FieldMask) -> bool {
    if mask.uuids && matcher.is_match(&entry.uuid.to_string()) {
        return true;
    }
    if mask.tags && entry.tags.iter().any(|tag| matcher.is_match(tag)) {
        return true;
    }
    for (name, value) in entry.strings() {
        let included = match name.as_str() {
            "Title" => mask.titles,
            "UserName" => mask.user_names,
            "URL" => mask.urls,
            "Password" => mask.passwords,
            "Notes" => mask.notes,
            _ => mask.other,
        };
        if included && matcher.is_match(&value.read()) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::MemoryProtectionConfig;

    fn entry_with_title(title: &str) -> Entry {
        let mut entry = Entry::new(&MemoryProtectionConfig::default(), b"seed");
        entry.set_string("Title", title, false, b"seed");
        entry
    }

    #[test]
    fn substring_search_is_case_insensitive_by_default() {
        let mut root = Group::new_root();
        root.entries.push(entry_with_title("My Bank Account"));

        let results = search(&root, "bank", &SearchOptions::default()).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn password_field_is_excluded_by_the_default_mask() {
        let mut root = Group::new_root();
        let mut entry = entry_with_title("Example");
        entry.set_string("Password", "hunter2", true, b"seed");
        root.entries.push(entry);

        let results = search(&root, "hunter2", &SearchOptions::default()).unwrap();
        assert!(results.is_empty());

        let options = SearchOptions { field_mask: FieldMask::all(), ..SearchOptions::default() };
        let results = search(&root, "hunter2", &options).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn regex_query_matches_a_pattern() {
        let mut root = Group::new_root();
        root.entries.push(entry_with_title("invoice-2024-01"));
        root.entries.push(entry_with_title("not a match"));

        let options = SearchOptions { query_kind: QueryKind::Regex, ..SearchOptions::default() };
        let results = search(&root, r"invoice-\d{4}-\d{2}", &options).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn find_by_uuid_locates_entry_in_nested_group() {
        let mut root = Group::new_root();
        let mut child = Group::new("child");
        let entry = entry_with_title("Nested");
        let uuid = entry.uuid;
        child.entries.push(entry);
        root.groups.push(child);

        assert!(find_by_uuid(&root, uuid).is_some());
        assert_eq!(find_by_uuid(&root, EntityId::new()), None);
    }
}
