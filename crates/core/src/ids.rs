//! Old-to-new device id translation.

use std::collections::HashMap;

/// Immutable mapping from obsolete device ids to current ones.
///
/// Text format: one pair per line, old id first, separated by spaces or
/// tabs. Lines with a single word are ignored, as are lines whose first word
/// starts with `#`. When an old id is listed twice the first entry wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdTable {
    map: HashMap<String, String>,
}

impl IdTable {
    /// Parse the whitespace-delimited table format.
    pub fn parse(text: &str) -> Self {
        let mut map = HashMap::new();
        for line in text.lines() {
            let mut words = line.split([' ', '\t', '\r']).filter(|w| !w.is_empty());
            let (Some(old), Some(new)) = (words.next(), words.next()) else {
                continue;
            };
            if old.starts_with('#') {
                continue;
            }
            map.entry(old.to_string()).or_insert_with(|| new.to_string());
        }
        Self { map }
    }

    /// Current id for `id`, or `id` itself when it is not obsolete.
    pub fn translate<'a>(&'a self, id: &'a str) -> &'a str {
        self.map.get(id).map_or(id, String::as_str)
    }

    /// Whether `id` has a translation.
    pub fn is_obsolete(&self, id: &str) -> bool {
        self.map.contains_key(id)
    }

    /// Number of translations.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
