//! The in-memory icon collection.

use std::collections::BTreeMap;

use crate::ast::Svg;
use crate::export::IconSetExport;
use crate::parse::parse_svg;

/// An entry in an icon set: a real icon, or an alias for one.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Icon { source: String },
    Alias { parent: String },
}

impl Entry {
    pub fn is_icon(&self) -> bool {
        matches!(self, Entry::Icon { .. })
    }
}

/// A prefixed collection of icons, keyed by name. Owned exclusively by the
/// pipeline for the duration of a run; nothing persists between runs.
#[derive(Debug, Clone)]
pub struct IconSet {
    prefix: String,
    entries: BTreeMap<String, Entry>,
}

impl IconSet {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn insert_icon(&mut self, name: impl Into<String>, source: impl Into<String>) {
        self.entries.insert(
            name.into(),
            Entry::Icon {
                source: source.into(),
            },
        );
    }

    pub fn insert_alias(&mut self, name: impl Into<String>, parent: impl Into<String>) {
        self.entries.insert(
            name.into(),
            Entry::Alias {
                parent: parent.into(),
            },
        );
    }

    pub fn remove(&mut self, name: &str) -> Option<Entry> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Snapshot of all entry names, in order.
    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of real icons (aliases excluded).
    pub fn icon_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_icon()).count()
    }

    /// Parse the named icon's markup. `None` when the entry is missing, is
    /// not an icon, or its markup is empty or unparsable.
    pub fn to_svg(&self, name: &str) -> Option<Svg> {
        let Entry::Icon { source } = self.entries.get(name)? else {
            return None;
        };
        if source.trim().is_empty() {
            return None;
        }
        parse_svg(source).ok()
    }

    /// Replace the whole entry map; used by the transform step to swap in
    /// the surviving entries atomically.
    pub(crate) fn set_entries(&mut self, entries: BTreeMap<String, Entry>) {
        self.entries = entries;
    }

    /// Snapshot this collection as an export document.
    pub fn export(&self) -> IconSetExport {
        IconSetExport::from_set(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_names() {
        let mut set = IconSet::new("custom");
        set.insert_icon("b", "<svg/>");
        set.insert_icon("a", "<svg/>");
        set.insert_alias("c", "a");

        assert_eq!(set.len(), 3);
        assert_eq!(set.icon_count(), 2);
        assert_eq!(set.names(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_to_svg_classifies_bad_entries() {
        let mut set = IconSet::new("custom");
        set.insert_icon("ok", r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#);
        set.insert_icon("empty", "   ");
        set.insert_icon("broken", "<svg><oops</svg>");
        set.insert_alias("alias", "ok");

        assert!(set.to_svg("ok").is_some());
        assert!(set.to_svg("empty").is_none());
        assert!(set.to_svg("broken").is_none());
        assert!(set.to_svg("alias").is_none());
        assert!(set.to_svg("missing").is_none());
    }

    #[test]
    fn test_remove() {
        let mut set = IconSet::new("custom");
        set.insert_icon("a", "<svg/>");
        assert!(set.remove("a").is_some());
        assert!(set.remove("a").is_none());
        assert!(set.is_empty());
    }
}
