//! Marker and count model
//!
//! Every command maps its counts to a `CountSet` before rendering output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single entry read from a marker source file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarkerEntry {
    /// Marker matched by literal substring containment
    Plain(String),
    /// Marker counted in the separate meta tally
    Meta(String),
}

impl MarkerEntry {
    pub fn plain(name: impl Into<String>) -> Self {
        MarkerEntry::Plain(name.into())
    }

    #[allow(dead_code)]
    pub fn meta(name: impl Into<String>) -> Self {
        MarkerEntry::Meta(name.into())
    }

    /// Identity used as the counting key
    pub fn identity(&self) -> &str {
        match self {
            MarkerEntry::Plain(name) | MarkerEntry::Meta(name) => name,
        }
    }

    #[allow(dead_code)]
    pub fn is_meta(&self) -> bool {
        matches!(self, MarkerEntry::Meta(_))
    }
}

/// Which tally a count belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountKind {
    Marker,
    Meta,
    Combination,
}

/// One rendered count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountItem {
    pub kind: CountKind,
    pub identity: String,
    pub count: usize,
}

impl CountItem {
    pub fn new(kind: CountKind, identity: impl Into<String>, count: usize) -> Self {
        Self {
            kind,
            identity: identity.into(),
            count,
        }
    }
}

/// Ordered collection of counts handed to the renderer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountSet {
    pub items: Vec<CountItem>,
}

impl CountSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append every entry of a count mapping, in key order
    pub fn extend_counts(&mut self, kind: CountKind, counts: &BTreeMap<String, usize>) {
        self.items.extend(
            counts
                .iter()
                .map(|(identity, count)| CountItem::new(kind, identity.as_str(), *count)),
        );
    }

    /// Items of one kind, in insertion order
    pub fn of_kind(&self, kind: CountKind) -> impl Iterator<Item = &CountItem> {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<CountItem> for CountSet {
    fn from_iter<T: IntoIterator<Item = CountItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_identity() {
        assert_eq!(MarkerEntry::plain("hi").identity(), "hi");
        assert_eq!(MarkerEntry::meta("tone").identity(), "tone");
        assert!(MarkerEntry::meta("tone").is_meta());
        assert!(!MarkerEntry::plain("tone").is_meta());
    }

    #[test]
    fn test_plain_and_meta_are_distinct() {
        assert_ne!(MarkerEntry::plain("x"), MarkerEntry::meta("x"));
    }

    #[test]
    fn test_extend_counts_keeps_key_order() {
        let mut counts = BTreeMap::new();
        counts.insert("b".to_string(), 1);
        counts.insert("a".to_string(), 2);

        let mut set = CountSet::new();
        set.extend_counts(CountKind::Marker, &counts);

        let ids: Vec<_> = set.items.iter().map(|i| i.identity.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_of_kind_filters() {
        let set: CountSet = vec![
            CountItem::new(CountKind::Marker, "a", 1),
            CountItem::new(CountKind::Meta, "m", 2),
            CountItem::new(CountKind::Marker, "b", 3),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.of_kind(CountKind::Marker).count(), 2);
        assert_eq!(set.of_kind(CountKind::Meta).count(), 1);
        assert_eq!(set.of_kind(CountKind::Combination).count(), 0);
    }

    #[test]
    fn test_count_item_serializes_lowercase_kind() {
        let item = CountItem::new(CountKind::Combination, "greeting", 3);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"combination","identity":"greeting","count":3}"#
        );
    }
}
