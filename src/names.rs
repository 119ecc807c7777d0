//! Reconciliation between independently maintained naming vocabularies.
//!
//! The service and the geographic reference dataset disagree on a handful of
//! country names. A [`NameMap`] is a plain forward lookup applied before a
//! query or a join; unmapped names pass through unchanged rather than being
//! dropped, so a miss shows up later as an unmatched row, never as an error.

use serde::Deserialize;
use std::collections::HashMap;

/// Forward lookup from one naming vocabulary to another.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NameMap(HashMap<String, String>);

impl NameMap {
    pub fn new(map: HashMap<String, String>) -> Self {
        Self(map)
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        )
    }

    /// Translate `name`, falling back to the input when unmapped.
    ///
    /// No fuzzy matching and no case or diacritic normalization is applied.
    pub fn apply<'a>(&'a self, name: &'a str) -> &'a str {
        self.0.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_name_is_translated() {
        let map = NameMap::from_pairs(&[("A", "B")]);
        assert_eq!(map.apply("A"), "B");
    }

    #[test]
    fn test_unmapped_name_passes_through() {
        let map = NameMap::from_pairs(&[("A", "B")]);
        let translated: Vec<&str> = ["A", "C"].iter().map(|n| map.apply(n)).collect();
        assert_eq!(translated, vec!["B", "C"]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let map = NameMap::from_pairs(&[("Czechia", "Czech Republic")]);
        assert_eq!(map.apply("czechia"), "czechia");
    }

    #[test]
    fn test_deserializes_from_toml_table() {
        let map: NameMap = toml::from_str("Czechia = \"Czech Republic\"").unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.apply("Czechia"), "Czech Republic");
    }
}
