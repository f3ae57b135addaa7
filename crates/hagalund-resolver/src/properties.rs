#![forbid(unsafe_code)]

//! Free-form string properties carried by each resolver instance.

use std::collections::{BTreeMap, HashMap};

/// Per-instance key/value configuration.
///
/// The engine never reads or merges these; only the owning plugin gives
/// them meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    values: BTreeMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, replacing any previous value.
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Keys currently set, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    /// Copy every entry of `props` into the bag.
    pub fn extend(&mut self, props: &HashMap<String, String>) {
        for (key, value) in props {
            self.set(key, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_replace() {
        let mut bag = PropertyBag::new();
        assert!(bag.is_empty());
        bag.set("http.proxy.host", "proxy.local");
        bag.set("http.proxy.host", "proxy.example");
        assert_eq!(bag.get("http.proxy.host"), Some("proxy.example"));
        assert_eq!(bag.get("http.proxy.port"), None);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_extend_and_keys_sorted() {
        let mut bag = PropertyBag::new();
        let mut props = HashMap::new();
        props.insert("b".to_owned(), "2".to_owned());
        props.insert("a".to_owned(), "1".to_owned());
        bag.extend(&props);
        assert_eq!(bag.keys(), vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn test_clones_are_independent() {
        let mut first = PropertyBag::new();
        first.set("k", "v");
        let mut second = first.clone();
        second.set("k", "w");
        assert_eq!(first.get("k"), Some("v"));
        assert_eq!(second.get("k"), Some("w"));
    }
}
