//! The validated filter state of a single browse request.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};


/// Validated filter key to value-set map. Built fresh per request by the
/// sanitizer; every key is guaranteed present in the filter schema and every
/// value respects the definition's length limit. A text-search entry holds at
/// most one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct AppliedFilters {
    filters: BTreeMap<String, BTreeSet<String>>,
}

impl AppliedFilters {
    pub fn new() -> Self {
        AppliedFilters::default()
    }

    pub fn insert(&mut self, key: String, values: BTreeSet<String>) {
        if !values.is_empty() {
            self.filters.insert(key, values);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<BTreeSet<String>> {
        self.filters.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.filters.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.filters.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.filters.keys()
    }

    /// Overwrites entries with route-fixed filters. Fixed filters win over
    /// anything the client supplied for the same key, so a crafted query
    /// string cannot widen a section route.
    pub fn apply_fixed(&mut self, fixed: &AppliedFilters) {
        for (key, values) in fixed.iter() {
            self.filters.insert(key.clone(), values.clone());
        }
    }
}

impl FromIterator<(String, BTreeSet<String>)> for AppliedFilters {
    fn from_iter<T: IntoIterator<Item = (String, BTreeSet<String>)>>(iter: T) -> Self {
        let mut filters = AppliedFilters::new();
        for (key, values) in iter {
            filters.insert(key, values);
        }
        filters
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn values(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn empty_value_sets_are_not_stored() {
        let mut filters = AppliedFilters::new();
        filters.insert("gender".to_string(), BTreeSet::new());
        assert!(filters.is_empty());
    }

    #[test]
    fn fixed_filters_overwrite_client_values() {
        let mut filters = AppliedFilters::new();
        filters.insert("type".to_string(), values(&["item", "villager"]));
        let mut fixed = AppliedFilters::new();
        fixed.insert("type".to_string(), values(&["villager"]));
        filters.apply_fixed(&fixed);
        assert_eq!(filters.get("type"), Some(&values(&["villager"])));
    }
}
