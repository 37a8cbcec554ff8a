use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::types::{DimensionName, FacetKey};

/// Opaque handle for a dimension registered with a session.
///
/// Handles are only meaningful for the session that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DimensionId(pub(crate) usize);

/// Active restriction applied to a dimension's keys.
///
/// Filters match against the dimension's key values, not against raw
/// records: `Exact("r1")` on a revision dimension keeps every record
/// whose revision key is `r1`.
#[derive(Clone)]
pub enum FilterSpec {
    /// Keep records whose key equals the given value.
    Exact(FacetKey),
    /// Keep records whose key is any of the given values.
    AnyOf(BTreeSet<FacetKey>),
    /// Keep records whose key satisfies the predicate.
    Where(Arc<dyn Fn(&FacetKey) -> bool + Send + Sync>),
}

impl FilterSpec {
    /// Exact-match filter on a single key.
    pub fn equals(key: impl Into<FacetKey>) -> Self {
        Self::Exact(key.into())
    }

    /// Membership filter over several keys.
    pub fn any_of<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<FacetKey>,
    {
        Self::AnyOf(keys.into_iter().map(Into::into).collect())
    }

    /// Predicate filter over the key value.
    pub fn where_key<F>(predicate: F) -> Self
    where
        F: Fn(&FacetKey) -> bool + Send + Sync + 'static,
    {
        Self::Where(Arc::new(predicate))
    }

    pub(crate) fn matches(&self, key: &FacetKey) -> bool {
        match self {
            Self::Exact(wanted) => key == wanted,
            Self::AnyOf(wanted) => wanted.contains(key),
            Self::Where(predicate) => predicate(key),
        }
    }
}

impl fmt::Debug for FilterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(key) => f.debug_tuple("Exact").field(key).finish(),
            Self::AnyOf(keys) => f.debug_tuple("AnyOf").field(keys).finish(),
            Self::Where(_) => f.write_str("Where(..)"),
        }
    }
}

/// Internal per-dimension state: the name plus the key index computed
/// once at registration (the store never changes afterwards).
pub(crate) struct DimensionState {
    pub(crate) name: DimensionName,
    /// `keys[i]` is the key of record `i`.
    pub(crate) keys: Vec<FacetKey>,
}

impl DimensionState {
    /// Sorted distinct keys over all records, ignoring filters.
    pub(crate) fn distinct_keys(&self) -> Vec<FacetKey> {
        let unique: BTreeSet<&FacetKey> = self.keys.iter().collect();
        unique.into_iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_filters_match_only_their_key() {
        let spec = FilterSpec::equals("r1");
        assert!(spec.matches(&"r1".to_string()));
        assert!(!spec.matches(&"r2".to_string()));
    }

    #[test]
    fn any_of_filters_match_each_member() {
        let spec = FilterSpec::any_of(["last", "mst"]);
        assert!(spec.matches(&"last".to_string()));
        assert!(spec.matches(&"mst".to_string()));
        assert!(!spec.matches(&"local".to_string()));
    }

    #[test]
    fn predicate_filters_see_the_key_value() {
        let spec = FilterSpec::where_key(|key| key.starts_with("local"));
        assert!(spec.matches(&"local".to_string()));
        assert!(spec.matches(&"locallyGreedy".to_string()));
        assert!(!spec.matches(&"last".to_string()));
    }

    #[test]
    fn distinct_keys_are_sorted_and_deduped() {
        let state = DimensionState {
            name: "decoder".to_string(),
            keys: vec![
                "mst".to_string(),
                "last".to_string(),
                "mst".to_string(),
                "local".to_string(),
            ],
        };
        assert_eq!(state.distinct_keys(), vec!["last", "local", "mst"]);
    }
}
