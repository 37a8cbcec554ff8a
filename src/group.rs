use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::filter::{DimensionMask, FilterState, MaskFlip};
use crate::types::FacetKey;

/// Opaque handle for a group registered with a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupId(pub(crate) usize);

/// One key/value row of a group's totals. Rows are emitted in sorted
/// key order so chart layers get reproducible output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupEntry {
    /// Bin key.
    pub key: FacetKey,
    /// Reduced value over the bin's visible records.
    pub value: f64,
}

/// Incremental reducer: an identity value plus add/remove steps, so a
/// filter change costs work proportional to the records it actually
/// flipped rather than a full rescan.
pub struct Reducer<R> {
    pub(crate) initial: f64,
    pub(crate) add: Arc<dyn Fn(f64, &R) -> f64 + Send + Sync>,
    pub(crate) remove: Arc<dyn Fn(f64, &R) -> f64 + Send + Sync>,
}

impl<R> Clone for Reducer<R> {
    fn clone(&self) -> Self {
        Self {
            initial: self.initial,
            add: self.add.clone(),
            remove: self.remove.clone(),
        }
    }
}

impl<R> fmt::Debug for Reducer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reducer")
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

impl<R> Reducer<R> {
    /// Sum a numeric field selected by a typed accessor.
    pub fn sum<F>(accessor: F) -> Self
    where
        F: Fn(&R) -> f64 + Send + Sync + 'static,
    {
        let accessor = Arc::new(accessor);
        let add_accessor = accessor.clone();
        Self {
            initial: 0.0,
            add: Arc::new(move |acc, record| acc + add_accessor(record)),
            remove: Arc::new(move |acc, record| acc - accessor(record)),
        }
    }

    /// Count visible records per bin.
    pub fn count() -> Self {
        Self {
            initial: 0.0,
            add: Arc::new(|acc, _| acc + 1.0),
            remove: Arc::new(|acc, _| acc - 1.0),
        }
    }

    /// Fully custom reduction steps. `remove` must invert `add` for the
    /// incremental bin updates to stay exact.
    pub fn custom<A, D>(initial: f64, add: A, remove: D) -> Self
    where
        A: Fn(f64, &R) -> f64 + Send + Sync + 'static,
        D: Fn(f64, &R) -> f64 + Send + Sync + 'static,
    {
        Self {
            initial,
            add: Arc::new(add),
            remove: Arc::new(remove),
        }
    }
}

/// One bin of a group. The count tracks bin membership so an emptied
/// bin can be dropped outright; its value resets to the reducer
/// identity at that point, which also clears accumulated float drift.
struct Bin {
    count: usize,
    value: f64,
}

/// Internal group state: the owning dimension, the per-record group
/// keys, and the live bins.
pub(crate) struct GroupState<R> {
    dim: usize,
    keys: Vec<FacetKey>,
    reducer: Reducer<R>,
    bins: BTreeMap<FacetKey, Bin>,
}

impl<R> GroupState<R> {
    /// Build a group and seed its bins from every record currently
    /// visible to it (own dimension's filter excluded).
    pub(crate) fn build(
        dim: usize,
        keys: Vec<FacetKey>,
        reducer: Reducer<R>,
        records: &[R],
        filters: &FilterState,
    ) -> Self {
        let mut group = Self {
            dim,
            keys,
            reducer,
            bins: BTreeMap::new(),
        };
        let excluded = group.own_bit();
        for (index, record) in records.iter().enumerate() {
            if filters.is_visible_excluding(index, excluded) {
                group.insert(index, record);
            }
        }
        group
    }

    pub(crate) fn own_bit(&self) -> DimensionMask {
        1u32 << self.dim
    }

    /// React to one record's mask change: enter or leave the bin if the
    /// group-relative visibility actually flipped.
    pub(crate) fn on_flip(&mut self, flip: &MaskFlip, record: &R) {
        let excluded = !self.own_bit();
        let was_visible = flip.before & excluded == 0;
        let is_visible = flip.after & excluded == 0;
        match (was_visible, is_visible) {
            (false, true) => self.insert(flip.index, record),
            (true, false) => self.withdraw(flip.index, record),
            _ => {}
        }
    }

    fn insert(&mut self, index: usize, record: &R) {
        let key = self.keys[index].clone();
        let bin = self.bins.entry(key).or_insert(Bin {
            count: 0,
            value: self.reducer.initial,
        });
        bin.count += 1;
        bin.value = (self.reducer.add)(bin.value, record);
    }

    fn withdraw(&mut self, index: usize, record: &R) {
        let key = &self.keys[index];
        let Some(bin) = self.bins.get_mut(key) else {
            return;
        };
        bin.count -= 1;
        if bin.count == 0 {
            self.bins.remove(key);
        } else {
            bin.value = (self.reducer.remove)(bin.value, record);
        }
    }

    /// Ordered key/value rows over the currently-visible records.
    /// Empty when nothing is visible.
    pub(crate) fn totals(&self) -> Vec<GroupEntry> {
        self.bins
            .iter()
            .map(|(key, bin)| GroupEntry {
                key: key.clone(),
                value: bin.value,
            })
            .collect()
    }

    /// Sum of all bin values.
    pub(crate) fn visible_total(&self) -> f64 {
        self.bins.values().map(|bin| bin.value).sum()
    }
}
