use tracing::debug;

use crate::constants::session::MAX_DIMENSIONS;
use crate::dimension::{DimensionId, DimensionState, FilterSpec};
use crate::errors::FacetError;
use crate::filter::FilterState;
use crate::group::{GroupEntry, GroupId, GroupState, Reducer};
use crate::store::RecordStore;
use crate::types::{DimensionName, FacetKey};

/// Owns a record store plus the dimensions, filter state, and groups
/// derived from it.
///
/// All operations are synchronous and run to completion; filter
/// mutation goes through `&mut self`, so a session shared across
/// threads would need exactly the single-writer protection the borrow
/// checker already enforces here.
///
/// Groups follow the cross-filter self-exclusion rule: a group ignores
/// its own dimension's active filter, so a chart over that dimension
/// keeps showing every bin while other dimensions narrow the record
/// set.
pub struct Session<R> {
    store: RecordStore<R>,
    dimensions: Vec<DimensionState>,
    filters: FilterState,
    groups: Vec<GroupState<R>>,
}

impl<R> Session<R> {
    /// Start a session over a loaded store.
    pub fn new(store: RecordStore<R>) -> Self {
        let filters = FilterState::new(store.len());
        Self {
            store,
            dimensions: Vec::new(),
            filters,
            groups: Vec::new(),
        }
    }

    /// The records backing this session.
    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    /// Register a dimension under `name` with a pure key function.
    ///
    /// The key index is computed once here; the key function is not
    /// retained. Fails with [`FacetError::Config`] when the dimension
    /// limit is reached or the name is already taken.
    pub fn dimension<F>(
        &mut self,
        name: impl Into<DimensionName>,
        key_fn: F,
    ) -> Result<DimensionId, FacetError>
    where
        F: Fn(&R) -> FacetKey,
    {
        let name = name.into();
        if self.dimensions.len() >= MAX_DIMENSIONS {
            return Err(FacetError::Config(format!(
                "dimension limit of {MAX_DIMENSIONS} reached"
            )));
        }
        if self.dimensions.iter().any(|dim| dim.name == name) {
            return Err(FacetError::Config(format!(
                "dimension '{name}' already registered"
            )));
        }
        let keys = self.store.iter().map(key_fn).collect();
        self.dimensions.push(DimensionState { name, keys });
        self.filters.add_dimension();
        Ok(DimensionId(self.dimensions.len() - 1))
    }

    /// Set `dim`'s active filter, replacing any previous one.
    pub fn filter(&mut self, dim: DimensionId, spec: FilterSpec) -> Result<(), FacetError> {
        self.set_filter(dim, Some(spec))
    }

    /// Clear `dim`'s active filter.
    pub fn filter_all(&mut self, dim: DimensionId) -> Result<(), FacetError> {
        self.set_filter(dim, None)
    }

    fn set_filter(&mut self, dim: DimensionId, spec: Option<FilterSpec>) -> Result<(), FacetError> {
        let index = self.check_dimension(dim)?;
        let keys = &self.dimensions[index].keys;
        let flips = self.filters.set_filter(index, keys, spec);
        let records = self.store.records();
        for flip in &flips {
            for group in &mut self.groups {
                group.on_flip(flip, &records[flip.index]);
            }
        }
        debug!(
            dimension = %self.dimensions[index].name,
            active = ?self.filters.active(index),
            flipped = flips.len(),
            "filter updated"
        );
        Ok(())
    }

    /// The filter currently active on `dim`, if any.
    pub fn active_filter(&self, dim: DimensionId) -> Result<Option<&FilterSpec>, FacetError> {
        let index = self.check_dimension(dim)?;
        Ok(self.filters.active(index))
    }

    /// Create a group over `dim` keyed by the dimension's own key.
    pub fn group(&mut self, dim: DimensionId, reducer: Reducer<R>) -> Result<GroupId, FacetError> {
        let index = self.check_dimension(dim)?;
        let keys = self.dimensions[index].keys.clone();
        self.push_group(index, keys, reducer)
    }

    /// Create a group over `dim` with its own key function.
    ///
    /// The group still belongs to `dim` for filter exclusion purposes.
    pub fn group_by<F>(
        &mut self,
        dim: DimensionId,
        key_fn: F,
        reducer: Reducer<R>,
    ) -> Result<GroupId, FacetError>
    where
        F: Fn(&R) -> FacetKey,
    {
        let index = self.check_dimension(dim)?;
        let keys = self.store.iter().map(key_fn).collect();
        self.push_group(index, keys, reducer)
    }

    fn push_group(
        &mut self,
        dim_index: usize,
        keys: Vec<FacetKey>,
        reducer: Reducer<R>,
    ) -> Result<GroupId, FacetError> {
        let group = GroupState::build(
            dim_index,
            keys,
            reducer,
            self.store.records(),
            &self.filters,
        );
        self.groups.push(group);
        Ok(GroupId(self.groups.len() - 1))
    }

    /// Ordered `{key, value}` rows for a group, recomputed lazily from
    /// its live bins. Empty when no record is visible to the group.
    pub fn totals(&self, group: GroupId) -> Result<Vec<GroupEntry>, FacetError> {
        Ok(self.check_group(group)?.totals())
    }

    /// Sum of a group's bin values.
    pub fn visible_total(&self, group: GroupId) -> Result<f64, FacetError> {
        Ok(self.check_group(group)?.visible_total())
    }

    /// Sorted distinct keys of a dimension over ALL records, ignoring
    /// filters. Chart layers use this to enumerate facets and axes.
    pub fn distinct_keys(&self, dim: DimensionId) -> Result<Vec<FacetKey>, FacetError> {
        let index = self.check_dimension(dim)?;
        Ok(self.dimensions[index].distinct_keys())
    }

    /// Number of records passing every active filter.
    pub fn visible_count(&self) -> usize {
        (0..self.store.len())
            .filter(|&index| self.filters.is_visible(index))
            .count()
    }

    /// Records passing every active filter, in intake order.
    pub fn visible_records(&self) -> Vec<&R> {
        self.store
            .records()
            .iter()
            .enumerate()
            .filter(|(index, _)| self.filters.is_visible(*index))
            .map(|(_, record)| record)
            .collect()
    }

    /// Records visible to the given group, i.e. with its own
    /// dimension's filter ignored.
    pub fn records_visible_to(&self, group: GroupId) -> Result<Vec<&R>, FacetError> {
        let excluded = self.check_group(group)?.own_bit();
        Ok(self
            .store
            .records()
            .iter()
            .enumerate()
            .filter(|(index, _)| self.filters.is_visible_excluding(*index, excluded))
            .map(|(_, record)| record)
            .collect())
    }

    /// Total number of records in the store.
    pub fn record_count(&self) -> usize {
        self.store.len()
    }

    fn check_dimension(&self, dim: DimensionId) -> Result<usize, FacetError> {
        if dim.0 < self.dimensions.len() {
            Ok(dim.0)
        } else {
            Err(FacetError::Config(format!(
                "unknown dimension handle {}",
                dim.0
            )))
        }
    }

    fn check_group(&self, group: GroupId) -> Result<&GroupState<R>, FacetError> {
        self.groups
            .get(group.0)
            .ok_or_else(|| FacetError::Config(format!("unknown group handle {}", group.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RunRecord;

    fn small_session() -> Session<RunRecord> {
        Session::new(RecordStore::load(vec![
            RunRecord::new("r1", "bayes", "mst", 0.291),
            RunRecord::new("r1", "maxent", "mst", 0.379),
        ]))
    }

    #[test]
    fn duplicate_dimension_names_are_rejected() {
        let mut session = small_session();
        session
            .dimension("revision", |r: &RunRecord| r.revision.clone())
            .expect("first registration");
        let err = session
            .dimension("revision", |r: &RunRecord| r.revision.clone())
            .unwrap_err();
        assert!(matches!(err, FacetError::Config(_)));
    }

    #[test]
    fn dimension_limit_is_enforced() {
        let mut session = small_session();
        for i in 0..crate::constants::session::MAX_DIMENSIONS {
            session
                .dimension(format!("dim{i}"), |r: &RunRecord| r.revision.clone())
                .expect("within limit");
        }
        let err = session
            .dimension("overflow", |r: &RunRecord| r.revision.clone())
            .unwrap_err();
        assert!(matches!(err, FacetError::Config(_)));
    }

    #[test]
    fn stale_handles_from_another_session_are_config_errors() {
        let mut other = small_session();
        let foreign = other
            .dimension("revision", |r: &RunRecord| r.revision.clone())
            .expect("registration");
        let session = small_session();
        assert!(matches!(
            session.distinct_keys(foreign),
            Err(FacetError::Config(_))
        ));
        assert!(matches!(
            session.totals(GroupId(7)),
            Err(FacetError::Config(_))
        ));
    }

    #[test]
    fn groups_created_under_an_active_filter_see_only_visible_records() {
        let mut session = small_session();
        let classifier = session
            .dimension("classifier", |r: &RunRecord| r.classifier.clone())
            .expect("classifier dim");
        let decoder = session
            .dimension("decoder", |r: &RunRecord| r.decoder.clone())
            .expect("decoder dim");
        session
            .filter(classifier, FilterSpec::equals("bayes"))
            .expect("filter");
        let group = session
            .group(decoder, Reducer::sum(|r: &RunRecord| r.f1))
            .expect("group");
        let totals = session.totals(group).expect("totals");
        assert_eq!(totals.len(), 1);
        assert!((totals[0].value - 0.291).abs() < 1e-9);
    }

    #[test]
    fn active_filter_reports_replacement_and_clearing() {
        let mut session = small_session();
        let revision = session
            .dimension("revision", |r: &RunRecord| r.revision.clone())
            .expect("revision dim");
        assert!(session.active_filter(revision).expect("query").is_none());
        session
            .filter(revision, FilterSpec::equals("r1"))
            .expect("filter");
        assert!(session.active_filter(revision).expect("query").is_some());
        session.filter_all(revision).expect("clear");
        assert!(session.active_filter(revision).expect("query").is_none());
    }
}
