use tracing::warn;

use crate::errors::FacetError;

/// How [`RecordStore::load_checked`] treats records failing the schema check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaPolicy {
    /// Abort intake on the first failing record.
    Strict,
    /// Drop failing records and log each drop.
    Permissive,
}

/// Immutable record storage backing a session.
///
/// Records are held for the session lifetime; nothing mutates them
/// after intake, which is what lets dimensions precompute their key
/// indexes once.
#[derive(Clone, Debug, Default)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R> RecordStore<R> {
    /// Take ownership of a record sequence without any schema check.
    pub fn load<I>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        Self {
            records: records.into_iter().collect(),
        }
    }

    /// Take ownership of a record sequence, applying `check` to each
    /// record under the given policy.
    ///
    /// `Strict` fails fast with [`FacetError::Schema`] on the first bad
    /// record; `Permissive` drops bad records with a warning. Dropped
    /// records are rejected, never coerced.
    pub fn load_checked<I, C>(records: I, check: C, policy: SchemaPolicy) -> Result<Self, FacetError>
    where
        I: IntoIterator<Item = R>,
        C: Fn(&R) -> Result<(), String>,
    {
        let mut kept = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            match check(&record) {
                Ok(()) => kept.push(record),
                Err(details) => match policy {
                    SchemaPolicy::Strict => {
                        return Err(FacetError::Schema { index, details });
                    }
                    SchemaPolicy::Permissive => {
                        warn!(index, %details, "dropping record that failed schema check");
                    }
                },
            }
        }
        Ok(Self { records: kept })
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    /// Iterate all records in intake order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    pub(crate) fn records(&self) -> &[R] {
        &self.records
    }
}
