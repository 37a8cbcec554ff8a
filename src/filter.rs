//! Shared visibility state: one bitmask per record, one bit per dimension.

use crate::dimension::FilterSpec;
use crate::types::FacetKey;

/// Per-record mask; bit `d` set means the record FAILS dimension `d`'s
/// active filter. A record is visible when every bit a caller cares
/// about is clear.
pub(crate) type DimensionMask = u32;

/// A record whose mask changed during a filter update.
pub(crate) struct MaskFlip {
    pub(crate) index: usize,
    pub(crate) before: DimensionMask,
    pub(crate) after: DimensionMask,
}

/// Maintains zero-or-one active filter per dimension plus the record
/// masks they induce.
pub(crate) struct FilterState {
    masks: Vec<DimensionMask>,
    active: Vec<Option<FilterSpec>>,
}

impl FilterState {
    pub(crate) fn new(record_count: usize) -> Self {
        Self {
            masks: vec![0; record_count],
            active: Vec::new(),
        }
    }

    /// Register a new dimension slot; all records start visible for it.
    pub(crate) fn add_dimension(&mut self) {
        self.active.push(None);
    }

    pub(crate) fn active(&self, dim: usize) -> Option<&FilterSpec> {
        self.active.get(dim).and_then(|spec| spec.as_ref())
    }

    /// Replace dimension `dim`'s filter and re-evaluate its bit for
    /// every record. Returns the records whose bit flipped, with their
    /// masks before and after; downstream group updates touch only
    /// those records.
    pub(crate) fn set_filter(
        &mut self,
        dim: usize,
        keys: &[FacetKey],
        spec: Option<FilterSpec>,
    ) -> Vec<MaskFlip> {
        let bit = 1u32 << dim;
        let mut flips = Vec::new();
        for (index, key) in keys.iter().enumerate() {
            let fails = match &spec {
                Some(spec) => !spec.matches(key),
                None => false,
            };
            let before = self.masks[index];
            let after = if fails { before | bit } else { before & !bit };
            if after != before {
                self.masks[index] = after;
                flips.push(MaskFlip {
                    index,
                    before,
                    after,
                });
            }
        }
        self.active[dim] = spec;
        flips
    }

    /// Visibility under every active filter.
    pub(crate) fn is_visible(&self, index: usize) -> bool {
        self.masks[index] == 0
    }

    /// Visibility with the given dimension bits ignored (the
    /// cross-filter self-exclusion rule: a group passes its own
    /// dimension's bit here).
    pub(crate) fn is_visible_excluding(&self, index: usize, excluded: DimensionMask) -> bool {
        self.masks[index] & !excluded == 0
    }
}
