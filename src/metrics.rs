use crate::group::GroupEntry;
use crate::types::FacetKey;

/// Aggregate share metrics over a group's bin values.
#[derive(Clone, Debug, PartialEq)]
pub struct BinShares {
    pub total: f64,
    pub bins: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub max_share: f64,
    pub min_share: f64,
    pub ratio: f64,
    pub per_bin: Vec<BinShare>,
}

/// Per-bin share of a group's total for balance inspection.
#[derive(Clone, Debug, PartialEq)]
pub struct BinShare {
    pub key: FacetKey,
    pub value: f64,
    pub share: f64,
}

/// Compute share metrics from a group's ordered totals.
/// `per_bin` is sorted by value descending, then key.
pub fn bin_shares(entries: &[GroupEntry]) -> Option<BinShares> {
    if entries.is_empty() {
        return None;
    }
    let total: f64 = entries.iter().map(|entry| entry.value).sum();
    let bins = entries.len();
    let min = entries.iter().map(|e| e.value).fold(f64::INFINITY, f64::min);
    let max = entries
        .iter()
        .map(|e| e.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let mean = total / bins as f64;
    let max_share = if total == 0.0 { 0.0 } else { max / total };
    let min_share = if total == 0.0 { 0.0 } else { min / total };
    let ratio = if min == 0.0 { f64::INFINITY } else { max / min };
    let mut per_bin: Vec<BinShare> = entries
        .iter()
        .map(|entry| BinShare {
            key: entry.key.clone(),
            value: entry.value,
            share: if total == 0.0 {
                0.0
            } else {
                entry.value / total
            },
        })
        .collect();
    per_bin.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    Some(BinShares {
        total,
        bins,
        min,
        max,
        mean,
        max_share,
        min_share,
        ratio,
        per_bin,
    })
}
