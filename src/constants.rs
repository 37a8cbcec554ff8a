/// Constants governing session capacity and mask layout.
pub mod session {
    /// Maximum dimensions per session; each dimension owns one bit in
    /// the per-record visibility masks.
    pub const MAX_DIMENSIONS: usize = 32;
}

/// Constants used by the chart-feed demo runner.
pub mod demo {
    /// Revision selected for the faceted bar feeds when none is given.
    pub const DEFAULT_REVISION: &str = "r1";
    /// Classifier pinned for the revision trend series by default.
    pub const DEFAULT_CLASSIFIER: &str = "maxent";
    /// Decoder pinned for the revision trend series by default.
    pub const DEFAULT_DECODER: &str = "mst";
}
