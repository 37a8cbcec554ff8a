/// Key emitted by a dimension's key function and used for group bins.
/// Examples: `r1`, `maxent`, `mst`
pub type FacetKey = String;
/// Human-readable dimension name used in errors and filter logs.
/// Examples: `revision`, `classifier`, `decoder`
pub type DimensionName = String;
/// Revision tag identifying one experiment run.
/// Examples: `r1`, `r2`, `r3`
pub type RevisionTag = String;
/// Classifier name attached to a scored run.
/// Examples: `bayes`, `maxent`
pub type ClassifierTag = String;
/// Decoder name attached to a scored run.
/// Examples: `last`, `local`, `locallyGreedy`, `mst`
pub type DecoderTag = String;
