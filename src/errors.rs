use thiserror::Error;

/// Error type for session configuration and record intake failures.
///
/// Empty results are not errors: a group over zero visible records
/// yields an empty mapping from [`crate::Session::totals`].
#[derive(Debug, Error)]
pub enum FacetError {
    #[error("record {index} failed schema check: {details}")]
    Schema { index: usize, details: String },
    #[error("configuration error: {0}")]
    Config(String),
}
