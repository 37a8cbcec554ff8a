#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Capacity limits and demo defaults.
pub mod constants;
/// Experiment score record type.
pub mod data;
/// Dimension handles and filter specifications.
pub mod dimension;
/// Chart-feed demo runner and the bundled sample dataset.
pub mod example_apps;
mod filter;
/// Group handles, reducers, and ordered bin output.
pub mod group;
/// Share/balance summaries over group output.
pub mod metrics;
/// The session owning store, dimensions, filters, and groups.
pub mod session;
/// Immutable record storage and schema-check policies.
pub mod store;
/// Shared type aliases.
pub mod types;

mod errors;

pub use data::RunRecord;
pub use dimension::{DimensionId, FilterSpec};
pub use errors::FacetError;
pub use group::{GroupEntry, GroupId, Reducer};
pub use metrics::{BinShare, BinShares, bin_shares};
pub use session::Session;
pub use store::{RecordStore, SchemaPolicy};
pub use types::{ClassifierTag, DecoderTag, DimensionName, FacetKey, RevisionTag};
