//! # voc-core
//!
//! Lineage tracking and change detection for PASCAL-VOC datasets.
//!
//! Every derived dataset carries a sidecar recording the sources it was
//! built from and the parameters of the tool that built it. From those a
//! composite fingerprint is computed; a tool about to rebuild a dataset
//! compares the fingerprint of what it would build with the persisted one
//! and skips the work when they match.
//!
//! - [`hash`]: streaming SHA-256 of files and strings
//! - [`params`]: typed build parameters and their canonical rendering
//! - [`source`]: one upstream input, possibly with nested provenance
//! - [`record`]: sources plus params, with a cached fingerprint
//! - [`oracle`]: up-to-date decisions
//! - [`store`]: JSON sidecar persistence and schema
//! - [`incremental`]: check-then-finish guard for dataset builders
//! - [`scan`]: annotation discovery in dataset directories

pub mod errors;
pub mod hash;
pub mod incremental;
pub mod oracle;
pub mod params;
pub mod record;
pub mod scan;
pub mod settings;
pub mod source;
pub mod store;

pub use errors::LineageError;
pub use incremental::{Check, IncrementalBuild};
pub use oracle::{Freshness, assess, compare, is_up_to_date};
pub use params::{ParamValue, Params};
pub use record::{Fingerprint, LineageRecord};
pub use settings::LineageSettings;
pub use source::LineageSource;
pub use store::{LineageDocument, Sidecar, dump, lineage_schema, load};
