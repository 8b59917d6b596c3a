//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the typed input row (`ExplosionRecord`) and its category enums
//! - the aggregate entities the engine produces (`CountryStats`, `TemporalBucket`, ...)
//! - "not available" results (`Unavailable`, `Section`)
//! - run configuration (`ReportConfig`)

pub mod config;
pub mod outcome;
pub mod stats;
pub mod types;

pub use config::*;
pub use outcome::*;
pub use stats::*;
pub use types::*;
