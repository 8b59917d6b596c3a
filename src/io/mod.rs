//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - exports: JSON report, chart series CSVs, record CSVs (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
