//! The report engine: pure aggregate functions over a record slice.
//!
//! Every operation:
//! - takes `&[ExplosionRecord]` and never mutates it
//! - is independent of input order (ties are broken explicitly)
//! - returns `Err(Unavailable)` instead of fabricating a number
//!
//! `report::build_report` composes these into the named report sections.

pub mod category;
pub mod country;
pub mod inference;
pub mod overall;
pub mod quality;
pub mod ranking;
pub mod temporal;

pub use category::*;
pub use country::*;
pub use inference::*;
pub use overall::*;
pub use quality::*;
pub use ranking::*;
pub use temporal::*;

use crate::domain::{ExplosionRecord, Unavailable};

pub(crate) fn require_records(records: &[ExplosionRecord]) -> Result<(), Unavailable> {
    if records.is_empty() {
        Err(Unavailable::EmptyInput)
    } else {
        Ok(())
    }
}

pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 * 100.0 / total as f64
}
