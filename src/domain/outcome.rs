//! "Not available" results.
//!
//! Every aggregate operation returns `Result<T, Unavailable>`. The report keeps
//! those results as `Section<T>` so an undefined statistic is visible as such
//! in text and JSON output instead of showing up as `0` or `NaN`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Unavailable {
    #[error("no records")]
    EmptyInput,
    #[error("no records carry yield data")]
    NoYieldData,
    #[error("insufficient data: need at least {needed} records, found {found}")]
    TooFewRecords { needed: usize, found: usize },
    #[error("undefined: values have zero variance")]
    ZeroVariance,
}

/// A report entry that is either computed or explicitly not available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Available { value: T },
    NotAvailable { reason: Unavailable },
}

impl<T> Section<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Section::Available { value } => Some(value),
            Section::NotAvailable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<Unavailable> {
        match self {
            Section::Available { .. } => None,
            Section::NotAvailable { reason } => Some(*reason),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Section::Available { .. })
    }
}

impl<T> From<Result<T, Unavailable>> for Section<T> {
    fn from(result: Result<T, Unavailable>) -> Self {
        match result {
            Ok(value) => Section::Available { value },
            Err(reason) => Section::NotAvailable { reason },
        }
    }
}
