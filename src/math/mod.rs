//! Numeric utilities: order-independent descriptive statistics, Pearson
//! correlation, Welch's t-test and the special functions behind it.

pub mod describe;
pub mod special;

pub use describe::*;
pub use special::*;
