//! `nuclear-report` library crate.
//!
//! Descriptive statistics and reporting over historical nuclear test records.
//! The binary (`nreport`) is a thin wrapper around this library so that:
//!
//! - every statistic is testable without spawning processes
//! - the engine can be driven from other front-ends (notebooks, services)
//!
//! Data flows one way: `io`/`data` produce `ExplosionRecord`s, `engine`
//! computes aggregates, `report` assembles and formats them, `plot` draws.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
