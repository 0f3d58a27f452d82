//! Remote-sensing derived series and land cover statistics for aquifers.
//!
//! A request flows through three stages: the [`catalog`] resolves a
//! (variable, dataset) selection to its metadata, the [`aggregate`] engine
//! resamples raw per-region series to the reporting granularity and joins
//! several datasets into one table, and the [`land_cover`] compositor turns
//! per-year class breakdowns into a labelled report. [`engine::Engine`] wires
//! the stages to an [`store::ObjectStore`] and memoizes results.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod land_cover;
pub mod parquet;
pub mod reading;
pub mod store;

pub use error::{EngineError, Result};
