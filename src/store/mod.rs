//! Fetch-by-key access to the remote object store.

pub mod http;
pub mod local;

use std::{fmt, future::Future};

pub use http::HttpStore;
pub use local::LocalStore;

use crate::error::Result;

/// Address of one object in the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKey {
    /// Raw per-region series of one dataset variable.
    TimeSeries {
        dataset: String,
        variable: String,
        region: String,
    },
    /// Per-region, per-year land cover breakdown.
    LandUse { dataset: String, region: String },
    /// Region -> value layer for the map of a time series variable.
    SeriesLayer { label: String, dataset: String },
    /// Class x region layer for the land cover map.
    LandUseLayer { dataset: String },
    /// Reference table at the root of the store, e.g. `Datasets.csv`.
    Table(String),
}

impl ObjectKey {
    /// Relative path of the object, with special characters escaped.
    pub fn path(&self) -> String {
        let raw = match self {
            ObjectKey::TimeSeries {
                dataset,
                variable,
                region,
            } => format!("timeseries/{}_{}/{}", dataset, variable, region),
            ObjectKey::LandUse { dataset, region } => format!("land_use/{}/{}", dataset, region),
            ObjectKey::SeriesLayer { label, dataset } => {
                format!("layers_series/{}/{}", label, dataset)
            }
            ObjectKey::LandUseLayer { dataset } => format!("layers_landuse/{}", dataset),
            ObjectKey::Table(name) => name.clone(),
        };

        escape(&raw)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Percent-escapes the characters that appear in dataset and variable names.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            ' ' => out.push_str("%20"),
            '(' => out.push_str("%28"),
            ')' => out.push_str("%29"),
            _ => out.push(c),
        }
    }

    out
}

/// A blocking-per-request source of raw payloads.
///
/// Implementations do not retry and impose no timeout.
pub trait ObjectStore: Send + Sync {
    fn fetch(&self, key: &ObjectKey) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

// -- Tests -------------------------------------------------------------------
