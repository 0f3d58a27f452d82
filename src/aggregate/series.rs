use chrono::NaiveDate;

use super::TimeKey;
use crate::error::{EngineError, Result};

/// Native-resolution series of one (region, dataset) pair.
///
/// Dates are strictly increasing. Missing days are simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl RawSeries {
    pub fn new(points: Vec<(NaiveDate, f64)>) -> Result<Self> {
        if let Some(pair) = points.windows(2).find(|pair| pair[0].0 >= pair[1].0) {
            return Err(EngineError::InvalidArgument(format!(
                "series dates must be strictly increasing, found {} then {}",
                pair[0].0, pair[1].0
            )));
        }

        Ok(RawSeries { points })
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Series at reporting granularity, ordered by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub points: Vec<(TimeKey, f64)>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// -- Tests -------------------------------------------------------------------
