//! Temporal aggregation of raw per-region series.
//!
//! Raw series arrive at their dataset's native resolution and are coarsened
//! to the reporting granularity with explicit calendar buckets:
//!
//! * `Monthly`: daily points are bucketed by calendar month and stamped on
//!   the first day of that month. Monthly-native series pass through.
//! * `Annual`: points are bucketed by calendar year, whatever the native
//!   resolution.
//! * `MeanMonthly`: daily series are first collapsed to months, then every
//!   month-of-year is averaged across years, giving keys `1..=12`.
//! * `Daily`: pass through.
//!
//! Buckets sum or average according to the dataset's [`AggKind`], and only
//! periods holding at least one observation produce a point.
//!
//! [`AggKind`]: crate::catalog::AggKind

pub mod resample;
pub mod series;
pub mod table;

use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;

pub use resample::aggregate;
pub use series::{RawSeries, Series};
pub use table::AggregatedTable;

/// Decimal places kept in aggregated tables.
pub const TABLE_DECIMALS: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
/// Reporting granularity requested by the caller.
pub enum Granularity {
    Daily,
    Monthly,
    MeanMonthly,
    Annual,
}

impl Granularity {
    /// Label in the catalog vocabulary, used in export file names.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::Daily => "Diaria",
            Granularity::Monthly => "Mensual",
            Granularity::MeanMonthly => "Media Mensual",
            Granularity::Annual => "Anual",
        }
    }

}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Index of an aggregated point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeKey {
    /// Daily points, and monthly points stamped on the first of the month.
    Date(NaiveDate),
    /// Calendar year.
    Year(i32),
    /// Month of year, 1 to 12.
    Month(u32),
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeKey::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            TimeKey::Year(year) => write!(f, "{}", year),
            TimeKey::Month(month) => write!(f, "{}", month),
        }
    }
}

/// Rounds to `decimals` places, ties to even.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

// -- Tests -------------------------------------------------------------------
