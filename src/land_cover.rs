//! Land cover composition: keeps dominant classes, groups the rest as "Other".

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    catalog::LabelTable,
    error::{EngineError, Result},
};

/// Class id of the synthetic row grouping below-threshold classes.
pub const OTHER_CLASS_ID: i64 = -1;
pub const OTHER_DESCRIPTION: &str = "Other";

/// Public column names of a report, in order.
pub const REPORT_COLUMNS: [&str; 4] = ["Year", "ID", "Percentage", "Description"];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandCoverRow {
    pub class_id: i64,
    pub year: i32,
    pub percentage: f64,
}

/// Per-year class breakdown of one region. Percentages of a year need not sum to 100.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandCoverRawTable {
    pub region: String,
    pub rows: Vec<LandCoverRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LandCoverReportRow {
    pub year: i32,
    pub class_id: i64,
    pub percentage: f64,
    pub description: String,
}

impl LandCoverReportRow {
    pub fn is_other(&self) -> bool {
        self.class_id == OTHER_CLASS_ID
    }
}

/// Long-format table sorted by (year, class id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandCoverReport {
    pub region: String,
    pub rows: Vec<LandCoverReportRow>,
}

impl LandCoverReport {
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().map(|r| r.year).collect();
        years.dedup();
        years
    }
}

/// Thresholds are percentages in `[0, 100]`.
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&threshold) {
        return Err(EngineError::InvalidArgument(format!(
            "threshold {} outside [0, 100]",
            threshold
        )));
    }

    Ok(())
}

/// Splits classes at `threshold` and labels the kept ones.
///
/// Classes with `percentage >= threshold` are kept individually and must
/// have a label. The rest are summed per year into one "Other" row; a year
/// whose grouped sum is zero gets no "Other" row.
pub fn compose(raw: &LandCoverRawTable, labels: &LabelTable, threshold: f64) -> Result<LandCoverReport> {
    validate_threshold(threshold)?;

    let (kept, grouped): (Vec<&LandCoverRow>, Vec<&LandCoverRow>) =
        raw.rows.iter().partition(|row| row.percentage >= threshold);

    let mut rows = Vec::with_capacity(kept.len());
    for row in &kept {
        let description = labels.description(row.class_id).ok_or_else(|| {
            EngineError::NotFound(format!("land cover class {}", row.class_id))
        })?;
        rows.push(LandCoverReportRow {
            year: row.year,
            class_id: row.class_id,
            percentage: row.percentage,
            description: description.to_string(),
        });
    }

    let mut other: BTreeMap<i32, f64> = BTreeMap::new();
    for row in &grouped {
        *other.entry(row.year).or_default() += row.percentage;
    }
    rows.extend(
        other
            .into_iter()
            .filter(|(_, percentage)| *percentage > 0.0)
            .map(|(year, percentage)| LandCoverReportRow {
                year,
                class_id: OTHER_CLASS_ID,
                percentage,
                description: OTHER_DESCRIPTION.to_string(),
            }),
    );

    rows.sort_by(|a, b| (a.year, a.class_id).cmp(&(b.year, b.class_id)));

    debug!(
        region = %raw.region,
        threshold,
        kept = kept.len(),
        grouped = grouped.len(),
        rows = rows.len(),
        "Composed land cover"
    );

    Ok(LandCoverReport {
        region: raw.region.clone(),
        rows,
    })
}

// -- Tests -------------------------------------------------------------------
