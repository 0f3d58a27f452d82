//! Download-oriented encodings of output tables.

use std::{fs, path::Path};

use anyhow::{anyhow, Result};
use clap::ValueEnum;

use crate::{
    aggregate::{AggregatedTable, Granularity},
    land_cover::{LandCoverReport, REPORT_COLUMNS},
    parquet,
};

pub const INDEX_COLUMN: &str = "Dates";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    #[default]
    Csv,
    Parquet,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Parquet => "parquet",
        }
    }
}

/// `{region}_{variable}_{granularity}.{ext}`
pub fn series_file_name(region: &str, variable_label: &str, granularity: Granularity, format: Format) -> String {
    format!(
        "{}_{}_{}.{}",
        region,
        variable_label,
        granularity.label(),
        format.extension()
    )
}

/// `CoverturaSuelo_{region}_{dataset}.{ext}`
pub fn land_cover_file_name(region: &str, dataset: &str, format: Format) -> String {
    format!("CoverturaSuelo_{}_{}.{}", region, dataset, format.extension())
}

/// CSV with a `Dates` index column and one column per dataset; missing cells are empty.
///
/// A table without columns is a single quoted empty field, `""`.
pub fn series_to_csv(table: &AggregatedTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    if table.num_columns() == 0 {
        writer.write_record([""])?;
    } else {
        let mut header = vec![INDEX_COLUMN.to_string()];
        header.extend(table.columns().iter().cloned());
        writer.write_record(&header)?;
    }

    for (key, cells) in table.rows() {
        let mut record = vec![key.to_string()];
        record.extend(cells.iter().map(|cell| cell.map(format_value).unwrap_or_default()));
        writer.write_record(&record)?;
    }

    writer.into_inner().map_err(|e| anyhow!("flushing csv: {}", e))
}

pub fn land_cover_to_csv(report: &LandCoverReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS)?;

    for row in &report.rows {
        writer.write_record([
            row.year.to_string(),
            row.class_id.to_string(),
            format_value(row.percentage),
            row.description.clone(),
        ])?;
    }

    writer.into_inner().map_err(|e| anyhow!("flushing csv: {}", e))
}

pub fn save_series(table: &AggregatedTable, granularity: Granularity, file_path: &Path, format: Format) -> Result<()> {
    match format {
        Format::Csv => fs::write(file_path, series_to_csv(table)?)?,
        Format::Parquet => parquet::save_series(table, granularity, file_path)?,
    }

    Ok(())
}

pub fn save_land_cover(report: &LandCoverReport, file_path: &Path, format: Format) -> Result<()> {
    match format {
        Format::Csv => fs::write(file_path, land_cover_to_csv(report)?)?,
        Format::Parquet => parquet::save_land_cover(report, file_path)?,
    }

    Ok(())
}

// Whole numbers keep one decimal so columns read back as floats
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

// -- Tests -------------------------------------------------------------------
