//! Save a land cover report to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Float64Array, Int32Array, Int64Array, StringArray},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::land_cover::{LandCoverReport, REPORT_COLUMNS};

pub fn save_land_cover(report: &LandCoverReport, file_path: &Path) -> Result<()> {
    let num_rows = report.rows.len();

    let mut years = Vec::with_capacity(num_rows);
    let mut ids = Vec::with_capacity(num_rows);
    let mut percentages = Vec::with_capacity(num_rows);
    let mut descriptions = Vec::with_capacity(num_rows);

    for r in &report.rows {
        years.push(r.year);
        ids.push(r.class_id);
        percentages.push(r.percentage);
        descriptions.push(r.description.as_str());
    }

    let [year, id, percentage, description] = REPORT_COLUMNS;
    let columns: Vec<(&str, ArrayRef)> = vec![
        (year, Arc::new(Int32Array::from(years))),
        (id, Arc::new(Int64Array::from(ids))),
        (percentage, Arc::new(Float64Array::from(percentages))),
        (description, Arc::new(StringArray::from(descriptions))),
    ];
    let batch = RecordBatch::try_from_iter(columns)?;

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let file = File::create(file_path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;

    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

// -- Tests -------------------------------------------------------------------
