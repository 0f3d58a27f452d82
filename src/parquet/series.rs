//! Save an aggregated series table to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::{anyhow, Result};
use arrow::{
    array::{ArrayRef, Date32Array, Float64Array, Int32Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use chrono::{Datelike, NaiveDate};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::{
    aggregate::{AggregatedTable, Granularity, TimeKey},
    export::INDEX_COLUMN,
};

/// Writes `Dates` (Date32 for daily/monthly, Int32 for annual and
/// month-of-year keys) followed by one nullable Float64 column per dataset.
pub fn save_series(table: &AggregatedTable, granularity: Granularity, file_path: &Path) -> Result<()> {
    let index_type = match granularity {
        Granularity::Daily | Granularity::Monthly => DataType::Date32,
        Granularity::Annual | Granularity::MeanMonthly => DataType::Int32,
    };

    let mut fields = vec![Field::new(INDEX_COLUMN, index_type.clone(), false)];
    fields.extend(
        table
            .columns()
            .iter()
            .map(|name| Field::new(name.as_str(), DataType::Float64, true)),
    );
    let schema = Arc::new(Schema::new(fields));

    let index: ArrayRef = match index_type {
        DataType::Date32 => Arc::new(Date32Array::from(
            table.index().map(date32).collect::<Result<Vec<_>>>()?,
        )),
        _ => Arc::new(Int32Array::from(
            table.index().map(int_key).collect::<Result<Vec<_>>>()?,
        )),
    };

    let mut columns = vec![index];
    for name in table.columns() {
        let values: Vec<Option<f64>> = table.index().map(|key| table.value(key, name)).collect();
        columns.push(Arc::new(Float64Array::from(values)));
    }

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let file = File::create(file_path)?;
    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
    let batch = RecordBatch::try_new(schema, columns)?;

    writer.write(&batch)?;
    writer.close()?;

    Ok(())
}

// Days since the unix epoch
fn date32(key: TimeKey) -> Result<i32> {
    let epoch_offset = NaiveDate::default().num_days_from_ce();
    match key {
        TimeKey::Date(date) => Ok(date.num_days_from_ce() - epoch_offset),
        other => Err(anyhow!("expected a date key, found `{}`", other)),
    }
}

fn int_key(key: TimeKey) -> Result<i32> {
    match key {
        TimeKey::Year(year) => Ok(year),
        TimeKey::Month(month) => Ok(month as i32),
        other => Err(anyhow!("expected a year or month key, found `{}`", other)),
    }
}

// -- Tests -------------------------------------------------------------------
