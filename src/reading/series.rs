//! Raw per-region time series.

use arrow::{
    array::{Array, AsArray},
    datatypes::{DataType, Date32Type, Float64Type},
};

use super::{cast_column, column_as, other_columns, read_batches};
use crate::{
    aggregate::RawSeries,
    error::{EngineError, Result},
};

pub const DATES_COLUMN: &str = "Dates";

/// Decodes a `Dates` + single value column payload. Null values are skipped.
pub fn decode_series(bytes: &[u8], source: &str) -> Result<RawSeries> {
    let mut points = Vec::new();

    for batch in read_batches(bytes, source)? {
        let value_columns = other_columns(&batch, &[DATES_COLUMN]);
        let [value_name] = value_columns.as_slice() else {
            return Err(EngineError::fetch(
                source,
                format!("expected one value column, found {:?}", value_columns),
            ));
        };

        let dates = column_as(&batch, DATES_COLUMN, &DataType::Date32, source)?;
        let dates = dates.as_primitive::<Date32Type>();
        let values = batch
            .column_by_name(value_name)
            .ok_or_else(|| EngineError::fetch(source, format!("missing column `{}`", value_name)))?;
        let values = cast_column(values, value_name, &DataType::Float64, source)?;
        let values = values.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            if dates.is_null(i) || values.is_null(i) || values.value(i).is_nan() {
                continue;
            }
            let date = dates
                .value_as_date(i)
                .ok_or_else(|| EngineError::fetch(source, format!("invalid date at row {}", i)))?;
            points.push((date, values.value(i)));
        }
    }

    RawSeries::new(points).map_err(|e| EngineError::fetch(source, e))
}

// -- Tests -------------------------------------------------------------------
