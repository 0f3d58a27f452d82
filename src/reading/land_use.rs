//! Per-region land cover tables.

use arrow::{
    array::{Array, AsArray},
    datatypes::{DataType, Float64Type, Int32Type, Int64Type},
};

use super::{column_as, read_batches};
use crate::{
    error::Result,
    land_cover::{LandCoverRawTable, LandCoverRow},
};

pub const CLASS_COLUMN: &str = "ID";
pub const YEAR_COLUMN: &str = "Year";

/// Decodes the `ID`, `Year` and `<region>` columns of a land use payload.
///
/// Rows with a null class, year or percentage are dropped, as are NaN percentages.
pub fn decode_land_use(bytes: &[u8], region: &str, source: &str) -> Result<LandCoverRawTable> {
    let mut rows = Vec::new();

    for batch in read_batches(bytes, source)? {
        let classes = column_as(&batch, CLASS_COLUMN, &DataType::Int64, source)?;
        let classes = classes.as_primitive::<Int64Type>();
        let years = column_as(&batch, YEAR_COLUMN, &DataType::Int32, source)?;
        let years = years.as_primitive::<Int32Type>();
        let percentages = column_as(&batch, region, &DataType::Float64, source)?;
        let percentages = percentages.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            if classes.is_null(i) || years.is_null(i) || percentages.is_null(i) {
                continue;
            }
            if percentages.value(i).is_nan() {
                continue;
            }
            rows.push(LandCoverRow {
                class_id: classes.value(i),
                year: years.value(i),
                percentage: percentages.value(i),
            });
        }
    }

    Ok(LandCoverRawTable {
        region: region.to_string(),
        rows,
    })
}

// -- Tests -------------------------------------------------------------------
