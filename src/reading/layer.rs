//! Region -> value layers consumed by the map renderer.

use std::collections::BTreeMap;

use arrow::{
    array::{Array, AsArray},
    datatypes::{DataType, Float64Type, Int64Type},
};

use super::{cast_column, column_as, other_columns, read_batches};
use crate::{
    aggregate::round_to,
    error::{EngineError, Result},
};

pub const REGION_COLUMN: &str = "ID";

/// Decimal places kept in map layers.
pub const LAYER_DECIMALS: i32 = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapLayer {
    /// Legend title, e.g. `Pr (mm)`.
    pub title: String,
    pub values: BTreeMap<String, f64>,
}

/// Decodes an `ID` + single value column layer, rounding values.
pub fn decode_series_layer(bytes: &[u8], title: &str, source: &str) -> Result<MapLayer> {
    let mut values = BTreeMap::new();

    for batch in read_batches(bytes, source)? {
        let value_columns = other_columns(&batch, &[REGION_COLUMN]);
        let [value_name] = value_columns.as_slice() else {
            return Err(EngineError::fetch(
                source,
                format!("expected one value column, found {:?}", value_columns),
            ));
        };

        let regions = column_as(&batch, REGION_COLUMN, &DataType::Int64, source)?;
        let regions = regions.as_primitive::<Int64Type>();
        let column = batch
            .column_by_name(value_name)
            .ok_or_else(|| EngineError::fetch(source, format!("missing column `{}`", value_name)))?;
        let column = cast_column(column, value_name, &DataType::Float64, source)?;
        let column = column.as_primitive::<Float64Type>();

        for i in 0..batch.num_rows() {
            if regions.is_null(i) || column.is_null(i) {
                continue;
            }
            values.insert(
                regions.value(i).to_string(),
                round_to(column.value(i), LAYER_DECIMALS),
            );
        }
    }

    Ok(MapLayer {
        title: title.to_string(),
        values,
    })
}

/// Decodes the row of `class_id` from a class x region land use layer.
///
/// An absent class yields 0.0 for every region of the layer.
pub fn decode_land_use_layer(
    bytes: &[u8],
    class_id: i64,
    title: &str,
    source: &str,
) -> Result<MapLayer> {
    let mut values = BTreeMap::new();
    let mut regions = Vec::new();
    let mut found = false;

    for batch in read_batches(bytes, source)? {
        let classes = column_as(&batch, REGION_COLUMN, &DataType::Int64, source)?;
        let classes = classes.as_primitive::<Int64Type>();
        if regions.is_empty() {
            regions = other_columns(&batch, &[REGION_COLUMN]);
        }
        let Some(row) = (0..batch.num_rows()).find(|i| !classes.is_null(*i) && classes.value(*i) == class_id)
        else {
            continue;
        };
        found = true;

        for region in other_columns(&batch, &[REGION_COLUMN]) {
            let column = column_as(&batch, &region, &DataType::Float64, source)?;
            let column = column.as_primitive::<Float64Type>();
            if !column.is_null(row) {
                values.insert(region.trim().to_string(), column.value(row));
            }
        }
    }

    if !found {
        values = regions
            .iter()
            .map(|region| (region.trim().to_string(), 0.0))
            .collect();
    }

    Ok(MapLayer {
        title: title.to_string(),
        values,
    })
}

// -- Tests -------------------------------------------------------------------
