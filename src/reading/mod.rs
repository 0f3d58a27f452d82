//! Decoding of fetched payloads into typed records.
//!
//! Series, land use tables and map layers are stored as Arrow IPC files
//! (feather v2, possibly LZ4/ZSTD compressed). Anything that cannot be
//! decoded into the expected shape is reported as a fetch error against
//! the key it came from.

pub mod land_use;
pub mod layer;
pub mod series;

use std::io::Cursor;

use arrow::{
    array::{Array, ArrayRef},
    compute::cast,
    datatypes::DataType,
    ipc::reader::FileReader,
    record_batch::RecordBatch,
};

pub use land_use::decode_land_use;
pub use layer::{decode_land_use_layer, decode_series_layer, MapLayer};
pub use series::decode_series;

use crate::error::{EngineError, Result};

/// Reads every record batch of an IPC file.
pub(crate) fn read_batches(bytes: &[u8], source: &str) -> Result<Vec<RecordBatch>> {
    let reader = FileReader::try_new(Cursor::new(bytes), None)
        .map_err(|e| EngineError::fetch(source, e))?;

    reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| EngineError::fetch(source, e))
}

/// Column `name` of `batch` cast to `data_type`.
pub(crate) fn column_as(
    batch: &RecordBatch,
    name: &str,
    data_type: &DataType,
    source: &str,
) -> Result<ArrayRef> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| EngineError::fetch(source, format!("missing column `{}`", name)))?;

    cast_column(column, name, data_type, source)
}

pub(crate) fn cast_column(
    column: &ArrayRef,
    name: &str,
    data_type: &DataType,
    source: &str,
) -> Result<ArrayRef> {
    cast(column.as_ref(), data_type).map_err(|e| {
        EngineError::fetch(
            source,
            format!("column `{}` of type {}: {}", name, column.data_type(), e),
        )
    })
}

/// Names of the columns of `batch` other than `excluded`.
pub(crate) fn other_columns(batch: &RecordBatch, excluded: &[&str]) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .filter(|name| !excluded.contains(&name.as_str()))
        .collect()
}

// -- Tests -------------------------------------------------------------------
