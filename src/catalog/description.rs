//! Free-form table describing the databases on offer.

use std::io::Read;

use tracing::info;

use super::DATASET_DESCRIPTIONS_TABLE;
use crate::{
    error::{EngineError, Result},
    store::{ObjectKey, ObjectStore},
};

/// Rows of `Datasets_Description.csv`, with its columns kept as published.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetDescriptions {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DatasetDescriptions {
    /// Parses the `;`-delimited table.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| EngineError::fetch(DATASET_DESCRIPTIONS_TABLE, e))?
            .iter()
            .map(str::to_string)
            .collect();
        let rows = reader
            .records()
            .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()
            .map_err(|e| EngineError::fetch(DATASET_DESCRIPTIONS_TABLE, e))?;

        info!(rows = rows.len(), "Dataset descriptions loaded");

        Ok(DatasetDescriptions { headers, rows })
    }

    pub async fn fetch<S: ObjectStore>(store: &S) -> Result<Self> {
        let bytes = store
            .fetch(&ObjectKey::Table(DATASET_DESCRIPTIONS_TABLE.to_string()))
            .await?;

        DatasetDescriptions::from_reader(bytes.as_slice())
    }
}

// -- Tests -------------------------------------------------------------------
