//! Read-only catalog of dataset metadata and land cover labels.
//!
//! Loaded once per process and shared behind an `Arc`; nothing mutates it
//! after [`Catalog::from_readers`] or [`Catalog::fetch`] returns.

pub mod description;
pub mod descriptor;
pub mod labels;

use std::io::Read;

use serde::de::DeserializeOwned;
use tracing::info;

pub use description::DatasetDescriptions;
pub use descriptor::{AggKind, DatasetDescriptor, Timestep};
pub use labels::{LabelTable, LandCoverLabel};

use crate::{
    aggregate::Granularity,
    error::{EngineError, Result},
    store::{ObjectKey, ObjectStore},
};
use descriptor::DatasetRecord;
use labels::LandCoverDatasetRecord;

pub const DATASETS_TABLE: &str = "Datasets.csv";
pub const LAND_COVER_DATASETS_TABLE: &str = "LandCover_Datasets.csv";
pub const LAND_COVER_LABELS_TABLE: &str = "LandCover_Labels.csv";
pub const DATASET_DESCRIPTIONS_TABLE: &str = "Datasets_Description.csv";

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    descriptors: Vec<DatasetDescriptor>,
    land_cover_datasets: Vec<String>,
    land_cover_labels: Vec<LandCoverLabel>,
}

impl Catalog {
    /// Builds the catalog from the three reference tables.
    pub fn from_readers<A: Read, B: Read, C: Read>(
        datasets: A,
        land_cover_datasets: B,
        land_cover_labels: C,
    ) -> Result<Self> {
        let descriptors = read_table::<DatasetRecord, _>(datasets, DATASETS_TABLE)?
            .into_iter()
            .map(|record| record.into_descriptor(DATASETS_TABLE))
            .collect::<Result<Vec<_>>>()?;
        let land_cover_datasets =
            read_table::<LandCoverDatasetRecord, _>(land_cover_datasets, LAND_COVER_DATASETS_TABLE)?
                .into_iter()
                .map(|record| record.dataset)
                .collect();
        let land_cover_labels =
            read_table::<LandCoverLabel, _>(land_cover_labels, LAND_COVER_LABELS_TABLE)?;

        let catalog = Catalog {
            descriptors,
            land_cover_datasets,
            land_cover_labels,
        };
        info!(
            datasets = catalog.descriptors.len(),
            land_cover_datasets = catalog.land_cover_datasets.len(),
            land_cover_labels = catalog.land_cover_labels.len(),
            "Catalog loaded"
        );

        Ok(catalog)
    }

    /// Fetches the reference tables from the store and builds the catalog.
    pub async fn fetch<S: ObjectStore>(store: &S) -> Result<Self> {
        let datasets = store.fetch(&ObjectKey::Table(DATASETS_TABLE.to_string())).await?;
        let lc_datasets = store
            .fetch(&ObjectKey::Table(LAND_COVER_DATASETS_TABLE.to_string()))
            .await?;
        let lc_labels = store
            .fetch(&ObjectKey::Table(LAND_COVER_LABELS_TABLE.to_string()))
            .await?;

        Catalog::from_readers(datasets.as_slice(), lc_datasets.as_slice(), lc_labels.as_slice())
    }

    /// Unique variable labels in first-seen order.
    pub fn variable_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();
        for d in &self.descriptors {
            if !labels.contains(&d.variable_label) {
                labels.push(d.variable_label.clone());
            }
        }

        labels
    }

    /// Datasets offering `variable_label` at the requested granularity.
    ///
    /// Monthly-native datasets cannot be disaggregated, so they are left out
    /// of the daily list. No match yields an empty list.
    pub fn list_datasets(&self, variable_label: &str, granularity: Granularity) -> Vec<String> {
        self.descriptors
            .iter()
            .filter(|d| d.variable_label == variable_label)
            .filter(|d| granularity != Granularity::Daily || d.native_timestep == Timestep::Daily)
            .map(|d| d.dataset_name.clone())
            .collect()
    }

    /// Exact-match lookup on (dataset, label). With duplicate keys the first row wins.
    pub fn describe(&self, dataset_name: &str, variable_label: &str) -> Result<&DatasetDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.dataset_name == dataset_name && d.variable_label == variable_label)
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "dataset `{}` for variable `{}`",
                    dataset_name, variable_label
                ))
            })
    }

    pub fn land_cover_datasets(&self) -> &[String] {
        &self.land_cover_datasets
    }

    /// Label table of one land cover dataset; empty if the dataset has no labels.
    pub fn land_cover_labels(&self, dataset: &str) -> LabelTable {
        LabelTable::from_labels(self.land_cover_labels.iter().filter(|l| l.dataset == dataset))
    }

    pub fn class_by_description(&self, dataset: &str, description: &str) -> Result<i64> {
        self.land_cover_labels(dataset)
            .class_by_description(description)
            .ok_or_else(|| {
                EngineError::NotFound(format!(
                    "land cover class `{}` in dataset `{}`",
                    description, dataset
                ))
            })
    }
}

fn read_table<T: DeserializeOwned, R: Read>(reader: R, source: &str) -> Result<Vec<T>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()
        .map_err(|e| EngineError::fetch(source, e))
}

// -- Tests -------------------------------------------------------------------
