//! Land cover class labels per dataset.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LandCoverLabel {
    #[serde(rename = "Dataset")]
    pub dataset: String,
    #[serde(rename = "ID")]
    pub class_id: i64,
    #[serde(rename = "Description")]
    pub description: String,
    /// Display colour, passed through untouched.
    #[serde(rename = "Color")]
    pub color: String,
}

/// One row of `LandCover_Datasets.csv`.
#[derive(Debug, Deserialize)]
pub(crate) struct LandCoverDatasetRecord {
    #[serde(rename = "Dataset")]
    pub dataset: String,
}

/// Labels of a single land cover dataset, keyed by class id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelTable {
    labels: BTreeMap<i64, LandCoverLabel>,
}

impl LabelTable {
    pub fn from_labels<'a>(labels: impl IntoIterator<Item = &'a LandCoverLabel>) -> Self {
        let labels = labels
            .into_iter()
            .map(|label| (label.class_id, label.clone()))
            .collect();

        LabelTable { labels }
    }

    pub fn description(&self, class_id: i64) -> Option<&str> {
        self.labels.get(&class_id).map(|l| l.description.as_str())
    }

    pub fn class_by_description(&self, description: &str) -> Option<i64> {
        self.labels
            .values()
            .find(|l| l.description == description)
            .map(|l| l.class_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LandCoverLabel> {
        self.labels.values()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

// -- Tests -------------------------------------------------------------------
