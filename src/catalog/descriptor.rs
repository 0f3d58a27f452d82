//! Dataset metadata: native timestep, aggregation kind and units.

use serde::Deserialize;

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Resolution at which a dataset is published.
pub enum Timestep {
    Daily,
    Monthly,
}

impl Timestep {
    /// Parses the catalog vocabulary (`Diaria`, `Mensual`).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim() {
            "Diaria" => Some(Timestep::Daily),
            "Mensual" => Some(Timestep::Monthly),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How values are combined when a series is coarsened.
pub enum AggKind {
    Sum,
    Mean,
}

impl AggKind {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Some(AggKind::Sum),
            "mean" => Some(AggKind::Mean),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetDescriptor {
    pub dataset_name: String,
    /// Variable category shown to users, e.g. `Precipitacion`.
    pub variable_label: String,
    /// Variable name used in storage keys, e.g. `pr`.
    pub variable_name: String,
    pub native_timestep: Timestep,
    pub aggregation: AggKind,
    pub units: String,
    pub display_name: String,
}

/// One row of `Datasets.csv`.
#[derive(Debug, Deserialize)]
pub(crate) struct DatasetRecord {
    #[serde(rename = "Dataset")]
    dataset: String,
    #[serde(rename = "Label")]
    label: String,
    #[serde(rename = "Variable")]
    variable: String,
    #[serde(rename = "Timestep")]
    timestep: String,
    #[serde(rename = "Agg")]
    agg: String,
    #[serde(rename = "Units")]
    units: String,
}

impl DatasetRecord {
    pub(crate) fn into_descriptor(self, source: &str) -> Result<DatasetDescriptor> {
        let native_timestep = Timestep::from_label(&self.timestep).ok_or_else(|| {
            EngineError::fetch(
                source,
                format!("unknown timestep `{}` for {}", self.timestep, self.dataset),
            )
        })?;
        let aggregation = AggKind::from_label(&self.agg).ok_or_else(|| {
            EngineError::fetch(
                source,
                format!("unknown aggregation `{}` for {}", self.agg, self.dataset),
            )
        })?;
        let display_name = format!("{} ({})", title_case(&self.variable), self.units);

        Ok(DatasetDescriptor {
            dataset_name: self.dataset,
            variable_label: self.label,
            variable_name: self.variable,
            native_timestep,
            aggregation,
            units: self.units,
            display_name,
        })
    }
}

// Upper-cases the first letter of every word and lower-cases the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

// -- Tests -------------------------------------------------------------------
