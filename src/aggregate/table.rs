//! Outer join of aggregated series into one table.

use std::collections::BTreeMap;

use super::{round_to, Series, TimeKey, TABLE_DECIMALS};

/// Time-indexed table with one column per dataset.
///
/// All columns share one index, the union of the input keys. Cells without
/// data are `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedTable {
    columns: Vec<String>,
    rows: Vec<(TimeKey, Vec<Option<f64>>)>,
}

impl AggregatedTable {
    pub fn empty() -> Self {
        AggregatedTable::default()
    }

    /// Outer-joins labelled series on their keys, rounding every value.
    pub fn outer_join(series: Vec<(String, Series)>) -> Self {
        let width = series.len();
        let mut index: BTreeMap<TimeKey, Vec<Option<f64>>> = BTreeMap::new();
        let mut columns = Vec::with_capacity(width);

        for (column, (name, s)) in series.into_iter().enumerate() {
            for (key, value) in s.points {
                index.entry(key).or_insert_with(|| vec![None; width])[column] =
                    Some(round_to(value, TABLE_DECIMALS));
            }
            columns.push(name);
        }

        AggregatedTable {
            columns,
            rows: index.into_iter().collect(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[(TimeKey, Vec<Option<f64>>)] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty()
    }

    pub fn index(&self) -> impl Iterator<Item = TimeKey> + '_ {
        self.rows.iter().map(|(k, _)| *k)
    }

    /// Cell lookup; `None` for an unknown column, key, or a missing value.
    pub fn value(&self, key: TimeKey, column: &str) -> Option<f64> {
        let col = self.columns.iter().position(|c| c == column)?;
        let row = self.rows.binary_search_by(|(k, _)| k.cmp(&key)).ok()?;
        self.rows[row].1[col]
    }
}

// -- Tests -------------------------------------------------------------------
