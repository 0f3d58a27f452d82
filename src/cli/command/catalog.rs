//! Listings of the catalog.

use anyhow::Result;
use supram::{
    aggregate::Granularity,
    catalog::{Catalog, DatasetDescriptions},
    store::ObjectStore,
};

use crate::cli::create_spinner;

pub fn variables(catalog: &Catalog) -> String {
    catalog.variable_labels().join("\n")
}

pub fn datasets(catalog: &Catalog, variable: &str, granularity: Granularity) -> String {
    catalog.list_datasets(variable, granularity).join("\n")
}

/// The database description table as `;`-separated lines, header first.
pub async fn descriptions<S: ObjectStore>(store: &S) -> Result<String> {
    let bar = create_spinner("Loading dataset descriptions...".to_string());
    let table = DatasetDescriptions::fetch(store).await?;
    bar.finish_and_clear();

    Ok(render_descriptions(&table))
}

fn render_descriptions(table: &DatasetDescriptions) -> String {
    let mut lines = vec![table.headers.join(";")];
    lines.extend(table.rows.iter().map(|row| row.join(";")));

    lines.join("\n")
}

/// Land cover datasets, or `ID,Description,Color` lines for one dataset.
pub fn classes(catalog: &Catalog, dataset: Option<&str>) -> String {
    match dataset {
        None => catalog.land_cover_datasets().join("\n"),
        Some(dataset) => catalog
            .land_cover_labels(dataset)
            .iter()
            .map(|l| format!("{},{},{}", l.class_id, l.description, l.color))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

// -- Tests -------------------------------------------------------------------
