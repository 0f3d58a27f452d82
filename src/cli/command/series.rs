use std::path::Path;

use anyhow::Result;
use supram::{
    aggregate::Granularity,
    engine::Engine,
    export::{save_series, series_file_name, Format},
    store::ObjectStore,
};

use super::make_output_path;
use crate::cli::create_spinner;

pub async fn series<S: ObjectStore>(
    engine: &Engine<S>,
    output_dir: &Path,
    region: &str,
    variable: &str,
    granularity: Granularity,
    datasets: &[String],
    format: Format,
) -> Result<String> {
    let bar = create_spinner(format!("Aggregating {} datasets...", datasets.len()));
    let table = engine
        .aggregate_many(region, datasets, variable, granularity)
        .await?;
    bar.finish_with_message(format!("{} rows aggregated", table.num_rows()));

    let file_name = series_file_name(region, variable, granularity, format);
    let file_path = make_output_path(output_dir, &file_name)?;
    save_series(&table, granularity, &file_path, format)?;

    Ok(format!("File saved to `{}`", file_path.to_string_lossy()))
}
