use std::path::Path;

use anyhow::Result;
use supram::{
    engine::Engine,
    export::{land_cover_file_name, save_land_cover, Format},
    store::ObjectStore,
};

use super::make_output_path;
use crate::cli::create_spinner;

pub async fn land_cover<S: ObjectStore>(
    engine: &Engine<S>,
    output_dir: &Path,
    region: &str,
    dataset: &str,
    threshold: f64,
    format: Format,
) -> Result<String> {
    let bar = create_spinner(format!("Composing {} land cover...", dataset));
    let report = engine.land_cover(region, dataset, threshold).await?;
    bar.finish_with_message(format!("{} years composed", report.years().len()));

    let file_name = land_cover_file_name(region, dataset, format);
    let file_path = make_output_path(output_dir, &file_name)?;
    save_land_cover(&report, &file_path, format)?;

    Ok(format!("File saved to `{}`", file_path.to_string_lossy()))
}
