//! Region values handed to the map renderer, one `region,value` line each.

use anyhow::Result;
use supram::{engine::Engine, reading::MapLayer, store::ObjectStore};

use crate::cli::create_spinner;

pub async fn series_map<S: ObjectStore>(engine: &Engine<S>, variable: &str, dataset: &str) -> Result<String> {
    let bar = create_spinner("Downloading map layer...".to_string());
    let layer = engine.series_layer(variable, dataset).await?;
    bar.finish_and_clear();

    Ok(render(&layer))
}

pub async fn land_cover_map<S: ObjectStore>(engine: &Engine<S>, dataset: &str, class: &str) -> Result<String> {
    let bar = create_spinner("Downloading land cover layer...".to_string());
    let layer = engine.land_cover_layer(dataset, class).await?;
    bar.finish_and_clear();

    Ok(render(&layer))
}

fn render(layer: &MapLayer) -> String {
    let mut lines = vec![format!("region,{}", layer.title)];
    lines.extend(
        layer
            .values
            .iter()
            .map(|(region, value)| format!("{},{}", region, value)),
    );

    lines.join("\n")
}

// -- Tests -------------------------------------------------------------------
