pub mod catalog;
pub mod land_cover;
pub mod map;
pub mod series;

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Result;
use supram::{catalog::Catalog, config::Settings, engine::Engine, store::ObjectStore};

use super::{create_spinner, Commands};

/// Loads the catalog once and dispatches `command` against `store`.
pub async fn run<S: ObjectStore>(command: &Commands, settings: &Settings, store: S) -> Result<String> {
    let bar = create_spinner("Loading catalog...".to_string());
    let loaded = Catalog::fetch(&store).await?;
    bar.finish_and_clear();

    let engine = Engine::new(store, Arc::new(loaded), settings.cache_capacity);

    match command {
        Commands::Variables {} => Ok(catalog::variables(engine.catalog())),
        Commands::Datasets {
            variable,
            granularity,
        } => Ok(catalog::datasets(engine.catalog(), variable, *granularity)),
        Commands::Descriptions {} => catalog::descriptions(engine.store()).await,
        Commands::Classes { dataset } => Ok(catalog::classes(engine.catalog(), dataset.as_deref())),
        Commands::Series {
            region,
            variable,
            granularity,
            datasets,
            format,
        } => {
            series::series(
                &engine,
                &settings.output_dir,
                region,
                variable,
                *granularity,
                datasets,
                *format,
            )
            .await
        }
        Commands::LandCover {
            region,
            dataset,
            threshold,
            format,
        } => {
            land_cover::land_cover(&engine, &settings.output_dir, region, dataset, *threshold, *format)
                .await
        }
        Commands::Map { variable, dataset } => map::series_map(&engine, variable, dataset).await,
        Commands::LandCoverMap { dataset, class } => {
            map::land_cover_map(&engine, dataset, class).await
        }
    }
}

/// Joins `file_name` to `output_dir`, creating the directory if needed.
pub fn make_output_path(output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;

    Ok(output_dir.join(file_name))
}

// -- Tests -------------------------------------------------------------------
