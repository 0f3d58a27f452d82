//! Request pipeline: fetch -> aggregate/compose -> table, with memoization.

use std::sync::Arc;

use moka::sync::Cache;
use tracing::{debug, info};

use crate::{
    aggregate::{aggregate, AggregatedTable, Granularity, Series},
    catalog::Catalog,
    error::{EngineError, Result},
    land_cover::{compose, validate_threshold, LandCoverReport},
    reading::{decode_land_use, decode_land_use_layer, decode_series, decode_series_layer, MapLayer},
    store::{ObjectKey, ObjectStore},
};

/// Full parameter tuple of an `aggregate_many` call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesRequest {
    pub region: String,
    pub datasets: Vec<String>,
    pub variable_label: String,
    pub granularity: Granularity,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LandCoverRequest {
    pub region: String,
    pub dataset: String,
    /// Threshold bit pattern, so the key stays `Eq`.
    pub threshold_bits: u64,
}

pub struct Engine<S> {
    store: S,
    catalog: Arc<Catalog>,
    series_cache: Cache<SeriesRequest, Arc<AggregatedTable>>,
    land_cover_cache: Cache<LandCoverRequest, Arc<LandCoverReport>>,
}

impl<S: ObjectStore> Engine<S> {
    /// `cache_capacity` bounds each result cache by entry count.
    pub fn new(store: S, catalog: Arc<Catalog>, cache_capacity: u64) -> Self {
        Engine {
            store,
            catalog,
            series_cache: Cache::new(cache_capacity),
            land_cover_cache: Cache::new(cache_capacity),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches and aggregates one dataset of `variable_label` for `region`.
    pub async fn aggregate_one(
        &self,
        region: &str,
        dataset: &str,
        variable_label: &str,
        granularity: Granularity,
    ) -> Result<Series> {
        let descriptor = self.catalog.describe(dataset, variable_label)?;
        let key = ObjectKey::TimeSeries {
            dataset: descriptor.dataset_name.clone(),
            variable: descriptor.variable_name.clone(),
            region: region.to_string(),
        };

        let bytes = self.store.fetch(&key).await?;
        let raw = decode_series(&bytes, &key.path())?;

        Ok(aggregate(&raw, descriptor, granularity))
    }

    /// Aggregates every dataset independently and outer-joins them by time.
    ///
    /// Any failing dataset fails the whole call. No datasets gives an empty table.
    pub async fn aggregate_many(
        &self,
        region: &str,
        datasets: &[String],
        variable_label: &str,
        granularity: Granularity,
    ) -> Result<Arc<AggregatedTable>> {
        check_region(region)?;

        let request = SeriesRequest {
            region: region.to_string(),
            datasets: datasets.to_vec(),
            variable_label: variable_label.to_string(),
            granularity,
        };
        if let Some(table) = self.series_cache.get(&request) {
            debug!(?request, "Series cache hit");
            return Ok(table);
        }

        let mut columns = Vec::with_capacity(datasets.len());
        for dataset in datasets {
            let series = self
                .aggregate_one(region, dataset, variable_label, granularity)
                .await?;
            columns.push((dataset.clone(), series));
        }

        let table = Arc::new(AggregatedTable::outer_join(columns));
        info!(
            region,
            variable = variable_label,
            granularity = %granularity,
            datasets = datasets.len(),
            rows = table.num_rows(),
            "Series table built"
        );
        self.series_cache.insert(request, Arc::clone(&table));

        Ok(table)
    }

    /// Fetches the land cover table of `region` and composes it at `threshold`.
    pub async fn land_cover(
        &self,
        region: &str,
        dataset: &str,
        threshold: f64,
    ) -> Result<Arc<LandCoverReport>> {
        check_region(region)?;
        validate_threshold(threshold)?;
        if !self.catalog.land_cover_datasets().iter().any(|d| d == dataset) {
            return Err(EngineError::NotFound(format!("land cover dataset `{}`", dataset)));
        }

        let request = LandCoverRequest {
            region: region.to_string(),
            dataset: dataset.to_string(),
            threshold_bits: threshold.to_bits(),
        };
        if let Some(report) = self.land_cover_cache.get(&request) {
            debug!(?request, "Land cover cache hit");
            return Ok(report);
        }

        let key = ObjectKey::LandUse {
            dataset: dataset.to_string(),
            region: region.to_string(),
        };
        let bytes = self.store.fetch(&key).await?;
        let raw = decode_land_use(&bytes, region, &key.path())?;
        let labels = self.catalog.land_cover_labels(dataset);
        debug!(dataset, labels = labels.len(), rows = raw.rows.len(), "Decoded land use table");

        let report = Arc::new(compose(&raw, &labels, threshold)?);
        info!(region, dataset, threshold, rows = report.rows.len(), "Land cover report built");
        self.land_cover_cache.insert(request, Arc::clone(&report));

        Ok(report)
    }

    /// Region -> value layer of a time series variable, for the map.
    pub async fn series_layer(&self, variable_label: &str, dataset: &str) -> Result<MapLayer> {
        let descriptor = self.catalog.describe(dataset, variable_label)?;
        let key = ObjectKey::SeriesLayer {
            label: variable_label.to_string(),
            dataset: dataset.to_string(),
        };

        let bytes = self.store.fetch(&key).await?;
        decode_series_layer(&bytes, &descriptor.display_name, &key.path())
    }

    /// Region -> percentage layer of one land cover class, for the map.
    pub async fn land_cover_layer(&self, dataset: &str, description: &str) -> Result<MapLayer> {
        let class_id = self.catalog.class_by_description(dataset, description)?;
        let key = ObjectKey::LandUseLayer {
            dataset: dataset.to_string(),
        };

        let bytes = self.store.fetch(&key).await?;
        decode_land_use_layer(&bytes, class_id, description, &key.path())
    }
}

fn check_region(region: &str) -> Result<()> {
    if region.trim().is_empty() {
        return Err(EngineError::InvalidArgument("no region selected".to_string()));
    }

    Ok(())
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use std::{fs, sync::Arc};

    use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::{
        aggregate::TimeKey,
        catalog::test::catalog_fixture,
        reading::test::ipc_bytes,
        store::LocalStore,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn put(store: &LocalStore, key: &ObjectKey, bytes: Vec<u8>) {
        let path = store.file_path(key);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, bytes).unwrap();
    }

    fn series_bytes(points: &[(&str, f64)]) -> Vec<u8> {
        ipc_bytes(vec![
            (
                "Dates",
                Arc::new(StringArray::from(
                    points.iter().map(|(d, _)| *d).collect::<Vec<_>>(),
                )) as ArrayRef,
            ),
            (
                "value",
                Arc::new(Float64Array::from(
                    points.iter().map(|(_, v)| *v).collect::<Vec<_>>(),
                )) as ArrayRef,
            ),
        ])
    }

    fn time_series_key(dataset: &str, variable: &str, region: &str) -> ObjectKey {
        ObjectKey::TimeSeries {
            dataset: dataset.to_string(),
            variable: variable.to_string(),
            region: region.to_string(),
        }
    }

    // CHIRPS is daily for 2020, TerraClimate monthly for 2019
    fn engine_fixture(dir: &TempDir) -> Engine<LocalStore> {
        let store = LocalStore::new(dir.path());
        put(
            &store,
            &time_series_key("CHIRPS", "pr", "101"),
            series_bytes(&[("2020-01-01", 2.0), ("2020-01-15", 4.0), ("2020-02-10", 10.0)]),
        );
        put(
            &store,
            &time_series_key("TerraClimate", "pr", "101"),
            series_bytes(&[("2019-11-01", 30.0), ("2019-12-01", 40.123_456)]),
        );

        Engine::new(store, Arc::new(catalog_fixture()), 16)
    }

    #[tokio::test]
    async fn should_merge_datasets_with_outer_join() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);
        let datasets = vec!["CHIRPS".to_string(), "TerraClimate".to_string()];

        let table = engine
            .aggregate_many("101", &datasets, "Precipitacion", Granularity::Monthly)
            .await
            .unwrap();

        assert_eq!(table.columns(), &["CHIRPS", "TerraClimate"]);
        assert_eq!(
            table.index().collect::<Vec<_>>(),
            vec![
                TimeKey::Date(date(2019, 11, 1)),
                TimeKey::Date(date(2019, 12, 1)),
                TimeKey::Date(date(2020, 1, 1)),
                TimeKey::Date(date(2020, 2, 1)),
            ]
        );
        assert_eq!(table.rows()[1].1, vec![None, Some(40.1235)]);
        assert_eq!(table.rows()[2].1, vec![Some(6.0), None]);
    }

    #[tokio::test]
    async fn should_aggregate_annual_across_native_timesteps() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);
        let datasets = vec!["CHIRPS".to_string(), "TerraClimate".to_string()];

        let table = engine
            .aggregate_many("101", &datasets, "Precipitacion", Granularity::Annual)
            .await
            .unwrap();

        assert_eq!(table.value(TimeKey::Year(2020), "CHIRPS"), Some(16.0));
        assert_eq!(table.value(TimeKey::Year(2019), "TerraClimate"), Some(70.1235));
        assert_eq!(table.value(TimeKey::Year(2019), "CHIRPS"), None);
    }

    #[tokio::test]
    async fn should_return_empty_table_without_datasets() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);

        let table = engine
            .aggregate_many("101", &[], "Precipitacion", Granularity::Monthly)
            .await
            .unwrap();

        assert_eq!(table.num_rows(), 0);
        assert_eq!(table.num_columns(), 0);
    }

    #[tokio::test]
    async fn should_fail_whole_call_when_one_fetch_fails() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);
        let datasets = vec!["CHIRPS".to_string(), "TerraClimate".to_string()];

        let err = engine
            .aggregate_many("102", &datasets, "Precipitacion", Granularity::Monthly)
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::Fetch { key, .. } if key == "timeseries/CHIRPS_pr/102"));
    }

    #[tokio::test]
    async fn should_fail_for_unknown_dataset_or_region() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);

        let unknown = engine
            .aggregate_many("101", &["GPM".to_string()], "Precipitacion", Granularity::Daily)
            .await
            .unwrap_err();
        let no_region = engine
            .aggregate_many(" ", &["CHIRPS".to_string()], "Precipitacion", Granularity::Daily)
            .await
            .unwrap_err();

        assert!(matches!(unknown, EngineError::NotFound(_)));
        assert!(matches!(no_region, EngineError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn should_memoize_identical_requests() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);
        let datasets = vec!["CHIRPS".to_string()];

        let first = engine
            .aggregate_many("101", &datasets, "Precipitacion", Granularity::Monthly)
            .await
            .unwrap();

        // Remove the source: a repeated call must be served from the cache
        fs::remove_file(engine.store().file_path(&time_series_key("CHIRPS", "pr", "101"))).unwrap();

        let second = engine
            .aggregate_many("101", &datasets, "Precipitacion", Granularity::Monthly)
            .await
            .unwrap();
        assert_eq!(first, second);

        let other_granularity = engine
            .aggregate_many("101", &datasets, "Precipitacion", Granularity::Annual)
            .await;
        assert!(other_granularity.is_err());
    }

    fn land_use_bytes(region: &str) -> Vec<u8> {
        ipc_bytes(vec![
            ("ID", Arc::new(Int64Array::from(vec![10, 12, 13])) as ArrayRef),
            ("Year", Arc::new(Int64Array::from(vec![2020, 2020, 2020])) as ArrayRef),
            (region, Arc::new(Float64Array::from(vec![70.0, 25.0, 5.0])) as ArrayRef),
        ])
    }

    #[tokio::test]
    async fn should_compose_land_cover_for_region() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);
        let key = ObjectKey::LandUse {
            dataset: "MODIS".to_string(),
            region: "101".to_string(),
        };
        put(engine.store(), &key, land_use_bytes("101"));

        let report = engine.land_cover("101", "MODIS", 10.0).await.unwrap();

        let rows: Vec<(i32, i64, f64, &str)> = report
            .rows
            .iter()
            .map(|r| (r.year, r.class_id, r.percentage, r.description.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                (2020, -1, 5.0, "Other"),
                (2020, 10, 70.0, "Grassland"),
                (2020, 12, 25.0, "Cropland"),
            ]
        );
    }

    #[tokio::test]
    async fn should_validate_land_cover_arguments_before_fetching() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);

        let threshold = engine.land_cover("101", "MODIS", 120.0).await.unwrap_err();
        let dataset = engine.land_cover("101", "Dynamic World", 1.0).await.unwrap_err();
        let missing = engine.land_cover("101", "ESA CCI", 1.0).await.unwrap_err();

        assert!(matches!(threshold, EngineError::InvalidArgument(_)));
        assert!(matches!(dataset, EngineError::NotFound(_)));
        assert!(matches!(missing, EngineError::Fetch { .. }));
    }

    #[tokio::test]
    async fn should_build_map_layers() {
        let dir = TempDir::new().unwrap();
        let engine = engine_fixture(&dir);
        put(
            engine.store(),
            &ObjectKey::SeriesLayer {
                label: "Precipitacion".to_string(),
                dataset: "CHIRPS".to_string(),
            },
            ipc_bytes(vec![
                ("ID", Arc::new(Int64Array::from(vec![101, 102])) as ArrayRef),
                ("pr", Arc::new(Float64Array::from(vec![700.126, 650.0])) as ArrayRef),
            ]),
        );
        put(
            engine.store(),
            &ObjectKey::LandUseLayer {
                dataset: "MODIS".to_string(),
            },
            ipc_bytes(vec![
                ("ID", Arc::new(Int64Array::from(vec![10, 13])) as ArrayRef),
                ("101", Arc::new(Float64Array::from(vec![70.0, 1.5])) as ArrayRef),
                ("102", Arc::new(Float64Array::from(vec![40.0, 3.0])) as ArrayRef),
            ]),
        );

        let series = engine.series_layer("Precipitacion", "CHIRPS").await.unwrap();
        assert_eq!(series.title, "Pr (mm)");
        assert_eq!(series.values.get("101"), Some(&700.13));

        let urban = engine.land_cover_layer("MODIS", "Urban").await.unwrap();
        assert_eq!(urban.values.get("102"), Some(&3.0));

        let unknown = engine.land_cover_layer("MODIS", "Glacier").await.unwrap_err();
        assert!(matches!(unknown, EngineError::NotFound(_)));
    }
}
