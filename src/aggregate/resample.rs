//! Calendar bucketing of raw series.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use super::{Granularity, RawSeries, Series, TimeKey};
use crate::catalog::{AggKind, DatasetDescriptor, Timestep};

#[derive(Debug, Default, Clone, Copy)]
struct Bucket {
    sum: f64,
    count: usize,
}

impl Bucket {
    fn reduce(&self, kind: AggKind) -> f64 {
        match kind {
            AggKind::Sum => self.sum,
            AggKind::Mean => self.sum / self.count as f64,
        }
    }
}

/// Groups `points` by key and reduces each group with `kind`.
fn bucketize<K: Ord>(points: impl IntoIterator<Item = (K, f64)>, kind: AggKind) -> Vec<(K, f64)> {
    let mut buckets: BTreeMap<K, Bucket> = BTreeMap::new();
    for (key, value) in points {
        let entry = buckets.entry(key).or_default();
        entry.sum += value;
        entry.count += 1;
    }

    buckets
        .into_iter()
        .map(|(key, bucket)| (key, bucket.reduce(kind)))
        .collect()
}

/// First day of the calendar month holding `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Collapses points to calendar months stamped on day 1.
pub fn to_monthly(points: &[(NaiveDate, f64)], kind: AggKind) -> Vec<(NaiveDate, f64)> {
    bucketize(points.iter().map(|(d, v)| (month_start(*d), *v)), kind)
}

/// Collapses points to calendar years.
pub fn to_annual(points: &[(NaiveDate, f64)], kind: AggKind) -> Vec<(i32, f64)> {
    bucketize(points.iter().map(|(d, v)| (d.year(), *v)), kind)
}

/// Averages monthly points per month of year across all years.
pub fn to_mean_monthly(monthly: &[(NaiveDate, f64)]) -> Vec<(u32, f64)> {
    bucketize(monthly.iter().map(|(d, v)| (d.month(), *v)), AggKind::Mean)
}

/// Resamples `raw` to `target` following the dataset's aggregation kind.
pub fn aggregate(raw: &RawSeries, descriptor: &DatasetDescriptor, target: Granularity) -> Series {
    let kind = descriptor.aggregation;
    let native = descriptor.native_timestep;
    let points = raw.points();

    let points: Vec<(TimeKey, f64)> = match (target, native) {
        (Granularity::Monthly, Timestep::Daily) => to_monthly(points, kind)
            .into_iter()
            .map(|(d, v)| (TimeKey::Date(d), v))
            .collect(),
        (Granularity::Annual, _) => to_annual(points, kind)
            .into_iter()
            .map(|(y, v)| (TimeKey::Year(y), v))
            .collect(),
        (Granularity::MeanMonthly, Timestep::Daily) => to_mean_monthly(&to_monthly(points, kind))
            .into_iter()
            .map(|(m, v)| (TimeKey::Month(m), v))
            .collect(),
        (Granularity::MeanMonthly, Timestep::Monthly) => to_mean_monthly(points)
            .into_iter()
            .map(|(m, v)| (TimeKey::Month(m), v))
            .collect(),
        (Granularity::Daily, Timestep::Monthly) => {
            warn!(
                dataset = %descriptor.dataset_name,
                "Daily granularity requested for a monthly dataset, passing through"
            );
            passthrough(points)
        }
        (Granularity::Daily, Timestep::Daily) | (Granularity::Monthly, Timestep::Monthly) => {
            passthrough(points)
        }
    };

    let series = Series { points };
    debug!(
        dataset = %descriptor.dataset_name,
        granularity = %target,
        points_in = raw.len(),
        points_out = series.len(),
        "Aggregated series"
    );

    series
}

fn passthrough(points: &[(NaiveDate, f64)]) -> Vec<(TimeKey, f64)> {
    points.iter().map(|(d, v)| (TimeKey::Date(*d), *v)).collect()
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn descriptor(native: Timestep, kind: AggKind) -> DatasetDescriptor {
        DatasetDescriptor {
            dataset_name: "CHIRPS".to_string(),
            variable_label: "Precipitacion".to_string(),
            variable_name: "pr".to_string(),
            native_timestep: native,
            aggregation: kind,
            units: "mm".to_string(),
            display_name: "Pr (mm)".to_string(),
        }
    }

    // Every day of `years`, value = day of year
    fn daily_fixture(years: std::ops::Range<i32>) -> RawSeries {
        let start = date(years.start, 1, 1);
        let end = date(years.end, 1, 1);
        let points = start
            .iter_days()
            .take_while(|d| *d < end)
            .map(|d| (d, d.ordinal() as f64))
            .collect();

        RawSeries::new(points).unwrap()
    }

    #[test]
    fn should_sum_daily_to_first_of_month() {
        let raw = RawSeries::new(vec![
            (date(2020, 1, 1), 2.0),
            (date(2020, 1, 15), 4.0),
            (date(2020, 2, 10), 10.0),
        ])
        .unwrap();

        let series = aggregate(
            &raw,
            &descriptor(Timestep::Daily, AggKind::Sum),
            Granularity::Monthly,
        );

        assert_eq!(
            series.points,
            vec![
                (TimeKey::Date(date(2020, 1, 1)), 6.0),
                (TimeKey::Date(date(2020, 2, 1)), 10.0),
            ]
        );
    }

    #[test]
    fn should_average_daily_to_months() {
        let raw = RawSeries::new(vec![
            (date(2021, 3, 2), 10.0),
            (date(2021, 3, 31), 20.0),
            (date(2021, 5, 5), 3.0),
        ])
        .unwrap();

        let series = aggregate(
            &raw,
            &descriptor(Timestep::Daily, AggKind::Mean),
            Granularity::Monthly,
        );

        // April has no observations and is not synthesised
        assert_eq!(
            series.points,
            vec![
                (TimeKey::Date(date(2021, 3, 1)), 15.0),
                (TimeKey::Date(date(2021, 5, 1)), 3.0),
            ]
        );
    }

    #[test]
    fn should_pass_monthly_dataset_through_monthly() {
        let raw = RawSeries::new(vec![(date(2000, 1, 1), 80.0), (date(2000, 2, 1), 60.0)]).unwrap();

        let series = aggregate(
            &raw,
            &descriptor(Timestep::Monthly, AggKind::Sum),
            Granularity::Monthly,
        );

        assert_eq!(series.points[0], (TimeKey::Date(date(2000, 1, 1)), 80.0));
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn should_aggregate_monthly_dataset_by_year_directly() {
        let raw = RawSeries::new(vec![
            (date(2000, 1, 1), 10.0),
            (date(2000, 2, 1), 20.0),
            (date(2001, 1, 1), 30.0),
        ])
        .unwrap();

        let sum = aggregate(
            &raw,
            &descriptor(Timestep::Monthly, AggKind::Sum),
            Granularity::Annual,
        );
        let mean = aggregate(
            &raw,
            &descriptor(Timestep::Monthly, AggKind::Mean),
            Granularity::Annual,
        );

        assert_eq!(
            sum.points,
            vec![(TimeKey::Year(2000), 30.0), (TimeKey::Year(2001), 30.0)]
        );
        assert_eq!(
            mean.points,
            vec![(TimeKey::Year(2000), 15.0), (TimeKey::Year(2001), 30.0)]
        );
    }

    #[test]
    fn should_collapse_to_months_before_mean_monthly() {
        // Two days in January of each year: sums 3 and 7, climatological mean 5
        let raw = RawSeries::new(vec![
            (date(2019, 1, 1), 1.0),
            (date(2019, 1, 2), 2.0),
            (date(2020, 1, 1), 3.0),
            (date(2020, 1, 2), 4.0),
        ])
        .unwrap();

        let series = aggregate(
            &raw,
            &descriptor(Timestep::Daily, AggKind::Sum),
            Granularity::MeanMonthly,
        );

        assert_eq!(series.points, vec![(TimeKey::Month(1), 5.0)]);
    }

    #[test]
    fn should_average_monthly_dataset_across_years_for_mean_monthly() {
        let raw = RawSeries::new(vec![
            (date(2000, 1, 1), 10.0),
            (date(2000, 2, 1), 20.0),
            (date(2001, 1, 1), 30.0),
        ])
        .unwrap();

        // Sum datasets still average months across years
        let series = aggregate(
            &raw,
            &descriptor(Timestep::Monthly, AggKind::Sum),
            Granularity::MeanMonthly,
        );

        assert_eq!(
            series.points,
            vec![(TimeKey::Month(1), 20.0), (TimeKey::Month(2), 20.0)]
        );
    }

    #[test]
    fn should_pass_monthly_dataset_through_daily() {
        let raw = RawSeries::new(vec![(date(2000, 1, 1), 80.0), (date(2000, 2, 1), 60.0)]).unwrap();

        let series = aggregate(
            &raw,
            &descriptor(Timestep::Monthly, AggKind::Mean),
            Granularity::Daily,
        );

        assert_eq!(
            series.points,
            vec![
                (TimeKey::Date(date(2000, 1, 1)), 80.0),
                (TimeKey::Date(date(2000, 2, 1)), 60.0),
            ]
        );
    }

    #[test]
    fn should_yield_twelve_months_for_mean_monthly() {
        for years in [2019..2020, 2015..2021] {
            let raw = daily_fixture(years);
            let series = aggregate(
                &raw,
                &descriptor(Timestep::Daily, AggKind::Mean),
                Granularity::MeanMonthly,
            );

            let keys: Vec<TimeKey> = series.points.iter().map(|(k, _)| *k).collect();
            let expected: Vec<TimeKey> = (1..=12).map(TimeKey::Month).collect();
            assert_eq!(keys, expected);
        }
    }

    #[test]
    fn should_pass_daily_through() {
        let raw = daily_fixture(2020..2021);
        let series = aggregate(
            &raw,
            &descriptor(Timestep::Daily, AggKind::Sum),
            Granularity::Daily,
        );

        assert_eq!(series.len(), 366);
        assert_eq!(series.points[59], (TimeKey::Date(date(2020, 2, 29)), 60.0));
    }

    #[test]
    fn should_be_idempotent() {
        let raw = daily_fixture(2018..2020);
        let d = descriptor(Timestep::Daily, AggKind::Mean);

        let first = aggregate(&raw, &d, Granularity::Monthly);
        let second = aggregate(&raw, &d, Granularity::Monthly);

        let bits = |s: &Series| s.points.iter().map(|(k, v)| (*k, v.to_bits())).collect::<Vec<_>>();
        assert_eq!(bits(&first), bits(&second));
    }

    fn daily_points() -> impl Strategy<Value = Vec<(NaiveDate, f64)>> {
        proptest::collection::btree_map(0u32..1500, -100i32..100, 1..200).prop_map(|days| {
            days.into_iter()
                .map(|(offset, v)| (date(2018, 1, 1) + chrono::Days::new(offset as u64), v as f64))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn monthly_sum_matches_calendar_month(points in daily_points()) {
            let raw = RawSeries::new(points.clone()).unwrap();
            let series = aggregate(
                &raw,
                &descriptor(Timestep::Daily, AggKind::Sum),
                Granularity::Monthly,
            );

            for (key, value) in &series.points {
                let TimeKey::Date(start) = key else { panic!("expected date key") };
                prop_assert_eq!(start.day(), 1);

                let expected: f64 = points
                    .iter()
                    .filter(|(d, _)| d.year() == start.year() && d.month() == start.month())
                    .map(|(_, v)| v)
                    .sum();
                prop_assert_eq!(*value, expected);
            }
        }

        #[test]
        fn annual_mean_matches_calendar_year(points in daily_points()) {
            let raw = RawSeries::new(points.clone()).unwrap();
            let series = aggregate(
                &raw,
                &descriptor(Timestep::Daily, AggKind::Mean),
                Granularity::Annual,
            );

            for (key, value) in &series.points {
                let TimeKey::Year(year) = key else { panic!("expected year key") };
                let in_year: Vec<f64> = points
                    .iter()
                    .filter(|(d, _)| d.year() == *year)
                    .map(|(_, v)| *v)
                    .collect();
                let expected = in_year.iter().sum::<f64>() / in_year.len() as f64;
                prop_assert!((value - expected).abs() < 1e-9);
            }
        }
    }
}
