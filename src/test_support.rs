//! In-memory provider and frame fixtures shared by the unit tests.

use crate::provider::{ObservationProvider, ProviderError};
use crate::query::ObservationQuery;
use async_trait::async_trait;
use chrono::NaiveDate;
use polars::df;
use polars::prelude::*;

/// An [`ObservationProvider`] serving fixed frames, regardless of query.
pub(crate) struct MockProvider {
    stations: DataFrame,
    values: DataFrame,
}

impl MockProvider {
    pub(crate) fn new(stations: DataFrame, values: DataFrame) -> Self {
        Self { stations, values }
    }

    /// One station with a wide-shape annual temperature series.
    pub(crate) fn single_station(
        station_id: &str,
        name: &str,
        years: &[(i32, Option<f64>)],
    ) -> Self {
        Self::new(
            station_meta_frame(station_id, name),
            annual_wide_frame(station_id, years),
        )
    }

    /// A provider that matched nothing: zero station rows, zero value rows.
    pub(crate) fn empty() -> Self {
        Self::new(
            station_meta_frame("", "").head(Some(0)),
            annual_wide_frame("", &[]),
        )
    }
}

#[async_trait]
impl ObservationProvider for MockProvider {
    async fn fetch_stations(
        &self,
        _query: &ObservationQuery,
    ) -> Result<DataFrame, ProviderError> {
        Ok(self.stations.clone())
    }

    async fn fetch_values(&self, _query: &ObservationQuery) -> Result<DataFrame, ProviderError> {
        Ok(self.values.clone())
    }
}

/// Metadata frame with the provider listing's column set.
pub(crate) fn station_meta_frame(station_id: &str, name: &str) -> DataFrame {
    df!(
        "station_id" => [station_id],
        "start_date" => [NaiveDate::from_ymd_opt(1951, 1, 1).unwrap()],
        "end_date" => [NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()],
        "latitude" => [47.8413],
        "longitude" => [8.8493],
        "height" => [478.0],
        "name" => [name],
        "state" => ["Baden-Württemberg"],
        "dataset" => ["climate_summary"],
    )
    .unwrap()
}

/// Wide-shape annual values frame, one row per `(year, reading)` pair.
pub(crate) fn annual_wide_frame(station_id: &str, years: &[(i32, Option<f64>)]) -> DataFrame {
    let ids: Vec<&str> = years.iter().map(|_| station_id).collect();
    let datasets: Vec<&str> = years.iter().map(|_| "climate_summary").collect();
    let dates: Vec<NaiveDate> = years
        .iter()
        .map(|(year, _)| NaiveDate::from_ymd_opt(*year, 1, 1).unwrap())
        .collect();
    let temps: Vec<Option<f64>> = years.iter().map(|(_, value)| *value).collect();

    df!(
        "station_id" => ids,
        "dataset" => datasets,
        "date" => dates,
        "temperature_air_mean_2m" => temps,
    )
    .unwrap()
}

/// What the aggregator would hand the renderer for one station: values
/// already joined with the metadata columns.
pub(crate) fn merged_annual_frame(
    station_id: &str,
    name: &str,
    years: &[(i32, Option<f64>)],
) -> DataFrame {
    let values = annual_wide_frame(station_id, years);
    let meta = station_meta_frame(station_id, name);
    crate::aggregate::merge_observations(values, meta).unwrap()
}
