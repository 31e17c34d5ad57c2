//! Station metadata as the provider serializes it, and its conversion into
//! the tabular form the aggregator joins against.

use chrono::NaiveDate;
use polars::df;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One station entry from the provider's metadata listing.
///
/// `start_date`/`end_date` describe the station's reported coverage for the
/// requested resolution and dataset; gaps may exist within that range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    /// The provider's station identifier (e.g. "00001").
    pub station_id: String,
    /// First date with reported data.
    pub start_date: NaiveDate,
    /// Last date with reported data.
    pub end_date: NaiveDate,
    pub latitude: f64,
    pub longitude: f64,
    /// Station elevation in meters.
    pub height: f64,
    /// Descriptive station name (e.g. "Aach").
    pub name: String,
    /// Administrative region the station belongs to.
    pub state: String,
}

/// Converts the parsed metadata listing into a one-row-per-station frame.
///
/// Column order matches the provider listing; the `dataset` label column is
/// appended so the metadata side mirrors the values side of the join.
pub fn stations_to_frame(
    records: &[StationRecord],
    dataset_label: &str,
) -> PolarsResult<DataFrame> {
    let station_id: Vec<&str> = records.iter().map(|r| r.station_id.as_str()).collect();
    let start_date: Vec<NaiveDate> = records.iter().map(|r| r.start_date).collect();
    let end_date: Vec<NaiveDate> = records.iter().map(|r| r.end_date).collect();
    let latitude: Vec<f64> = records.iter().map(|r| r.latitude).collect();
    let longitude: Vec<f64> = records.iter().map(|r| r.longitude).collect();
    let height: Vec<f64> = records.iter().map(|r| r.height).collect();
    let name: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    let state: Vec<&str> = records.iter().map(|r| r.state.as_str()).collect();
    let dataset: Vec<&str> = records.iter().map(|_| dataset_label).collect();

    df!(
        "station_id" => station_id,
        "start_date" => start_date,
        "end_date" => end_date,
        "latitude" => latitude,
        "longitude" => longitude,
        "height" => height,
        "name" => name,
        "state" => state,
        "dataset" => dataset,
    )
}
