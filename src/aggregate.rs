//! Merging of the provider's two tables into one observation table.

use polars::prelude::*;
use std::collections::HashSet;

#[cfg(test)]
use polars::df;

/// Joins the values table with the station-metadata table on `station_id`.
///
/// Only metadata columns that are not already present in the values table
/// take part in the join, so nothing is duplicated. The metadata's coverage
/// bookkeeping (`start_date`, `end_date`) and the `dataset` label are
/// dropped from the merged result. A left join keeps exactly one output row
/// per values row; stations missing from the metadata yield nulls instead
/// of dropped observations.
pub fn merge_observations(values: DataFrame, meta: DataFrame) -> PolarsResult<DataFrame> {
    let value_columns: HashSet<&str> = values
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .collect();

    let mut cols_to_use: Vec<String> = meta
        .get_column_names()
        .iter()
        .map(|name| name.as_str())
        .filter(|name| !value_columns.contains(*name))
        .map(str::to_string)
        .collect();
    cols_to_use.push("station_id".to_string());

    let meta_subset = meta.select(cols_to_use)?;

    let merged = values
        .lazy()
        .join(
            meta_subset.lazy(),
            [col("station_id")],
            [col("station_id")],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    merged.drop("start_date")?.drop("end_date")?.drop("dataset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn meta_frame() -> DataFrame {
        df!(
            "station_id" => ["00001", "00044"],
            "start_date" => [
                NaiveDate::from_ymd_opt(1951, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(1936, 1, 1).unwrap(),
            ],
            "end_date" => [
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            ],
            "latitude" => [47.8413, 52.9335],
            "longitude" => [8.8493, 8.2370],
            "height" => [478.0, 44.0],
            "name" => ["Aach", "Großenkneten"],
            "state" => ["Baden-Württemberg", "Niedersachsen"],
            "dataset" => ["climate_summary", "climate_summary"],
        )
        .unwrap()
    }

    fn values_frame() -> DataFrame {
        df!(
            "station_id" => ["00001", "00001", "00044"],
            "dataset" => ["climate_summary", "climate_summary", "climate_summary"],
            "date" => [
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            ],
            "temperature_air_mean_2m" => [8.2, 8.9, 9.4],
        )
        .unwrap()
    }

    #[test]
    fn merged_columns_are_union_minus_bookkeeping() {
        let merged = merge_observations(values_frame(), meta_frame()).unwrap();
        let names: Vec<&str> = merged
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect();
        assert_eq!(
            names,
            [
                "station_id",
                "date",
                "temperature_air_mean_2m",
                "latitude",
                "longitude",
                "height",
                "name",
                "state",
            ]
        );
    }

    #[test]
    fn join_preserves_values_row_count() {
        let merged = merge_observations(values_frame(), meta_frame()).unwrap();
        assert_eq!(merged.height(), values_frame().height());
    }

    #[test]
    fn station_metadata_lands_on_every_row() {
        let merged = merge_observations(values_frame(), meta_frame()).unwrap();
        let name = merged.column("name").unwrap();
        assert_eq!(name.str().unwrap().get(0), Some("Aach"));
        assert_eq!(name.str().unwrap().get(2), Some("Großenkneten"));
    }

    #[test]
    fn empty_values_table_is_a_valid_result() {
        let empty = values_frame().head(Some(0));
        let merged = merge_observations(empty, meta_frame()).unwrap();
        assert_eq!(merged.height(), 0);
        assert!(merged
            .get_column_names()
            .iter()
            .any(|name| name.as_str() == "name"));
    }
}
