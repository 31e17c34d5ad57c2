//! Extraction of a per-year series from the merged observation table.

use crate::query::Parameter;
use crate::stripes::error::RenderError;
use polars::prelude::*;
use std::collections::HashMap;

/// One calendar year of the series; `value` is `None` for years without a
/// reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearValue {
    pub year: i32,
    pub value: Option<f64>,
}

/// A station's annual series over its full contiguous year range.
///
/// Built from a wide-shape observation table: the `date` column is
/// normalized to whole calendar days, the calendar year is derived from it,
/// and every integer year between the first and last observed year gets an
/// entry, observed or not.
#[derive(Debug, Clone)]
pub struct AnnualSeries {
    pub station_id: String,
    /// Descriptive station name from the metadata side of the table.
    pub name: Option<String>,
    points: Vec<YearValue>,
}

impl AnnualSeries {
    /// Extracts the series for `parameter` from a merged observation table.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyData`] when the table has no rows (or no
    /// usable dates), [`RenderError::ColumnNotFound`] when the parameter
    /// column is absent.
    pub fn from_frame(
        frame: &DataFrame,
        parameter: Parameter,
        station_id: &str,
    ) -> Result<Self, RenderError> {
        if frame.height() == 0 {
            return Err(RenderError::EmptyData {
                station_id: station_id.to_string(),
            });
        }

        let column_name = parameter.column_name();
        frame
            .column(column_name)
            .map_err(|e| RenderError::ColumnNotFound(column_name.to_string(), e))?;

        let normalized = frame
            .clone()
            .lazy()
            .with_column(col("date").cast(DataType::Date))
            .with_column(col("date").dt().year().alias("year"))
            .with_column(col(column_name).cast(DataType::Float64))
            .collect()?;

        let years = normalized.column("year")?.i32()?;
        let values = normalized.column(column_name)?.f64()?;

        let mut by_year: HashMap<i32, f64> = HashMap::new();
        let mut observed_years: Vec<i32> = Vec::with_capacity(normalized.height());
        for (year, value) in years.into_iter().zip(values) {
            let Some(year) = year else { continue };
            observed_years.push(year);
            if let Some(value) = value {
                by_year.insert(year, value);
            }
        }

        let (Some(&start_year), Some(&end_year)) =
            (observed_years.iter().min(), observed_years.iter().max())
        else {
            return Err(RenderError::EmptyData {
                station_id: station_id.to_string(),
            });
        };

        let name = normalized
            .column("name")
            .ok()
            .and_then(|column| column.str().ok())
            .and_then(|names| names.get(0))
            .map(str::to_string);

        let points = (start_year..=end_year)
            .map(|year| YearValue {
                year,
                value: by_year.get(&year).copied(),
            })
            .collect();

        Ok(Self {
            station_id: station_id.to_string(),
            name,
            points,
        })
    }

    /// First year of the range.
    pub fn start_year(&self) -> i32 {
        self.points.first().expect("series is never empty").year
    }

    /// Last year of the range, inclusive.
    pub fn end_year(&self) -> i32 {
        self.points.last().expect("series is never empty").year
    }

    /// One entry per integer year in `[start_year, end_year]`.
    pub fn points(&self) -> &[YearValue] {
        &self.points
    }

    /// `(year, value)` pairs for the years that have a reading.
    pub fn present_points(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.value.map(|v| (p.year as f64, v)))
            .collect()
    }

    /// The readings alone, in year order.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.value)
    }

    /// Min and max of the present readings.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for value in self.present_values() {
            bounds = Some(match bounds {
                None => (value, value),
                Some((lo, hi)) => (lo.min(value), hi.max(value)),
            });
        }
        bounds
    }

    /// Figure title: the station's descriptive name, falling back to the id.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.station_id)
    }
}
