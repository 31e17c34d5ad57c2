//! Query types describing one logical request against the observation
//! provider: temporal resolution, dataset, parameter selection, station
//! scoping, date span and result shape.

use chrono::NaiveDate;
use std::fmt;
use thiserror::Error;

/// Temporal aggregation granularity of the requested observations.
///
/// Determines which provider path the data is read from and the meaning of
/// the `date` column (annual data carries the first day of the year, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// One value per calendar year.
    Annual,
    /// One value per calendar month.
    Monthly,
    /// One value per calendar day.
    Daily,
}

impl Resolution {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Resolution::Annual => "annual",
            Resolution::Monthly => "monthly",
            Resolution::Daily => "daily",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// A named bundle of related parameters offered by the provider.
///
/// Queries that give no explicit parameter list span the whole dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dataset {
    /// General climatological summary values (temperatures, precipitation,
    /// sunshine). This is the default dataset.
    #[default]
    ClimateSummary,
    /// Precipitation-only series.
    Precipitation,
    /// Solar radiation and sunshine series.
    Solar,
}

impl Dataset {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Dataset::ClimateSummary => "climate_summary",
            Dataset::Precipitation => "precipitation",
            Dataset::Solar => "solar",
        }
    }

    /// All parameters the provider serializes for this dataset, in column
    /// order of its values files.
    pub fn parameters(&self) -> &'static [Parameter] {
        match self {
            Dataset::ClimateSummary => &[
                Parameter::TemperatureAirMean2m,
                Parameter::TemperatureAirMax2m,
                Parameter::TemperatureAirMin2m,
                Parameter::PrecipitationHeight,
                Parameter::SunshineDuration,
            ],
            Dataset::Precipitation => &[Parameter::PrecipitationHeight],
            Dataset::Solar => &[Parameter::SunshineDuration],
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}

/// A single observed variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// Mean 2-meter air temperature, degrees Celsius.
    TemperatureAirMean2m,
    /// Maximum 2-meter air temperature, degrees Celsius.
    TemperatureAirMax2m,
    /// Minimum 2-meter air temperature, degrees Celsius.
    TemperatureAirMin2m,
    /// Precipitation height, millimeters.
    PrecipitationHeight,
    /// Sunshine duration, hours.
    SunshineDuration,
}

impl Parameter {
    /// Column name in wide-shape frames; also the value of the `parameter`
    /// column in long-shape frames.
    pub fn column_name(&self) -> &'static str {
        match self {
            Parameter::TemperatureAirMean2m => "temperature_air_mean_2m",
            Parameter::TemperatureAirMax2m => "temperature_air_max_2m",
            Parameter::TemperatureAirMin2m => "temperature_air_min_2m",
            Parameter::PrecipitationHeight => "precipitation_height",
            Parameter::SunshineDuration => "sunshine_duration",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

/// Row layout of the values table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Shape {
    /// One row per `(station, date, parameter)` with a single `value` column.
    #[default]
    Long,
    /// One row per `(station, date)` with one column per parameter.
    Wide,
}

/// The requested observation period.
///
/// A bounded period always carries both endpoints; the historical variant
/// spans the provider's entire record. There is deliberately no way to
/// express "from X onwards" with an open end: [`DateSpan::from_bounds`]
/// rejects a partial pair instead of silently widening it to full history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSpan {
    /// The provider's entire historical period.
    Historical,
    /// An inclusive date range.
    Bounded {
        /// First date of the range (inclusive).
        start: NaiveDate,
        /// Last date of the range (inclusive).
        end: NaiveDate,
    },
}

impl DateSpan {
    /// Builds a span from optional endpoints: both absent means
    /// [`DateSpan::Historical`], both present means [`DateSpan::Bounded`].
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::PartialDateSpan`] when exactly one endpoint is
    /// given, and [`QueryError::InvertedDateSpan`] when `end` precedes
    /// `start`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use climate_stripes::DateSpan;
    ///
    /// let full = DateSpan::from_bounds(None, None).unwrap();
    /// assert_eq!(full, DateSpan::Historical);
    ///
    /// let start = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    /// assert!(DateSpan::from_bounds(Some(start), None).is_err());
    /// ```
    pub fn from_bounds(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, QueryError> {
        match (start, end) {
            (None, None) => Ok(DateSpan::Historical),
            (Some(start), Some(end)) => {
                if end < start {
                    return Err(QueryError::InvertedDateSpan { start, end });
                }
                Ok(DateSpan::Bounded { start, end })
            }
            (Some(_), None) => Err(QueryError::PartialDateSpan("start_date")),
            (None, Some(_)) => Err(QueryError::PartialDateSpan("end_date")),
        }
    }

    /// Whether `date` falls inside the span.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            DateSpan::Historical => true,
            DateSpan::Bounded { start, end } => *start <= date && date <= *end,
        }
    }
}

/// Errors raised while constructing a query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("a bounded period needs both endpoints, got only {0}")]
    PartialDateSpan(&'static str),

    #[error("period end {end} precedes start {start}")]
    InvertedDateSpan { start: NaiveDate, end: NaiveDate },
}

/// One provider-side parameter scope: a whole dataset, or a single
/// parameter within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSelector {
    pub resolution: Resolution,
    pub dataset: Dataset,
    /// `None` selects every parameter of the dataset.
    pub parameter: Option<Parameter>,
}

/// A fully specified observation request.
///
/// Built by [`crate::ClimateClient`]; the provider receives it as-is and
/// owns the mapping onto its own wire format.
#[derive(Debug, Clone)]
pub struct ObservationQuery {
    pub resolution: Resolution,
    pub dataset: Dataset,
    /// Explicit parameter scope; empty means the whole dataset.
    pub parameters: Vec<Parameter>,
    /// `None` targets all stations known to the provider.
    pub station_id: Option<String>,
    pub span: DateSpan,
    pub shape: Shape,
}

impl ObservationQuery {
    /// The parameter selectors this query bundles into one request: the
    /// bare dataset when no parameters were given, otherwise one selector
    /// per requested parameter.
    pub fn selectors(&self) -> Vec<ParameterSelector> {
        if self.parameters.is_empty() {
            return vec![ParameterSelector {
                resolution: self.resolution,
                dataset: self.dataset,
                parameter: None,
            }];
        }
        self.parameters
            .iter()
            .map(|&parameter| ParameterSelector {
                resolution: self.resolution,
                dataset: self.dataset,
                parameter: Some(parameter),
            })
            .collect()
    }

    /// The parameters the values table will carry, in provider column order.
    pub fn effective_parameters(&self) -> Vec<Parameter> {
        if self.parameters.is_empty() {
            self.dataset.parameters().to_vec()
        } else {
            self.parameters.clone()
        }
    }

    /// Column names of the values table for this query's shape, in the
    /// order the provider serializes them.
    pub fn value_column_names(&self) -> Vec<&'static str> {
        match self.shape {
            Shape::Long => vec!["station_id", "dataset", "parameter", "date", "value", "quality"],
            Shape::Wide => {
                let mut names = vec!["station_id", "dataset", "date"];
                names.extend(
                    self.effective_parameters()
                        .iter()
                        .map(|p| p.column_name()),
                );
                names
            }
        }
    }
}
