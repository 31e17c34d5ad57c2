//! The main entry point for fetching merged observation tables from a
//! provider. Queries are assembled with a builder in the same style as the
//! rest of the crate and executed against any [`ObservationProvider`].

use crate::aggregate::merge_observations;
use crate::error::StripesError;
use crate::provider::ObservationProvider;
use crate::query::{DateSpan, Dataset, ObservationQuery, Parameter, Resolution, Shape};
use bon::bon;
use chrono::NaiveDate;
use log::info;
use polars::frame::DataFrame;

/// Client tying one [`ObservationProvider`] to the aggregation step.
///
/// The provider is a type parameter rather than a trait object so tests can
/// plug in an in-memory source without touching the downstream pipeline.
///
/// # Examples
///
/// ```no_run
/// # use climate_stripes::{ClimateClient, DwdObservations, Resolution, Shape, StripesError};
/// # async fn run() -> Result<(), StripesError> {
/// let client = ClimateClient::new(DwdObservations::new());
/// let table = client
///     .fetch()
///     .resolution(Resolution::Annual)
///     .station_id("00001")
///     .shape(Shape::Wide)
///     .call()
///     .await?;
/// println!("{}", table);
/// # Ok(())
/// # }
/// ```
pub struct ClimateClient<P> {
    provider: P,
}

#[bon]
impl<P: ObservationProvider> ClimateClient<P> {
    /// Creates a client over the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Fetches the merged observation table for one logical query.
    ///
    /// # Arguments
    ///
    /// * `.resolution(Resolution)`: **Required.** Temporal granularity.
    /// * `.station_id(&str)`: Optional. Restricts the request to exactly
    ///   that station; without it the request targets all stations known to
    ///   the provider.
    /// * `.start_date(NaiveDate)` / `.end_date(NaiveDate)`: Optional, but
    ///   only valid as a pair; a bounded period is requested when both are
    ///   given, the provider's full historical period when neither is.
    ///   Supplying exactly one is an error rather than a silent fallback.
    /// * `.parameters(Vec<Parameter>)`: Optional. Empty or absent queries
    ///   the whole dataset; otherwise one selector per parameter is bundled
    ///   into a single request.
    /// * `.dataset(Dataset)`: Optional. Defaults to
    ///   [`Dataset::ClimateSummary`].
    /// * `.shape(Shape)`: Optional. Defaults to [`Shape::Long`].
    ///
    /// # Errors
    ///
    /// Provider failures (network, HTTP status, parsing) propagate
    /// unmodified. An empty but well-formed result is returned as an empty
    /// table, not an error.
    #[builder]
    pub async fn fetch(
        &self,
        resolution: Resolution,
        station_id: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        parameters: Option<Vec<Parameter>>,
        dataset: Option<Dataset>,
        shape: Option<Shape>,
    ) -> Result<DataFrame, StripesError> {
        let query = ObservationQuery {
            resolution,
            dataset: dataset.unwrap_or_default(),
            parameters: parameters.unwrap_or_default(),
            station_id: station_id.map(str::to_string),
            span: DateSpan::from_bounds(start_date, end_date)?,
            shape: shape.unwrap_or_default(),
        };
        self.fetch_query(&query).await
    }

    /// Executes a fully assembled [`ObservationQuery`].
    pub async fn fetch_query(&self, query: &ObservationQuery) -> Result<DataFrame, StripesError> {
        let meta = self.provider.fetch_stations(query).await?;
        let values = self.provider.fetch_values(query).await?;
        info!(
            "Merging {} value rows with {} station rows",
            values.height(),
            meta.height()
        );
        Ok(merge_observations(values, meta)?)
    }
}
