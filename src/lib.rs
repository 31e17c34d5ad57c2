//! Fetch annual station observations from an observational-data provider
//! and render "warming stripes" charts: one colored stripe per calendar
//! year on a diverging blue↔red scale, overlaid with the raw series and a
//! least-squares trend line.
//!
//! The provider sits behind the [`ObservationProvider`] trait;
//! [`DwdObservations`] is the bundled HTTP implementation and tests swap in
//! an in-memory source. The library never configures logging; it emits
//! through the `log` facade and the embedding process installs a handler.
//!
//! # Examples
//!
//! ```no_run
//! use climate_stripes::{ClimateClient, DwdObservations, StripePlotter, StripesError};
//!
//! # async fn run() -> Result<(), StripesError> {
//! let client = ClimateClient::new(DwdObservations::new());
//! let plotter = StripePlotter::new(&client);
//! let path = plotter.render("00001").await?;
//! println!("wrote {}", path.display());
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod client;
mod error;
pub mod provider;
mod query;
mod stripes;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::merge_observations;
pub use client::ClimateClient;
pub use error::StripesError;

pub use provider::dwd::DwdObservations;
pub use provider::station::{stations_to_frame, StationRecord};
pub use provider::{ObservationProvider, ProviderError};

pub use query::{
    DateSpan, Dataset, ObservationQuery, Parameter, ParameterSelector, QueryError, Resolution,
    Shape,
};

pub use stripes::colors::{DivergingScale, MISSING_FILL};
pub use stripes::render::{StripePlotter, PLOT_FILE_SUFFIX};
pub use stripes::series::{AnnualSeries, YearValue};
pub use stripes::trend::TrendLine;
pub use stripes::RenderError;
