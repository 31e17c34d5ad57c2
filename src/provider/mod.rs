//! The observation-data source behind a narrow capability seam.
//!
//! Aggregation and rendering only ever see [`ObservationProvider`]; the
//! bundled [`dwd::DwdObservations`] implementation talks to the bulk HTTP
//! mirror, and tests substitute an in-memory provider.

pub mod dwd;
mod error;
pub mod station;

pub use error::ProviderError;

use crate::query::ObservationQuery;
use async_trait::async_trait;
use polars::frame::DataFrame;

/// A source of observational data, queried once per run.
///
/// Both tables are returned for the same query: `fetch_stations` yields the
/// station-metadata table (one row per matching station), `fetch_values`
/// the values table (one row per observation). Failures propagate to the
/// caller unmodified; an empty but well-formed table is a valid result.
#[async_trait]
pub trait ObservationProvider: Send + Sync {
    /// The station-metadata table for the stations the query matches.
    async fn fetch_stations(&self, query: &ObservationQuery)
        -> Result<DataFrame, ProviderError>;

    /// The values table for the query's resolution, parameter selection,
    /// station scope and date span.
    async fn fetch_values(&self, query: &ObservationQuery) -> Result<DataFrame, ProviderError>;
}
