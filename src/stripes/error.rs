use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    /// The aggregator returned zero rows, e.g. for an unknown station.
    /// Raised before any min/max or drawing call so the condition is
    /// named instead of surfacing as a numeric error downstream.
    #[error("No observations returned for station '{station_id}'")]
    EmptyData { station_id: String },

    #[error("Required column '{0}' not found in observation table")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to draw chart for station '{station}': {message}")]
    Draw { station: String, message: String },

    #[error("Failed to write plot file '{0}': {1}")]
    PlotFileWrite(PathBuf, String),
}
