use crate::provider::ProviderError;
use crate::query::QueryError;
use crate::stripes::RenderError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StripesError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to create plot directory '{0}'")]
    PlotDirCreation(PathBuf, #[source] std::io::Error),
}
