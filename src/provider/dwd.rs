//! HTTP implementation of [`ObservationProvider`] against the DWD bulk
//! mirror: gzip-compressed JSON for station metadata, headerless
//! gzip-compressed CSV for values.

use crate::provider::station::{stations_to_frame, StationRecord};
use crate::provider::{ObservationProvider, ProviderError};
use crate::query::{DateSpan, ObservationQuery, Shape};
use async_compression::tokio::bufread::GzipDecoder;
use async_trait::async_trait;
use futures_util::TryStreamExt;
use log::{info, warn};
use polars::frame::DataFrame;
use polars::prelude::*;
use reqwest::Client;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::io::{AsyncReadExt, BufReader};
use tokio::task;
use tokio_util::io::StreamReader;

const DEFAULT_BASE_URL: &str = "https://bulk.wetterdienst.eu/v1";

/// Bulk-mirror observation provider.
///
/// One values file exists per `(resolution, dataset, shape, station)`;
/// parameter and date-span scoping is applied locally after download, so a
/// query costs exactly two HTTP requests.
pub struct DwdObservations {
    base_url: String,
    download_client: Client,
}

impl DwdObservations {
    /// Creates a provider against the default bulk mirror.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a provider against a custom mirror, e.g. a local fixture
    /// server in integration tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            download_client: Client::new(),
        }
    }

    fn stations_url(&self, query: &ObservationQuery) -> String {
        format!(
            "{}/{}/{}/stations.json.gz",
            self.base_url,
            query.resolution.path_segment(),
            query.dataset.path_segment(),
        )
    }

    fn values_url(&self, query: &ObservationQuery) -> String {
        let shape_segment = match query.shape {
            Shape::Long => "long",
            Shape::Wide => "wide",
        };
        format!(
            "{}/{}/{}/{}/{}.csv.gz",
            self.base_url,
            query.resolution.path_segment(),
            query.dataset.path_segment(),
            shape_segment,
            query.station_id.as_deref().unwrap_or("all"),
        )
    }

    /// Downloads and decompresses one bulk file.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        info!("Downloading data from {}", url);

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    ProviderError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    ProviderError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let stream = response
            .bytes_stream()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e));
        let stream_reader = StreamReader::new(stream);
        let mut decoder = GzipDecoder::new(BufReader::new(stream_reader));
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed).await?;
        info!("Downloaded and decompressed {} bytes", decompressed.len());
        Ok(decompressed)
    }

    /// Parses raw headerless CSV bytes into a DataFrame using a blocking
    /// task, assigning the schema column names for the queried shape.
    ///
    /// Every field is read as a string; [`Self::type_columns`] applies the
    /// real dtypes afterwards. Inference would mangle zero-padded station
    /// ids ("00001" is not the number 1). An empty file is a valid empty
    /// result, not an error.
    async fn csv_to_dataframe(
        bytes: Vec<u8>,
        station: String,
        schema_names: Vec<&'static str>,
    ) -> Result<DataFrame, ProviderError> {
        task::spawn_blocking(move || {
            if bytes.is_empty() {
                let columns = schema_names
                    .iter()
                    .map(|name| {
                        Series::new_empty((*name).into(), &DataType::String).into_column()
                    })
                    .collect();
                return Ok(DataFrame::new(columns)?);
            }

            let mut temp_file = NamedTempFile::new().map_err(|e| ProviderError::CsvReadIo {
                station: station.clone(),
                source: e,
            })?;
            temp_file
                .write_all(&bytes)
                .map_err(|e| ProviderError::CsvReadIo {
                    station: station.clone(),
                    source: e,
                })?;
            temp_file.flush().map_err(|e| ProviderError::CsvReadIo {
                station: station.clone(),
                source: e,
            })?;

            let mut df = CsvReadOptions::default()
                .with_has_header(false)
                .with_infer_schema_length(Some(0))
                .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
                .map_err(|e| ProviderError::CsvReadPolars {
                    station: station.clone(),
                    source: e,
                })?
                .finish()
                .map_err(|e| ProviderError::CsvReadPolars {
                    station: station.clone(),
                    source: e,
                })?;

            if df.width() != schema_names.len() {
                warn!(
                    "CSV column count ({}) does not match schema length ({}) for station {}",
                    df.width(),
                    schema_names.len(),
                    station
                );
                return Err(ProviderError::SchemaMismatch {
                    station,
                    expected: schema_names.len(),
                    found: df.width(),
                });
            }

            df.set_column_names(schema_names.iter().copied())
                .map_err(|e| ProviderError::CsvReadPolars {
                    station: station.clone(),
                    source: e,
                })?;

            Ok(df)
        })
        .await?
    }

    /// Applies the wire dtypes to a string-only frame: ISO dates, float
    /// readings, integer quality flags. Identifier and label columns stay
    /// strings.
    fn type_columns(df: DataFrame, query: &ObservationQuery) -> Result<DataFrame, ProviderError> {
        let date_options = StrptimeOptions {
            format: Some("%Y-%m-%d".into()),
            ..Default::default()
        };
        let mut lf = df
            .lazy()
            .with_column(col("date").str().to_date(date_options));
        lf = match query.shape {
            Shape::Long => lf
                .with_column(col("value").cast(DataType::Float64))
                .with_column(col("quality").cast(DataType::Int32)),
            Shape::Wide => lf.with_columns(
                query
                    .dataset
                    .parameters()
                    .iter()
                    .map(|p| col(p.column_name()).cast(DataType::Float64))
                    .collect::<Vec<_>>(),
            ),
        };
        Ok(lf.collect()?)
    }

    /// Applies the query's parameter selection and date span to a freshly
    /// parsed values frame. The bulk file carries the whole dataset; the
    /// query narrows it.
    fn scope_values(df: DataFrame, query: &ObservationQuery) -> Result<DataFrame, ProviderError> {
        let mut lf = df.lazy();

        if let DateSpan::Bounded { start, end } = query.span {
            lf = lf.filter(
                col("date")
                    .cast(DataType::Date)
                    .gt_eq(lit(start))
                    .and(col("date").cast(DataType::Date).lt_eq(lit(end))),
            );
        }

        // One selector per requested parameter; a bare-dataset selector
        // leaves the file unscoped.
        let scoped: Vec<_> = query
            .selectors()
            .iter()
            .filter_map(|selector| selector.parameter)
            .collect();
        if !scoped.is_empty() {
            match query.shape {
                Shape::Wide => {
                    let mut keep = vec![col("station_id"), col("dataset"), col("date")];
                    keep.extend(scoped.iter().map(|p| col(p.column_name())));
                    lf = lf.select(keep);
                }
                Shape::Long => {
                    let mut wanted = lit(false);
                    for parameter in &scoped {
                        wanted = wanted.or(col("parameter").eq(lit(parameter.column_name())));
                    }
                    lf = lf.filter(wanted);
                }
            }
        }

        Ok(lf.collect()?)
    }

    /// Full-dataset column names of the bulk file for this query's shape.
    fn file_column_names(query: &ObservationQuery) -> Vec<&'static str> {
        let whole_dataset = ObservationQuery {
            parameters: vec![],
            ..query.clone()
        };
        whole_dataset.value_column_names()
    }
}

impl Default for DwdObservations {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObservationProvider for DwdObservations {
    async fn fetch_stations(
        &self,
        query: &ObservationQuery,
    ) -> Result<DataFrame, ProviderError> {
        let url = self.stations_url(query);
        let bytes = self.download(&url).await?;

        let records = task::spawn_blocking(move || {
            serde_json::from_slice::<Vec<StationRecord>>(&bytes)
        })
        .await?
        .map_err(|e| ProviderError::MetadataParse { url, source: e })?;

        let records: Vec<StationRecord> = match query.station_id.as_deref() {
            Some(id) => records.into_iter().filter(|r| r.station_id == id).collect(),
            None => records,
        };
        info!("Station listing matched {} stations", records.len());

        Ok(stations_to_frame(
            &records,
            query.dataset.path_segment(),
        )?)
    }

    async fn fetch_values(&self, query: &ObservationQuery) -> Result<DataFrame, ProviderError> {
        let url = self.values_url(query);
        let station_label = query
            .station_id
            .clone()
            .unwrap_or_else(|| "all".to_string());

        let bytes = self.download(&url).await?;
        let df = Self::csv_to_dataframe(bytes, station_label, Self::file_column_names(query))
            .await?;
        let df = Self::type_columns(df, query)?;
        Self::scope_values(df, query)
    }
}
