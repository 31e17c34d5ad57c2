//! The composite warming-stripes figure: one colored stripe per calendar
//! year, the raw annual series and a dashed trend line overlaid on a
//! secondary temperature axis, written as a PNG.

use crate::client::ClimateClient;
use crate::error::StripesError;
use crate::provider::ObservationProvider;
use crate::query::{Parameter, Resolution, Shape};
use crate::stripes::colors::{DivergingScale, MISSING_FILL};
use crate::stripes::error::RenderError;
use crate::stripes::series::AnnualSeries;
use crate::stripes::trend::TrendLine;
use log::info;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};

/// File-name suffix of every rendered figure.
pub const PLOT_FILE_SUFFIX: &str = "_warming_stripes_plus_timeseries_and_trend.png";

const DEFAULT_PLOT_DIR: &str = "plots";
const FIGURE_SIZE: (u32, u32) = (1400, 400);
const COPYRIGHT_NOTICE: &str = "© climate-stripes";
const SOURCE_ATTRIBUTION: &str = "Data source: Deutscher Wetterdienst";

/// Renders warming-stripes figures for single stations.
///
/// Uses the given client for the one annual mean-temperature query per
/// render and writes `<station_id>`[`PLOT_FILE_SUFFIX`] into the plot
/// directory, creating the directory first if needed.
pub struct StripePlotter<'a, P> {
    client: &'a ClimateClient<P>,
    plot_dir: PathBuf,
}

impl<'a, P: ObservationProvider> StripePlotter<'a, P> {
    /// Plotter writing into the default `plots` directory.
    pub fn new(client: &'a ClimateClient<P>) -> Self {
        Self::with_plot_dir(client, PathBuf::from(DEFAULT_PLOT_DIR))
    }

    /// Plotter writing into a custom directory.
    pub fn with_plot_dir(client: &'a ClimateClient<P>, plot_dir: PathBuf) -> Self {
        Self { client, plot_dir }
    }

    /// Fetches the station's full annual mean-temperature history and
    /// writes the composite figure.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyData`] (wrapped in [`StripesError`])
    /// when the station yields no observations; nothing is written in that
    /// case. Provider failures propagate unmodified.
    pub async fn render(&self, station_id: &str) -> Result<PathBuf, StripesError> {
        let table = self
            .client
            .fetch()
            .resolution(Resolution::Annual)
            .station_id(station_id)
            .parameters(vec![Parameter::TemperatureAirMean2m])
            .shape(Shape::Wide)
            .call()
            .await?;

        let series =
            AnnualSeries::from_frame(&table, Parameter::TemperatureAirMean2m, station_id)?;
        info!(
            "Rendering {} stripes for station {} ({}..={})",
            series.points().len(),
            station_id,
            series.start_year(),
            series.end_year()
        );

        std::fs::create_dir_all(&self.plot_dir)
            .map_err(|e| StripesError::PlotDirCreation(self.plot_dir.clone(), e))?;
        let path = self
            .plot_dir
            .join(format!("{}{}", station_id, PLOT_FILE_SUFFIX));

        let trend = TrendLine::fit(&series.present_points());
        draw_figure(&series, trend, &path)?;
        info!(
            "Saved warming stripes for station {} to {}",
            station_id,
            path.display()
        );
        Ok(path)
    }
}

fn draw_error(station: &str, error: impl std::fmt::Display) -> RenderError {
    RenderError::Draw {
        station: station.to_string(),
        message: error.to_string(),
    }
}

fn draw_figure(
    series: &AnnualSeries,
    trend: Option<TrendLine>,
    path: &Path,
) -> Result<(), RenderError> {
    let station = &series.station_id;
    let x_lo = series.start_year() as f64;
    let x_hi = series.end_year() as f64 + 1.0;

    // Shared normalization over the batch; None when every year is missing.
    let scale = DivergingScale::from_values(series.present_values());

    let (temp_lo, temp_hi) = match series.value_bounds() {
        Some((lo, hi)) if hi > lo => {
            let pad = (hi - lo) * 0.1;
            (lo - pad, hi + pad)
        }
        Some((value, _)) => (value - 1.0, value + 1.0),
        None => (0.0, 1.0),
    };

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_error(station, e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(18)
        .caption(series.title(), ("sans-serif", 26))
        .x_label_area_size(30)
        .right_y_label_area_size(56)
        .build_cartesian_2d(x_lo..x_hi, 0.0f64..1.0f64)
        .map_err(|e| draw_error(station, e))?
        .set_secondary_coord(x_lo..x_hi, temp_lo..temp_hi);

    // The stripe band encodes only x-position and fill; no primary y axis.
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(10)
        .x_label_formatter(&|year: &f64| format!("{:.0}", year))
        .draw()
        .map_err(|e| draw_error(station, e))?;

    chart
        .configure_secondary_axes()
        .y_desc("temperature [°C]")
        .draw()
        .map_err(|e| draw_error(station, e))?;

    chart
        .draw_series(series.points().iter().map(|point| {
            let fill = scale
                .as_ref()
                .map_or(MISSING_FILL, |scale| scale.color_for(point.value));
            Rectangle::new(
                [(point.year as f64, 0.0), (point.year as f64 + 1.0, 1.0)],
                fill.filled(),
            )
        }))
        .map_err(|e| draw_error(station, e))?;

    let observed = series.present_points();
    chart
        .draw_secondary_series(LineSeries::new(
            observed.iter().copied(),
            BLACK.stroke_width(2),
        ))
        .map_err(|e| draw_error(station, e))?;

    if let Some(trend) = trend {
        let fitted: Vec<(f64, f64)> = observed
            .iter()
            .map(|(year, _)| (*year, trend.value_at(*year)))
            .collect();
        chart
            .draw_secondary_series(DashedLineSeries::new(
                fitted,
                6,
                4,
                BLACK.stroke_width(1),
            ))
            .map_err(|e| draw_error(station, e))?;
    }

    let width = FIGURE_SIZE.0 as i32;
    let height = FIGURE_SIZE.1 as i32;
    let note_font = ("sans-serif", 11).into_font().color(&BLACK.mix(0.65));
    let attribution_font = ("sans-serif", 11)
        .into_font()
        .transform(FontTransform::Rotate270)
        .color(&BLACK.mix(0.65));
    root.draw(&Text::new(
        COPYRIGHT_NOTICE,
        (width - 160, height - 22),
        note_font,
    ))
    .map_err(|e| draw_error(station, e))?;
    root.draw(&Text::new(
        SOURCE_ATTRIBUTION,
        (width - 16, height - 64),
        attribution_font,
    ))
    .map_err(|e| draw_error(station, e))?;

    root.present()
        .map_err(|e| RenderError::PlotFileWrite(path.to_path_buf(), e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProvider;
    use tempfile::tempdir;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    /// Width and height from the PNG IHDR chunk.
    fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
        assert_eq!(&bytes[..8], &PNG_MAGIC, "not a PNG file");
        let width = u32::from_be_bytes(bytes[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(bytes[20..24].try_into().unwrap());
        (width, height)
    }

    #[tokio::test]
    async fn renders_one_png_at_the_deterministic_path() -> Result<(), StripesError> {
        let client = ClimateClient::new(MockProvider::single_station(
            "00001",
            "Aach",
            &[(2000, Some(8.2)), (2001, Some(8.9)), (2002, Some(9.1))],
        ));
        let dir = tempdir().unwrap();
        let plotter = StripePlotter::with_plot_dir(&client, dir.path().to_path_buf());

        let path = plotter.render("00001").await?;

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "00001_warming_stripes_plus_timeseries_and_trend.png"
        );
        let bytes = std::fs::read(&path).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(png_dimensions(&bytes), FIGURE_SIZE);
        Ok(())
    }

    #[tokio::test]
    async fn missing_years_do_not_abort_the_render() -> Result<(), StripesError> {
        let client = ClimateClient::new(MockProvider::single_station(
            "00044",
            "Großenkneten",
            &[(1990, Some(8.4)), (1992, None), (1995, Some(9.0))],
        ));
        let dir = tempdir().unwrap();
        let plotter = StripePlotter::with_plot_dir(&client, dir.path().to_path_buf());

        let path = plotter.render("00044").await?;
        assert!(path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn single_year_station_renders() -> Result<(), StripesError> {
        let client = ClimateClient::new(MockProvider::single_station(
            "00100",
            "Einzeljahr",
            &[(2003, Some(9.7))],
        ));
        let dir = tempdir().unwrap();
        let plotter = StripePlotter::with_plot_dir(&client, dir.path().to_path_buf());

        let path = plotter.render("00100").await?;
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        Ok(())
    }

    #[tokio::test]
    async fn empty_station_raises_and_writes_nothing() {
        let client = ClimateClient::new(MockProvider::empty());
        let dir = tempdir().unwrap();
        let plotter = StripePlotter::with_plot_dir(&client, dir.path().to_path_buf());

        let err = plotter.render("99999").await.unwrap_err();
        assert!(matches!(
            err,
            StripesError::Render(RenderError::EmptyData { ref station_id }) if station_id == "99999"
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn rerender_overwrites_the_same_file_with_same_dimensions(
    ) -> Result<(), StripesError> {
        let client = ClimateClient::new(MockProvider::single_station(
            "00001",
            "Aach",
            &[(2000, Some(8.2)), (2001, Some(8.9)), (2002, Some(9.1))],
        ));
        let dir = tempdir().unwrap();
        let plotter = StripePlotter::with_plot_dir(&client, dir.path().to_path_buf());

        let first = plotter.render("00001").await?;
        let first_dims = png_dimensions(&std::fs::read(&first).unwrap());
        let second = plotter.render("00001").await?;
        let second_dims = png_dimensions(&std::fs::read(&second).unwrap());

        assert_eq!(first, second);
        assert_eq!(first_dims, second_dims);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        Ok(())
    }
}
