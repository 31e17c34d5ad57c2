//! Command-line entry point: render the warming-stripes figure for one
//! station.

use clap::Parser;
use climate_stripes::{ClimateClient, DwdObservations, StripePlotter};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "climate-stripes",
    version,
    about = "Render a warming-stripes chart with trend line for a weather station"
)]
struct Cli {
    /// Station identifier as known to the data provider (e.g. "00001").
    station_id: String,

    /// Directory the PNG is written into.
    #[arg(long, default_value = "plots")]
    plot_dir: PathBuf,

    /// Override the provider's base URL (e.g. a local mirror).
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let provider = match &cli.base_url {
        Some(url) => DwdObservations::with_base_url(url),
        None => DwdObservations::new(),
    };
    let client = ClimateClient::new(provider);
    let plotter = StripePlotter::with_plot_dir(&client, cli.plot_dir);

    let path = plotter.render(&cli.station_id).await?;
    println!("{}", path.display());
    Ok(())
}
