use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use entsoe_ingest::{
    DataCategory, IngestConfig, Ingestor, RegionTable, TimeRange, TransparencyClient,
    DEFAULT_BASE_URL,
};
use std::path::PathBuf;

/// Data ingestion for energy forecasting: downloads actual load and
/// generation per region from the ENTSO-E transparency platform.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Start date of the data to download, format: YYYY-MM-DD
    #[arg(long = "start_time", default_value = "2023-01-01")]
    start_time: NaiveDate,

    /// End date (exclusive) of the data to download, format: YYYY-MM-DD
    #[arg(long = "end_time", default_value = "2023-01-02")]
    end_time: NaiveDate,

    /// Directory the CSV files are written to
    #[arg(long = "output_path", default_value = "./data")]
    output_path: PathBuf,

    /// Transparency platform API token
    #[arg(long = "security_token", env = "ENTSOE_SECURITY_TOKEN", hide_env_values = true)]
    security_token: String,

    /// Comma-separated region codes, e.g. HU,IT,PO [default: HU,IT,PO]
    #[arg(long = "regions", value_delimiter = ',')]
    regions: Vec<String>,

    #[arg(long = "base_url", env = "ENTSOE_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Do not draw progress bars
    #[arg(long = "no_progress")]
    no_progress: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    let regions = if args.regions.is_empty() {
        RegionTable::default()
    } else {
        RegionTable::from_codes(&args.regions)?
    };
    let range = TimeRange::from_dates(args.start_time, args.end_time)
        .context("Invalid --start_time/--end_time")?;

    let config = IngestConfig::builder()
        .base_url(args.base_url)
        .security_token(args.security_token)
        .regions(regions)
        .show_progress(!args.no_progress)
        .build();
    let client = TransparencyClient::new(&config)?;
    let ingestor = Ingestor::new(client, config);

    for category in [DataCategory::Load, DataCategory::Generation] {
        ingestor
            .run(category, &range, &args.output_path)
            .with_context(|| format!("{} ingestion failed", category))?;
    }

    Ok(())
}
