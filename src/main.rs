use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use urbanretail::{
    NearbySite, SiteConfig, TimePeriod, UrbanDynamicsPredictor, UrbanRetailConfig,
    api::AppState,
    dynamics::PredictionRequest,
    models::{DesignStyle, PriceTier},
    telemetry, web,
};

/// Urban retail site forecasting
#[derive(Debug, Parser)]
#[command(name = "urbanretail", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Forecast a single site and print it as JSON
    Predict {
        /// Coordinates as "lat,lon"
        #[arg(long)]
        coords: String,
        /// Time-of-day context, e.g. "Lunch Break"
        #[arg(long, default_value = "Lunch Break")]
        period: String,
        /// The site is an existing shop rather than a simulated one
        #[arg(long)]
        existing: bool,
        /// Floor area of a simulated site in square meters
        #[arg(long)]
        area: Option<f64>,
        /// Design style of a simulated site
        #[arg(long)]
        style: Option<String>,
        /// Price tier of a simulated site
        #[arg(long)]
        price: Option<String>,
        /// JSON file with a list of nearby sites
        #[arg(long)]
        sites: Option<PathBuf>,
    },
    /// Serve the JSON API
    Serve {
        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_nearby_sites(path: Option<&PathBuf>) -> Result<Vec<NearbySite>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read sites file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse sites file {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = UrbanRetailConfig::load_from_path(cli.config.clone())?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    telemetry::init_tracing(&config.logging);

    if config.reasoning.api_key.is_none() {
        warn!("No reasoning API key configured; forecasts will use the heuristic");
    }

    let predictor = UrbanDynamicsPredictor::from_config(&config)?;
    info!(
        "Spatial gravity centre at {}",
        predictor.baseline_model().center()
    );

    match cli.command {
        Command::Predict {
            coords,
            period,
            existing,
            area,
            style,
            price,
            sites,
        } => {
            let nearby_sites = load_nearby_sites(sites.as_ref())?;
            let site_config = (area.is_some() || style.is_some() || price.is_some()).then(|| {
                SiteConfig::new(
                    area.unwrap_or(urbanretail::models::site::DEFAULT_AREA_SQM),
                    style.as_deref().map(DesignStyle::from_label),
                    price
                        .as_deref()
                        .map(PriceTier::from_label)
                        .unwrap_or_default(),
                )
            });
            let time_period = TimePeriod::from_label(&period);

            let report = predictor
                .predict_detailed(PredictionRequest {
                    coords: &coords,
                    time_period: &time_period,
                    nearby_sites: &nearby_sites,
                    is_existing_shop: existing,
                    config: site_config.as_ref(),
                })
                .await;

            info!(
                "Baseline {} pax/hr at {:.0} m from centre",
                report.baseline.traffic, report.baseline.distance_meters
            );
            info!(
                source = ?report.forecast.source,
                "Forecast {} per month, payback in {}",
                report.forecast.format_revenue(),
                report.forecast.format_payback()
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Serve { port } => {
            let port = port.unwrap_or(config.server.port);
            let request_timeout =
                Duration::from_secs(u64::from(config.reasoning.timeout_seconds) + 10);
            let state = Arc::new(AppState {
                predictor,
                selection: config.selection.clone(),
            });
            web::run(state, port, request_timeout).await?;
        }
    }

    Ok(())
}
