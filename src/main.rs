use chrono::{DateTime, Utc};
use clap::Parser;
use dust_analyzer::{
    config::load_thresholds,
    dusting::{detect_from_sources, summarize},
    export::{export_campaigns, ExportFormat},
    models::DustingThresholds,
    source::{HttpSource, JsonFileSource, SyntheticSource, TransferSource},
};
use log::{info, warn};
use std::path::PathBuf;

/// Detect dusting campaigns in token transfer batches
#[derive(Debug, Parser)]
#[command(name = "dust_analyzer")]
struct Cli {
    /// JSON file with an array of transfers (repeatable)
    #[arg(long = "input")]
    inputs: Vec<PathBuf>,

    /// Endpoint returning a JSON array of transfers
    #[arg(long)]
    url: Option<String>,

    /// Add seeded synthetic transfers
    #[arg(long)]
    synthetic: bool,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value_t = 5)]
    synthetic_campaigns: usize,

    #[arg(long, default_value_t = 200)]
    noise: usize,

    /// RFC 3339 start of the synthetic batch (default 2024-01-01T00:00:00Z)
    #[arg(long)]
    start: Option<DateTime<Utc>>,

    /// JSON file with detection thresholds
    #[arg(long)]
    thresholds: Option<PathBuf>,

    #[arg(long)]
    max_dust_native: Option<f64>,

    #[arg(long)]
    max_dust_usd: Option<f64>,

    #[arg(long)]
    min_targets: Option<usize>,

    #[arg(long)]
    max_gap_hours: Option<f64>,

    #[arg(long, value_enum, default_value = "json")]
    format: ExportFormat,

    /// Defaults to dusting_campaigns.<format>
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn resolve_thresholds(&self) -> Result<DustingThresholds, Box<dyn std::error::Error>> {
        let mut thresholds = match &self.thresholds {
            Some(path) => load_thresholds(path)?,
            None => DustingThresholds::default(),
        };

        if let Some(v) = self.max_dust_native {
            thresholds.max_dust_value_native = v;
        }
        if let Some(v) = self.max_dust_usd {
            thresholds.max_dust_value_usd = v;
        }
        if let Some(v) = self.min_targets {
            thresholds.min_campaign_targets = v;
        }
        if let Some(v) = self.max_gap_hours {
            thresholds.max_cluster_gap_hours = v;
        }

        thresholds.validate()?;
        Ok(thresholds)
    }

    fn sources(&self) -> Vec<Box<dyn TransferSource>> {
        let mut sources: Vec<Box<dyn TransferSource>> = Vec::new();

        for path in &self.inputs {
            sources.push(Box::new(JsonFileSource::new(path)));
        }
        if let Some(url) = &self.url {
            sources.push(Box::new(HttpSource::new(reqwest::Client::new(), url)));
        }
        if self.synthetic {
            let synthetic = match self.start {
                Some(start) => {
                    SyntheticSource::new(self.seed, self.synthetic_campaigns, self.noise, start)
                }
                None => SyntheticSource::from_seed(self.seed, self.synthetic_campaigns, self.noise),
            };
            sources.push(Box::new(synthetic));
        }

        sources
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();
    let thresholds = cli.resolve_thresholds()?;

    let sources = cli.sources();
    if sources.is_empty() {
        return Err("no transfer source given: use --input, --url or --synthetic".into());
    }

    let campaigns = detect_from_sources(&sources, &thresholds).await?;
    if campaigns.is_empty() {
        warn!("No dusting campaigns found");
    }

    let summary = summarize(&campaigns);
    info!(
        "{} campaign(s) from {} source address(es), {} transfers, ${:.4} total",
        summary.campaign_count, summary.source_count, summary.transfer_count, summary.total_value_usd
    );

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.format.default_path());
    export_campaigns(&campaigns, cli.format, &output)?;

    Ok(())
}
