use crate::dusting::summarize;
use crate::error::Result;
use crate::models::{Campaign, CampaignSummary, TargetCategory};
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use csv::Writer;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    /// `dusting_campaigns.<ext>` for this format.
    pub fn default_path(&self) -> PathBuf {
        PathBuf::from(format!("{}.{}", DATASET_NAME, self.extension()))
    }
}

/// Flat CSV row: one per campaign, category counts spread over columns.
#[derive(Debug, Serialize)]
pub struct CampaignCsv {
    pub id: String,
    pub source_address: String,
    pub token_symbol: String,
    pub start_time: String,
    pub end_time: String,
    pub transfer_count: usize,
    pub unique_target_count: usize,
    pub total_value_usd: f64,
    pub exchange_targets: usize,
    pub defi_targets: usize,
    pub nft_targets: usize,
    pub whale_targets: usize,
    pub regular_targets: usize,
}

impl From<&Campaign> for CampaignCsv {
    fn from(c: &Campaign) -> Self {
        CampaignCsv {
            id: c.id.clone(),
            source_address: c.source_address.clone(),
            token_symbol: c.token_symbol.clone(),
            start_time: c.start_time.to_rfc3339(),
            end_time: c.end_time.to_rfc3339(),
            transfer_count: c.transfer_count,
            unique_target_count: c.unique_target_count,
            total_value_usd: c.total_value_usd,
            exchange_targets: c.addresses_in(TargetCategory::Exchange),
            defi_targets: c.addresses_in(TargetCategory::Defi),
            nft_targets: c.addresses_in(TargetCategory::Nft),
            whale_targets: c.addresses_in(TargetCategory::Whale),
            regular_targets: c.addresses_in(TargetCategory::Regular),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignExport<'a> {
    pub dataset_name: &'a str,
    pub generated_at: DateTime<Utc>,
    pub summary: CampaignSummary,
    pub data: &'a [Campaign],
}

pub const DATASET_NAME: &str = "dusting_campaigns";

pub fn export_campaigns<P: AsRef<Path>>(
    campaigns: &[Campaign],
    format: ExportFormat,
    path: P,
) -> Result<()> {
    match format {
        ExportFormat::Csv => export_campaigns_csv(campaigns, &path)?,
        ExportFormat::Json => export_campaigns_json(campaigns, &path)?,
    }
    info!(
        "Exported {} campaign(s) as {:?} to {}",
        campaigns.len(),
        format,
        path.as_ref().display()
    );
    Ok(())
}

pub fn export_campaigns_csv<P: AsRef<Path>>(campaigns: &[Campaign], path: P) -> Result<()> {
    let mut wtr = Writer::from_path(path)?;
    for c in campaigns {
        wtr.serialize(CampaignCsv::from(c))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_campaigns_json<P: AsRef<Path>>(campaigns: &[Campaign], path: P) -> Result<()> {
    let export = CampaignExport {
        dataset_name: DATASET_NAME,
        generated_at: Utc::now(),
        summary: summarize(campaigns),
        data: campaigns,
    };
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, &export)?;
    Ok(())
}
