/// # Modules Overview
///
/// This crate detects dusting campaigns in batches of token transfers: many
/// near-zero transfers sent from one source to many targets in a short window.
/// It contains the detector itself, transfer ingestion and sources, threshold
/// configuration, and exporters for the detected campaigns.

/// `dusting`
///
/// Contains the campaign detector. `detect` filters dust transfers, groups them by
/// source address and token, splits each group into time-windowed clusters and
/// turns every large enough cluster into a `Campaign` with target category
/// breakdowns. `summarize` aggregates a list of campaigns for reporting.
///
/// Example usage:
/// ```rust,ignore
/// let campaigns = dusting::detect(&transfers, &DustingThresholds::default())?;
/// let summary = dusting::summarize(&campaigns);
/// ```
pub mod dusting;

pub mod config;

pub mod error;

/// `export`
///
/// Writes detected campaigns to CSV (one flattened row per campaign) or to a JSON
/// document carrying a summary next to the campaign list.
///
/// Example usage:
/// ```rust,ignore
/// export::export_campaigns(&campaigns, ExportFormat::Csv, "campaigns.csv")?;
/// ```
pub mod export;

/// `ingest`
///
/// Normalizes collector-shaped JSON transfers (`blockTime` or `timestamp`,
/// `from`/`to` aliases, optional symbols and values) into `TransferRecord`s.
pub mod ingest;

/// `models`
///
/// Defines the data structures shared across the crate:
/// * `TransferRecord` – one observed token transfer.
/// * `DustingThresholds` – detection configuration.
/// * `Campaign` and `TargetGroup` – detector output.
/// * `CampaignSummary` – aggregate over a set of campaigns.
pub mod models;

/// `source`
///
/// The `TransferSource` trait and its implementations: JSON files, an HTTP
/// endpoint, and a seeded synthetic generator for demos and tests.
///
/// Example usage:
/// ```rust,ignore
/// let sources: Vec<Box<dyn TransferSource>> = vec![Box::new(JsonFileSource::new("transfers.json"))];
/// let transfers = source::collect_all(&sources).await?;
/// ```
pub mod source;

pub use dusting::{detect, summarize};
pub use error::{ConfigurationError, Error, Result};
pub use models::{Campaign, DustingThresholds, TargetCategory, TargetGroup, TransferRecord};
