use crate::error::{Error, Result};
use crate::ingest::{normalize_values, parse_transfers};
use crate::models::TransferRecord;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use futures::future::try_join_all;
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;

/// Anything that can hand the detector a batch of transfers. Sources are built by
/// the caller and passed in; none of them substitutes another on failure.
#[async_trait]
pub trait TransferSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<TransferRecord>>;
}

/// Reads a JSON array of transfers from disk.
pub struct JsonFileSource {
    path: PathBuf,
    name: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = format!("file:{}", path.display());
        JsonFileSource { path, name }
    }
}

#[async_trait]
impl TransferSource for JsonFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self) -> Result<Vec<TransferRecord>> {
        let data = tokio::fs::read_to_string(&self.path).await?;
        let (records, dropped) = parse_transfers(&data)?;
        info!(
            "Loaded {} transfers from {} ({} dropped)",
            records.len(),
            self.path.display(),
            dropped
        );
        Ok(records)
    }
}

/// GETs a JSON array of transfers from an endpoint.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        HttpSource {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl TransferSource for HttpSource {
    fn name(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<TransferRecord>> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Source {
                source_name: self.url.clone(),
                message: format!("unexpected status {}", status),
            });
        }

        let raw: Vec<serde_json::Value> = response.json().await?;
        let (records, dropped) = normalize_values(raw);
        info!(
            "Fetched {} transfers from {} ({} dropped)",
            records.len(),
            self.url,
            dropped
        );
        Ok(records)
    }
}

/// Symbols and mints used by the generator.
const SYNTHETIC_TOKENS: [(&str, &str); 4] = [
    ("So11111111111111111111111111111111111111112", "SOL"),
    ("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v", "USDC"),
    ("DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263", "BONK"),
    ("JUPyiwrYJFskUPiHa7hheR8VutAXYK46gAEhFbm8Jr9P", "JUP"),
];

/// Default generator start, 2024-01-01T00:00:00Z.
pub const SYNTHETIC_START_UNIX: i64 = 1_704_067_200;

const BASE58: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Seeded mock data: a number of dusting bursts plus ordinary noise transfers.
/// The same seed and start always produce the same batch.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    pub seed: u64,
    pub campaigns: usize,
    pub noise: usize,
    pub start: DateTime<Utc>,
}

impl SyntheticSource {
    pub fn new(seed: u64, campaigns: usize, noise: usize, start: DateTime<Utc>) -> Self {
        SyntheticSource {
            seed,
            campaigns,
            noise,
            start,
        }
    }

    /// Starts at [`SYNTHETIC_START_UNIX`], so the seed alone picks the batch.
    pub fn from_seed(seed: u64, campaigns: usize, noise: usize) -> Self {
        let start = Utc
            .timestamp_opt(SYNTHETIC_START_UNIX, 0)
            .single()
            .unwrap_or_default();
        SyntheticSource::new(seed, campaigns, noise, start)
    }

    pub fn generate(&self) -> Vec<TransferRecord> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut transfers = Vec::new();

        for _ in 0..self.campaigns {
            let source = random_address(&mut rng);
            let (mint, symbol) = SYNTHETIC_TOKENS[rng.gen_range(0..SYNTHETIC_TOKENS.len())];
            let targets = rng.gen_range(12..=180);
            let mut ts = self.start + Duration::minutes(rng.gen_range(0..60 * 24 * 7));

            for _ in 0..targets {
                ts = ts + Duration::seconds(rng.gen_range(5..1800));
                let amount = rng.gen_range(0.000_001..0.000_9);
                transfers.push(TransferRecord {
                    signature: random_signature(&mut rng),
                    timestamp: ts,
                    source_address: source.clone(),
                    target_address: random_address(&mut rng),
                    token: mint.to_string(),
                    token_symbol: Some(symbol.to_string()),
                    amount,
                    amount_usd: rng.gen_bool(0.7).then(|| amount * 20.0),
                });
            }
        }

        for _ in 0..self.noise {
            let (mint, symbol) = SYNTHETIC_TOKENS[rng.gen_range(0..SYNTHETIC_TOKENS.len())];
            let amount = rng.gen_range(0.5..250.0);
            transfers.push(TransferRecord {
                signature: random_signature(&mut rng),
                timestamp: self.start + Duration::seconds(rng.gen_range(0..60 * 60 * 24 * 7)),
                source_address: random_address(&mut rng),
                target_address: random_address(&mut rng),
                token: mint.to_string(),
                token_symbol: Some(symbol.to_string()),
                amount,
                amount_usd: Some(amount * 20.0),
            });
        }

        transfers
    }
}

fn random_base58(rng: &mut StdRng, len: usize) -> String {
    (0..len)
        .map(|_| BASE58[rng.gen_range(0..BASE58.len())] as char)
        .collect()
}

fn random_address(rng: &mut StdRng) -> String {
    random_base58(rng, 44)
}

fn random_signature(rng: &mut StdRng) -> String {
    random_base58(rng, 88)
}

#[async_trait]
impl TransferSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    async fn fetch(&self) -> Result<Vec<TransferRecord>> {
        let transfers = self.generate();
        debug!(
            "Generated {} synthetic transfers (seed {})",
            transfers.len(),
            self.seed
        );
        Ok(transfers)
    }
}

/// Fetches every source concurrently and concatenates the batches in source order.
pub async fn collect_all(sources: &[Box<dyn TransferSource>]) -> Result<Vec<TransferRecord>> {
    let batches = try_join_all(sources.iter().map(|s| async move {
        let batch = s.fetch().await?;
        debug!("Source {} returned {} transfers", s.name(), batch.len());
        Ok::<_, Error>(batch)
    }))
    .await?;

    Ok(batches.into_iter().flatten().collect())
}
