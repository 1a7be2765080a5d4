use crate::error::Result;
use crate::models::TransferRecord;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

/// Transfer as handed over by collectors. Field names vary between providers,
/// so every field is optional and the common aliases are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransfer {
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub timestamp: Option<Value>,
    #[serde(default, alias = "from")]
    pub source_address: Option<String>,
    #[serde(default, alias = "to")]
    pub target_address: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub amount_usd: Option<f64>,
}

impl RawTransfer {
    /// Canonical record, or `None` when the transfer cannot be placed in time or
    /// lacks an endpoint or token.
    pub fn normalize(self) -> Option<TransferRecord> {
        let signature = self.signature.unwrap_or_default();

        let timestamp = self
            .block_time
            .and_then(from_unix)
            .or_else(|| self.timestamp.as_ref().and_then(parse_timestamp));
        let Some(timestamp) = timestamp else {
            debug!("Dropping transfer {}: no usable timestamp", signature);
            return None;
        };

        let (Some(source_address), Some(target_address)) = (
            self.source_address.filter(|s| !s.is_empty()),
            self.target_address.filter(|s| !s.is_empty()),
        ) else {
            debug!("Dropping transfer {}: missing source or target", signature);
            return None;
        };

        let Some(token) = self.token.or_else(|| self.token_symbol.clone()) else {
            debug!("Dropping transfer {}: no token", signature);
            return None;
        };

        Some(TransferRecord {
            signature,
            timestamp,
            source_address,
            target_address,
            token,
            token_symbol: self.token_symbol,
            amount: self.amount.unwrap_or(f64::NAN),
            amount_usd: self.amount_usd,
        })
    }
}

fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) or unix seconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|ts| ts.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                    .ok()
                    .map(|naive| Utc.from_utc_datetime(&naive))
            }),
        Value::Number(n) => n.as_i64().and_then(from_unix),
        _ => None,
    }
}

/// Parses a JSON array of raw transfers. Returns the normalized records and how
/// many entries were dropped. Only a document that is not an array is an error;
/// malformed entries are dropped one by one.
pub fn parse_transfers(json: &str) -> Result<(Vec<TransferRecord>, usize)> {
    let raw: Vec<Value> = serde_json::from_str(json)?;
    Ok(normalize_values(raw))
}

pub fn normalize_values(raw: Vec<Value>) -> (Vec<TransferRecord>, usize) {
    let total = raw.len();
    let records: Vec<TransferRecord> = raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<RawTransfer>(value) {
            Ok(transfer) => transfer.normalize(),
            Err(e) => {
                debug!("Dropping malformed transfer: {}", e);
                None
            }
        })
        .collect();
    let dropped = total - records.len();

    if dropped > 0 {
        warn!("Dropped {} of {} transfers during normalization", dropped, total);
    }

    (records, dropped)
}
