use thiserror::Error;

/// A threshold that failed validation, with the offending value.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid threshold `{field}`: {value} (must be positive)")]
pub struct ConfigurationError {
    pub field: &'static str,
    pub value: f64,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("source `{source_name}` failed: {message}")]
    Source {
        source_name: String,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
