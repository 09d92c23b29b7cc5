use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),
}
