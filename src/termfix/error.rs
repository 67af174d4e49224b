use crate::model::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("Unknown category: {0}")]
    InvalidCategory(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Could not load input: {0}")]
    Load(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, TriageError>;
