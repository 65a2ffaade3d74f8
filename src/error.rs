use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid email address")]
pub struct ValidationError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage is not available")]
    Unavailable,
    #[error("Failed to write key {key}: {reason}")]
    WriteFailed { key: String, reason: String },
    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Form endpoint rejected the submission with status {status}")]
    Rejected { status: u16 },
    #[error("Failed to reach form endpoint: {0}")]
    Transport(String),
    #[error("Failed to persist submission: {0}")]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for SubmissionError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => SubmissionError::Rejected { status: status.as_u16() },
            None => SubmissionError::Transport(e.to_string()),
        }
    }
}
