use reqwest::StatusCode;
use thiserror::Error;

use crate::models::AlgoBalance;

/// Everything a SeaBlock action can fail with.
///
/// Validation errors are raised before any network call. Transport and status
/// errors are terminal for the action; nothing is retried.
#[derive(Error, Debug)]
pub enum SeaBlockError {
    #[error("{0}")]
    Validation(String),
    #[error("Session error: {0}")]
    Session(String),
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Request failed with status {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Invalid response: {0}")]
    Decode(String),
    #[error("Your wallet balance is too low to perform this transaction. Current balance: {balance} Algos. Please top up your wallet and try again.")]
    InsufficientBalance { balance: AlgoBalance },
    #[error("Unable to verify freshness on the blockchain: {0}")]
    VerificationFailed(String),
    #[error("Transaction failed to be processed: {0}")]
    TransactionFailed(String),
    #[error("Database save failed: {0}")]
    SaveFailed(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SeaBlockResult<T> = Result<T, SeaBlockError>;

impl SeaBlockError {
    /// Short heading the shell shows above the message
    pub fn title(&self) -> &'static str {
        match self {
            SeaBlockError::Validation(_) => "Invalid Input",
            SeaBlockError::Session(_) => "Session Error",
            SeaBlockError::Http(_) | SeaBlockError::Io(_) => "Network Error",
            SeaBlockError::Status { .. } | SeaBlockError::Decode(_) | SeaBlockError::Json(_) => {
                "Request Failed"
            }
            SeaBlockError::InsufficientBalance { .. } => "Not Enough ALGO",
            SeaBlockError::VerificationFailed(_) => "Blockchain Verification Failed",
            SeaBlockError::TransactionFailed(_) => "Blockchain Error",
            SeaBlockError::SaveFailed(_) => "Save Failed",
        }
    }
}
