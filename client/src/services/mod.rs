// Page workflows built on the API layer

pub mod auth;
pub mod catch_service;
pub mod certificates;
pub mod ledger;
pub mod notifications;
pub mod process_service;
pub mod record_page;
pub mod submission;
pub mod track_recall;
pub mod transaction_service;
pub mod users;

pub use record_page::RecordPage;
pub use submission::SubmissionOutcome;

use crate::api::{BackendClient, VerifierClient};
use crate::config::ClientConfig;
use crate::error::SeaBlockResult;

/// Yes/no prompt shown before a destructive or chain-writing action
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// Answers every prompt the same way (`--yes`, scripted runs)
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// Both HTTP clients a workflow may need
#[derive(Debug, Clone)]
pub struct Clients {
    pub backend: BackendClient,
    pub verifier: VerifierClient,
}

impl Clients {
    pub fn new(config: &ClientConfig) -> SeaBlockResult<Self> {
        Ok(Self {
            backend: BackendClient::new(config)?,
            verifier: VerifierClient::new(config)?,
        })
    }
}
