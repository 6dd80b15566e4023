use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::http_client;
use crate::config::ClientConfig;
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::LedgerReply;

/// Body of `POST /api/verify-freshness`
#[derive(Debug, Clone, Serialize)]
pub struct FreshnessRequest<'a> {
    pub mnemonic: &'a str,
    pub product_id: &'a str,
    pub dissolved_oxygen: i64,
    pub temperature: i64,
    #[serde(rename = "pH_level")]
    pub ph_level: i64,
    pub ammonia: i64,
    pub metals: i64,
    pub bacteria: i64,
}

/// Body of `POST /api/create-transaction`
#[derive(Debug, Clone, Serialize)]
pub struct CreateTransactionRequest<'a> {
    pub mnemonic: &'a str,
    pub user_id: &'a str,
    pub product_id: &'a str,
    pub freshness: &'a str,
    pub amount: i64,
    pub expiry_date: &'a str,
    pub end_user: &'a str,
    pub end_user_wallet: &'a str,
}

/// Client for the freshness verification / ledger service
#[derive(Debug, Clone)]
pub struct VerifierClient {
    client: Client,
    verify_url: String,
}

impl VerifierClient {
    pub fn new(config: &ClientConfig) -> SeaBlockResult<Self> {
        Ok(Self {
            client: http_client(config)?,
            verify_url: config.verify_url.clone(),
        })
    }

    /// Scores the readings and anchors the result on chain
    pub async fn verify_freshness(&self, request: &FreshnessRequest<'_>) -> SeaBlockResult<LedgerReply> {
        debug!("Verifying freshness for {}", request.product_id);
        self.post("/api/verify-freshness", request).await
    }

    /// Records a product transfer on chain
    pub async fn create_transaction(
        &self,
        request: &CreateTransactionRequest<'_>,
    ) -> SeaBlockResult<LedgerReply> {
        debug!("Creating transaction for {}", request.product_id);
        self.post("/api/create-transaction", request).await
    }

    // The service reports failures in the body, so the status is not checked here
    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> SeaBlockResult<LedgerReply> {
        let response = self
            .client
            .post(format!("{}{}", self.verify_url, path))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            SeaBlockError::Decode(format!("verification service replied {}: {}", status, e))
        })
    }
}
