// Supplier transactions: product hand-overs recorded on chain

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info};

use super::submission::{balance_outcome, rejection, save_failed};
use super::{Clients, Confirm, SubmissionOutcome};
use crate::api::verifier::CreateTransactionRequest;
use crate::api::{BackendClient, Collection, RecordEndpoint};
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::filter::parse_date;
use crate::models::{CatchRecord, Company, Transaction};
use crate::session::Session;

const CONFIRM_PROMPT: &str = "Are you sure you want to submit this transaction?";

/// Choices offered by the transaction form
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    /// The supplier's own catch records
    pub products: Vec<CatchRecord>,
    pub companies: Vec<Company>,
}

impl TransactionOptions {
    /// Loads both lists side by side; a list that fails to load is left empty
    pub async fn load(backend: &BackendClient, session: &Session) -> SeaBlockResult<Self> {
        let products = Collection::SupplierCatchRecords {
            supplier_id: session.require_user_id()?.to_string(),
        };
        let (products, companies) = tokio::join!(
            backend.list::<CatchRecord>(&products),
            backend.list::<Company>(&Collection::Companies)
        );

        Ok(Self {
            products: products.unwrap_or_else(|e| {
                error!("Failed to load products: {}", e);
                Vec::new()
            }),
            companies: companies.unwrap_or_else(|e| {
                error!("Failed to load companies: {}", e);
                Vec::new()
            }),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionForm {
    pub product_id: String,
    pub freshness: String,
    pub amount: f64,
    /// `YYYY-MM-DD`
    pub expiry_date: String,
    pub end_user: String,
    pub end_user_wallet: String,
}

impl TransactionForm {
    /// Pre-filled from an existing transaction. The wallet is not stored on
    /// transactions, so it starts empty.
    pub fn from_transaction(tx: &Transaction) -> Self {
        Self {
            product_id: tx.product_id.clone(),
            freshness: tx.freshness.clone(),
            amount: tx.amount,
            expiry_date: tx
                .expiry_date
                .as_deref()
                .and_then(parse_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            end_user: tx.end_user.clone(),
            end_user_wallet: String::new(),
        }
    }

    /// Picks a product and copies its freshness label
    pub fn select_product(&mut self, options: &TransactionOptions, product_id: &str) {
        self.product_id = product_id.to_string();
        self.freshness = options
            .products
            .iter()
            .find(|p| p.product_id == product_id)
            .map(|p| p.freshness_label.clone())
            .unwrap_or_default();
    }

    /// Picks the receiving company and copies its wallet
    pub fn select_company(&mut self, options: &TransactionOptions, username: &str) {
        self.end_user = username.to_string();
        self.end_user_wallet = options
            .companies
            .iter()
            .find(|c| c.username == username)
            .and_then(|c| c.wallet_address.clone())
            .unwrap_or_default();
    }

    pub fn validate(&self) -> SeaBlockResult<()> {
        if self.product_id.trim().is_empty() || self.end_user.trim().is_empty() {
            return Err(SeaBlockError::Validation(
                "Please fill in all required fields".to_string(),
            ));
        }
        if !self.amount.is_finite() || self.amount < 1.0 {
            return Err(SeaBlockError::Validation(
                "Amount must be at least 1".to_string(),
            ));
        }
        NaiveDate::parse_from_str(&self.expiry_date, "%Y-%m-%d").map_err(|_| {
            SeaBlockError::Validation("Expiry date must be a YYYY-MM-DD date".to_string())
        })?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct TransactionUpdate<'a> {
    product_id: &'a str,
    freshness: &'a str,
    amount: i64,
    expiry_date: &'a str,
    end_user: &'a str,
}

pub struct TransactionService<'a> {
    clients: &'a Clients,
    session: &'a Session,
}

impl<'a> TransactionService<'a> {
    pub fn new(clients: &'a Clients, session: &'a Session) -> Self {
        Self { clients, session }
    }

    /// Records the hand-over on chain. The verification service also stores
    /// the row, so there is no separate save.
    pub async fn create(
        &self,
        form: &TransactionForm,
        confirm: &dyn Confirm,
    ) -> SeaBlockResult<SubmissionOutcome> {
        form.validate()?;
        if !confirm.confirm(CONFIRM_PROMPT) {
            return Ok(SubmissionOutcome::Cancelled);
        }

        let mnemonic = self.session.require_mnemonic()?;
        let user_id = self.session.require_user_id()?;

        let reply = self
            .clients
            .verifier
            .create_transaction(&CreateTransactionRequest {
                mnemonic,
                user_id,
                product_id: &form.product_id,
                freshness: &form.freshness,
                amount: form.amount.trunc() as i64,
                expiry_date: &form.expiry_date,
                end_user: &form.end_user,
                end_user_wallet: &form.end_user_wallet,
            })
            .await?;

        let tx_id = match reply.tx_id.as_deref() {
            Some(tx_id) if reply.is_success() && !tx_id.is_empty() => tx_id.to_string(),
            _ => return Err(rejection(&reply, SeaBlockError::TransactionFailed)),
        };
        info!("Transaction {} created for {}", tx_id, form.product_id);

        Ok(balance_outcome(
            &self.clients.backend,
            self.session.wallet_address.as_deref(),
            tx_id,
        )
        .await)
    }

    /// Rewrites the stored row only; nothing is sent on chain
    pub async fn edit(
        &self,
        existing: &Transaction,
        form: &TransactionForm,
        confirm: &dyn Confirm,
    ) -> SeaBlockResult<SubmissionOutcome> {
        form.validate()?;
        if !confirm.confirm(CONFIRM_PROMPT) {
            return Ok(SubmissionOutcome::Cancelled);
        }

        self.clients
            .backend
            .update(
                RecordEndpoint::Transactions,
                &existing.id,
                &TransactionUpdate {
                    product_id: &form.product_id,
                    freshness: &form.freshness,
                    amount: form.amount.trunc() as i64,
                    expiry_date: &form.expiry_date,
                    end_user: &form.end_user,
                },
            )
            .await
            .map_err(save_failed)?;
        info!("Transaction {} updated", existing.id);

        Ok(SubmissionOutcome::Updated {
            record_id: existing.id.clone(),
        })
    }
}
