// Supplier catch records: verify freshness on chain, then persist

use serde::Serialize;
use tracing::{info, warn};

use super::submission::{balance_outcome, rejection, save_failed};
use super::{Clients, Confirm, SubmissionOutcome};
use crate::api::verifier::FreshnessRequest;
use crate::api::RecordEndpoint;
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::{bounds, generate_product_id, CatchRecord, SensorReadings, SubmittedReadings};
use crate::session::Session;

const CONFIRM_PROMPT: &str = "Are you sure you want to submit this catch record?";

/// Values entered in the catch record form
#[derive(Debug, Clone, PartialEq)]
pub struct CatchForm {
    pub product_name: String,
    pub quantity: f64,
    pub readings: SensorReadings,
}

impl CatchForm {
    /// Form pre-filled from an existing record, for editing
    pub fn from_record(record: &CatchRecord) -> Self {
        Self {
            product_name: record.product_name.clone(),
            quantity: record.quantity,
            readings: record.readings,
        }
    }

    pub fn validate(&self) -> SeaBlockResult<()> {
        validate_batch(&self.product_name, self.quantity)?;
        self.readings.validate()
    }
}

/// Checks shared by catch and process forms
pub(crate) fn validate_batch(product_name: &str, quantity: f64) -> SeaBlockResult<()> {
    if product_name.trim().is_empty() {
        return Err(SeaBlockError::Validation("Product name is required".to_string()));
    }
    let (min, max) = bounds::QUANTITY;
    if !quantity.is_finite() || quantity < min || quantity > max {
        return Err(SeaBlockError::Validation(format!(
            "Quantity must be between {} and {} kg",
            min, max
        )));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct NewCatchRecord<'a> {
    product_id: &'a str,
    product_name: &'a str,
    source: &'a str,
    quantity: i64,
    #[serde(flatten)]
    readings: SubmittedReadings,
    freshness_score: Option<f64>,
    freshness_label: Option<&'a str>,
    supplier_id: &'a str,
    blockchain_tx_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct CatchRecordUpdate<'a> {
    product_name: &'a str,
    source: Option<&'a str>,
    quantity: i64,
    #[serde(flatten)]
    readings: SubmittedReadings,
    freshness_score: Option<f64>,
    freshness_label: &'a str,
}

pub struct CatchService<'a> {
    clients: &'a Clients,
    session: &'a Session,
}

impl<'a> CatchService<'a> {
    pub fn new(clients: &'a Clients, session: &'a Session) -> Self {
        Self { clients, session }
    }

    /// Scores the batch with the verification service and saves it unless it is spoiled
    pub async fn create(
        &self,
        form: &CatchForm,
        confirm: &dyn Confirm,
    ) -> SeaBlockResult<SubmissionOutcome> {
        form.validate()?;
        if !confirm.confirm(CONFIRM_PROMPT) {
            return Ok(SubmissionOutcome::Cancelled);
        }

        let mnemonic = self.session.require_mnemonic()?;
        let supplier_id = self.session.require_user_id()?;
        let username = self.session.require_username()?;

        let product_id = generate_product_id();
        let readings = form.readings.submitted();
        let reply = self
            .clients
            .verifier
            .verify_freshness(&FreshnessRequest {
                mnemonic,
                product_id: &product_id,
                dissolved_oxygen: readings.dissolved_oxygen,
                temperature: readings.temperature,
                ph_level: readings.ph_level,
                ammonia: readings.ammonia,
                metals: readings.metals,
                bacteria: readings.bacteria,
            })
            .await?;

        if !reply.is_success() {
            return Err(rejection(&reply, SeaBlockError::VerificationFailed));
        }
        if reply.is_spoiled() {
            warn!("{} rated spoiled, not saving", product_id);
            return Ok(SubmissionOutcome::Blocked {
                product_id,
                label: reply.freshness_label.unwrap_or_default(),
            });
        }

        self.clients
            .backend
            .create(
                RecordEndpoint::CatchRecords,
                &NewCatchRecord {
                    product_id: &product_id,
                    product_name: form.product_name.trim(),
                    source: username,
                    quantity: form.quantity.trunc() as i64,
                    readings,
                    freshness_score: reply.freshness_score,
                    freshness_label: reply.freshness_label.as_deref(),
                    supplier_id,
                    blockchain_tx_id: reply.tx_id.as_deref(),
                },
            )
            .await
            .map_err(save_failed)?;
        info!("Catch record {} saved", product_id);

        Ok(balance_outcome(
            &self.clients.backend,
            self.session.wallet_address.as_deref(),
            product_id,
        )
        .await)
    }

    /// Rewrites an existing record without re-verifying. The stored freshness
    /// result is sent back unchanged.
    pub async fn edit(
        &self,
        existing: &CatchRecord,
        form: &CatchForm,
        confirm: &dyn Confirm,
    ) -> SeaBlockResult<SubmissionOutcome> {
        form.validate()?;
        if !confirm.confirm(CONFIRM_PROMPT) {
            return Ok(SubmissionOutcome::Cancelled);
        }

        self.clients
            .backend
            .update(
                RecordEndpoint::CatchRecords,
                &existing.product_id,
                &CatchRecordUpdate {
                    product_name: form.product_name.trim(),
                    source: self.session.username.as_deref(),
                    quantity: form.quantity.trunc() as i64,
                    readings: form.readings.submitted().with_shifted_temperature(),
                    freshness_score: existing.freshness_score,
                    freshness_label: &existing.freshness_label,
                },
            )
            .await
            .map_err(save_failed)?;
        info!("Catch record {} updated", existing.product_id);

        Ok(SubmissionOutcome::Updated {
            record_id: existing.product_id.clone(),
        })
    }
}
