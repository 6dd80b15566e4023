// Company process records. Both create and edit go through verification.

use serde::Serialize;
use tracing::info;

use super::catch_service::validate_batch;
use super::submission::{balance_outcome, rejection, save_failed};
use super::{Clients, Confirm, SubmissionOutcome};
use crate::api::verifier::FreshnessRequest;
use crate::api::RecordEndpoint;
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::{
    generate_product_id, shift_negative_temperature, ProcessMethod, ProcessRecord, SensorReadings,
    SubmittedReadings,
};
use crate::session::Session;

const CONFIRM_PROMPT: &str = "Are you sure you want to submit this process record?";

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessForm {
    pub product_name: String,
    pub quantity: f64,
    pub process_method: ProcessMethod,
    pub readings: SensorReadings,
}

impl ProcessForm {
    /// Pre-filled from an existing record; an unrecognised method is an error
    pub fn from_record(record: &ProcessRecord) -> SeaBlockResult<Self> {
        Ok(Self {
            product_name: record.product_name.clone(),
            quantity: record.quantity,
            process_method: record.process_method.parse()?,
            readings: record.readings,
        })
    }

    pub fn validate(&self) -> SeaBlockResult<()> {
        validate_batch(&self.product_name, self.quantity)?;
        self.readings.validate()
    }
}

#[derive(Debug, Serialize)]
struct ProcessRecordBody<'a> {
    product_id: &'a str,
    product_name: &'a str,
    source: &'a str,
    quantity: i64,
    process_method: ProcessMethod,
    #[serde(flatten)]
    readings: SubmittedReadings,
    freshness_score: Option<f64>,
    freshness_label: Option<&'a str>,
    company_id: &'a str,
    blockchain_tx_id: Option<&'a str>,
}

pub struct ProcessService<'a> {
    clients: &'a Clients,
    session: &'a Session,
}

impl<'a> ProcessService<'a> {
    pub fn new(clients: &'a Clients, session: &'a Session) -> Self {
        Self { clients, session }
    }

    pub async fn create(
        &self,
        form: &ProcessForm,
        confirm: &dyn Confirm,
    ) -> SeaBlockResult<SubmissionOutcome> {
        self.submit(form, None, confirm).await
    }

    /// Re-verifies the edited readings under the record's existing product id
    pub async fn edit(
        &self,
        existing: &ProcessRecord,
        form: &ProcessForm,
        confirm: &dyn Confirm,
    ) -> SeaBlockResult<SubmissionOutcome> {
        self.submit(form, Some(existing.product_id.as_str()), confirm)
            .await
    }

    async fn submit(
        &self,
        form: &ProcessForm,
        existing_id: Option<&str>,
        confirm: &dyn Confirm,
    ) -> SeaBlockResult<SubmissionOutcome> {
        form.validate()?;
        if !confirm.confirm(CONFIRM_PROMPT) {
            return Ok(SubmissionOutcome::Cancelled);
        }

        let mnemonic = self.session.require_mnemonic()?;
        let company_id = self.session.require_user_id()?;
        let username = self.session.require_username()?;

        let product_id = existing_id
            .map(String::from)
            .unwrap_or_else(generate_product_id);
        let readings = form.readings.submitted();

        // verification sees the shifted temperature, the stored row keeps the raw one
        let reply = self
            .clients
            .verifier
            .verify_freshness(&FreshnessRequest {
                mnemonic,
                product_id: &product_id,
                dissolved_oxygen: readings.dissolved_oxygen,
                temperature: shift_negative_temperature(readings.temperature),
                ph_level: readings.ph_level,
                ammonia: readings.ammonia,
                metals: readings.metals,
                bacteria: readings.bacteria,
            })
            .await?;
        if !reply.is_success() {
            return Err(rejection(&reply, SeaBlockError::VerificationFailed));
        }

        let body = ProcessRecordBody {
            product_id: &product_id,
            product_name: form.product_name.trim(),
            source: username,
            quantity: form.quantity.trunc() as i64,
            process_method: form.process_method,
            readings,
            freshness_score: reply.freshness_score,
            freshness_label: reply.freshness_label.as_deref(),
            company_id,
            blockchain_tx_id: reply.tx_id.as_deref(),
        };
        let saved = match existing_id {
            Some(id) => {
                self.clients
                    .backend
                    .update(RecordEndpoint::ProcessRecords, id, &body)
                    .await
            }
            None => {
                self.clients
                    .backend
                    .create(RecordEndpoint::ProcessRecords, &body)
                    .await
            }
        };
        saved.map_err(save_failed)?;
        info!("Process record {} saved", product_id);

        Ok(balance_outcome(
            &self.clients.backend,
            self.session.wallet_address.as_deref(),
            product_id,
        )
        .await)
    }
}
