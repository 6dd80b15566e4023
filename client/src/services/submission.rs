// Outcome of a chain-backed submission and the shared post-save steps

use tracing::{info, warn};

use crate::api::BackendClient;
use crate::error::SeaBlockError;
use crate::models::{AlgoBalance, LedgerReply};

/// How a create or edit ended, short of an error
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    /// Anchored, saved, and the wallet balance is known
    Completed { record_id: String, balance: AlgoBalance },
    /// Anchored and saved, but the balance lookup failed
    SavedWithoutBalance { record_id: String, reason: String },
    /// An existing row was rewritten
    Updated { record_id: String },
    /// Verification succeeded but policy forbids saving the batch
    Blocked { product_id: String, label: String },
    /// The user declined the confirmation prompt
    Cancelled,
}

impl SubmissionOutcome {
    /// Heading shown for the outcome
    pub fn title(&self) -> &'static str {
        match self {
            SubmissionOutcome::Completed { .. } => "Submission Successful",
            SubmissionOutcome::SavedWithoutBalance { .. } => "Record Saved",
            SubmissionOutcome::Updated { .. } => "Record Updated",
            SubmissionOutcome::Blocked { .. } => "Spoiled Product Detected",
            SubmissionOutcome::Cancelled => "Cancelled",
        }
    }

    pub fn message(&self) -> String {
        match self {
            SubmissionOutcome::Completed { balance, .. } => {
                format!("Your remaining Algo token balance: {} Algos", balance)
            }
            SubmissionOutcome::SavedWithoutBalance { reason, .. } => reason.clone(),
            SubmissionOutcome::Updated { record_id } => format!("{} was updated.", record_id),
            SubmissionOutcome::Blocked { product_id, label } => format!(
                "{} was rated {} and cannot be recorded. Please discard this batch.",
                product_id, label
            ),
            SubmissionOutcome::Cancelled => "Nothing was submitted.".to_string(),
        }
    }
}

/// Reads the wallet balance after a successful save. A failed lookup never
/// undoes the save; it only downgrades the outcome.
pub(crate) async fn balance_outcome(
    backend: &BackendClient,
    wallet: Option<&str>,
    record_id: String,
) -> SubmissionOutcome {
    let Some(wallet) = wallet else {
        warn!("No wallet in session, skipping balance lookup for {}", record_id);
        return SubmissionOutcome::SavedWithoutBalance {
            record_id,
            reason: "But we couldn't fetch your balance.".to_string(),
        };
    };

    match backend.balance(wallet).await {
        Ok(reply) => match reply.balance {
            Some(balance) if reply.status == "success" => {
                info!("{} saved, wallet balance {} Algos", record_id, balance);
                SubmissionOutcome::Completed { record_id, balance }
            }
            _ => {
                warn!("Balance lookup for {} returned status {:?}", wallet, reply.status);
                SubmissionOutcome::SavedWithoutBalance {
                    record_id,
                    reason: "But we couldn't fetch your balance.".to_string(),
                }
            }
        },
        Err(e) => {
            warn!("Balance lookup for {} failed: {}", wallet, e);
            SubmissionOutcome::SavedWithoutBalance {
                record_id,
                reason: "But failed to retrieve balance data.".to_string(),
            }
        }
    }
}

/// Maps a rejected ledger reply to its error. Insufficient funds is told
/// apart from every other failure.
pub(crate) fn rejection(reply: &LedgerReply, other: fn(String) -> SeaBlockError) -> SeaBlockError {
    if reply.is_insufficient_balance() {
        return SeaBlockError::InsufficientBalance {
            balance: reply.wallet_balance.unwrap_or_default(),
        };
    }
    other(
        reply
            .error
            .clone()
            .unwrap_or_else(|| format!("service replied with status {:?}", reply.status)),
    )
}

/// Non-2xx replies from a save become `SaveFailed`; transport errors stay as they are
pub(crate) fn save_failed(err: SeaBlockError) -> SeaBlockError {
    match err {
        SeaBlockError::Status { message, .. } => SeaBlockError::SaveFailed(message),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_prefers_insufficient_balance() {
        let reply = LedgerReply {
            status: "error".into(),
            error: Some("Insufficient ALGO balance: need 0.1".into()),
            wallet_balance: Some(AlgoBalance::from_micro(42_000)),
            ..Default::default()
        };
        match rejection(&reply, SeaBlockError::VerificationFailed) {
            SeaBlockError::InsufficientBalance { balance } => {
                assert_eq!(balance.to_string(), "0.042")
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_rejection_falls_back_to_given_kind() {
        let reply = LedgerReply {
            status: "error".into(),
            error: Some("node unreachable".into()),
            ..Default::default()
        };
        assert!(matches!(
            rejection(&reply, SeaBlockError::TransactionFailed),
            SeaBlockError::TransactionFailed(msg) if msg == "node unreachable"
        ));

        let silent = LedgerReply::default();
        assert!(matches!(
            rejection(&silent, SeaBlockError::VerificationFailed),
            SeaBlockError::VerificationFailed(_)
        ));
    }

    #[test]
    fn test_outcome_messages() {
        let done = SubmissionOutcome::Completed {
            record_id: "PID1".into(),
            balance: AlgoBalance::from_micro(5_500_000),
        };
        assert_eq!(done.message(), "Your remaining Algo token balance: 5.500 Algos");

        let partial = SubmissionOutcome::SavedWithoutBalance {
            record_id: "PID1".into(),
            reason: "But we couldn't fetch your balance.".into(),
        };
        assert_eq!(partial.title(), "Record Saved");
    }
}
