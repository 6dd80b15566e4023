// Track & recall: received/sent transactions with feedback threads

use std::collections::{BTreeMap, HashSet};

use tracing::{error, info};

use crate::api::{BackendClient, Collection, NotifyTarget};
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::filter::matches_any_field;
use crate::models::{display_value, Feedback, Role, Row};
use crate::session::Session;

/// Which side of the hand-over the company is looking from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Perspective {
    /// Transactions the user sent; the counterparty is the end user
    Sender,
    /// Transactions the user received; the counterparty is the sender
    Receiver,
}

impl Perspective {
    /// Transaction field naming the counterparty
    pub fn counterparty_field(&self) -> &'static str {
        match self {
            Perspective::Sender => "end_user",
            Perspective::Receiver => "sender",
        }
    }

    pub fn counterparty_label(&self) -> &'static str {
        match self {
            Perspective::Sender => "End User",
            Perspective::Receiver => "Sender",
        }
    }

    /// Who hears about a new comment
    pub fn notify_target(&self) -> NotifyTarget {
        match self {
            Perspective::Sender => NotifyTarget::EndUser,
            Perspective::Receiver => NotifyTarget::Sender,
        }
    }
}

/// Feedback on the shown transactions, split by author
#[derive(Debug)]
pub struct FeedbackSplit<'a> {
    pub counterparty_label: &'static str,
    /// Distinct counterparty usernames that left feedback
    pub counterparties: Vec<String>,
    pub counterparty: Vec<&'a Feedback>,
    pub others: Vec<&'a Feedback>,
}

pub struct TrackRecall {
    backend: BackendClient,
    session: Session,
    perspective: Perspective,
    transactions: Vec<Row>,
    feedback: Vec<Feedback>,
    search: String,
}

impl TrackRecall {
    /// Companies start in the sender view; distributors only receive and
    /// suppliers only send
    pub fn open(backend: BackendClient, session: Session) -> SeaBlockResult<Self> {
        let perspective = match session.role {
            Role::Company | Role::Supplier => Perspective::Sender,
            Role::Distributor => Perspective::Receiver,
            role => {
                return Err(SeaBlockError::Validation(format!(
                    "{} users have no track & recall page",
                    role
                )))
            }
        };
        Ok(Self {
            backend,
            session,
            perspective,
            transactions: Vec::new(),
            feedback: Vec::new(),
            search: String::new(),
        })
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn transactions(&self) -> &[Row] {
        &self.transactions
    }

    fn collection(&self) -> SeaBlockResult<Collection> {
        Ok(match (self.session.role, self.perspective) {
            (Role::Company, Perspective::Sender) => Collection::CompanySenderTransactions {
                company_name: self.session.require_username()?.to_string(),
            },
            (Role::Company, Perspective::Receiver) => Collection::CompanyReceiverTransactions {
                company_name: self.session.require_username()?.to_string(),
            },
            (Role::Distributor, _) => Collection::TrackRecall {
                distributor_name: self.session.require_username()?.to_string(),
            },
            _ => Collection::UserTransactions {
                user_id: self.session.require_user_id()?.to_string(),
            },
        })
    }

    /// Reloads transactions and all feedback side by side; failures leave lists empty
    pub async fn refresh(&mut self) {
        let collection = match self.collection() {
            Ok(collection) => collection,
            Err(e) => {
                error!("Cannot load track & recall: {}", e);
                self.transactions.clear();
                return;
            }
        };
        let (transactions, feedback) = tokio::join!(
            self.backend.list_rows(&collection),
            self.backend.list::<Feedback>(&Collection::Feedback)
        );
        self.transactions = transactions.unwrap_or_else(|e| {
            error!("Error fetching transactions: {}", e);
            Vec::new()
        });
        self.feedback = feedback.unwrap_or_else(|e| {
            error!("Error fetching all feedback: {}", e);
            Vec::new()
        });
    }

    /// Switches between the sender and receiver views (companies only), then refetches
    pub async fn switch_perspective(&mut self, perspective: Perspective) -> SeaBlockResult<()> {
        if self.session.role != Role::Company && perspective != self.perspective {
            return Err(SeaBlockError::Validation(format!(
                "{} users have a single view",
                self.session.role
            )));
        }
        self.perspective = perspective;
        self.refresh().await;
        Ok(())
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Transactions matching the search over all fields
    pub fn filtered(&self) -> Vec<&Row> {
        self.transactions
            .iter()
            .filter(|tx| matches_any_field(tx, &self.search))
            .collect()
    }

    pub async fn feedback_for(&self, transaction_id: &str) -> SeaBlockResult<Vec<Feedback>> {
        self.backend.feedback_for(transaction_id).await
    }

    /// Posts a comment, tells the counterparty, and returns the refreshed thread
    pub async fn submit_feedback(
        &mut self,
        transaction_id: &str,
        comment: &str,
    ) -> SeaBlockResult<Vec<Feedback>> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(SeaBlockError::Validation("Feedback cannot be empty".to_string()));
        }
        let user_id = self.session.require_user_id()?;

        self.backend
            .post_feedback(transaction_id, user_id, comment)
            .await?;
        self.backend
            .notify(self.perspective.notify_target(), transaction_id, comment)
            .await?;
        info!("Feedback posted on {}", transaction_id);

        self.reload_feedback().await;
        self.feedback_for(transaction_id).await
    }

    /// Edits the user's own comment. Only the author is offered the edit;
    /// the backend still authorizes it against `user_id`.
    pub async fn update_feedback(
        &mut self,
        feedback: &Feedback,
        comment: &str,
    ) -> SeaBlockResult<Vec<Feedback>> {
        let comment = comment.trim();
        if comment.is_empty() {
            return Err(SeaBlockError::Validation("Feedback cannot be empty".to_string()));
        }
        let user_id = self.session.require_user_id()?;
        if !self.can_edit(feedback) {
            return Err(SeaBlockError::Validation(
                "You can only edit your own feedback".to_string(),
            ));
        }

        self.backend
            .patch_feedback(&feedback.id, user_id, comment)
            .await?;
        info!("Feedback {} updated", feedback.id);

        self.reload_feedback().await;
        self.feedback_for(&feedback.transaction_id).await
    }

    pub fn can_edit(&self, feedback: &Feedback) -> bool {
        feedback.user_id.is_some() && feedback.user_id == self.session.user_id
    }

    async fn reload_feedback(&mut self) {
        match self.backend.list::<Feedback>(&Collection::Feedback).await {
            Ok(feedback) => self.feedback = feedback,
            Err(e) => error!("Error fetching all feedback: {}", e),
        }
    }

    /// Number of transactions per freshness label
    pub fn freshness_distribution(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for tx in &self.transactions {
            let label = tx
                .get("freshness")
                .map(display_value)
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| "Unknown".to_string());
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Feedback on the loaded transactions, split into the counterparty's
    /// comments and everyone else's
    pub fn feedback_split(&self) -> FeedbackSplit<'_> {
        let field = |tx: &Row, name: &str| tx.get(name).map(display_value).unwrap_or_default();
        let tx_ids: HashSet<String> = self
            .transactions
            .iter()
            .map(|tx| field(tx, "transaction_id"))
            .collect();
        let users: HashSet<String> = self
            .transactions
            .iter()
            .map(|tx| field(tx, self.perspective.counterparty_field()))
            .collect();

        let (counterparty, others): (Vec<&Feedback>, Vec<&Feedback>) = self
            .feedback
            .iter()
            .filter(|f| tx_ids.contains(&f.transaction_id))
            .partition(|f| users.contains(&f.username));

        let mut counterparties: Vec<String> = Vec::new();
        for f in &counterparty {
            if !counterparties.contains(&f.username) {
                counterparties.push(f.username.clone());
            }
        }

        FeedbackSplit {
            counterparty_label: self.perspective.counterparty_label(),
            counterparties,
            counterparty,
            others,
        }
    }
}
