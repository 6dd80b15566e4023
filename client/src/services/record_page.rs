// One record table page, parametrized by the role's capabilities

use tracing::{error, info};

use crate::api::{BackendClient, RecordEndpoint};
use crate::capabilities::{Page, PageCapabilities};
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::filter::matches_fields;
use crate::models::Record;
use crate::session::Session;

use super::Confirm;

/// State of a record list: the fetched rows and the current search term
pub struct RecordPage<T: Record> {
    backend: BackendClient,
    session: Session,
    page: Page,
    capabilities: PageCapabilities,
    records: Vec<T>,
    search: String,
}

impl<T: Record> RecordPage<T> {
    /// Opens `page` for the session's role. Roles without access get a
    /// validation error and no page.
    pub fn open(backend: BackendClient, session: Session, page: Page) -> SeaBlockResult<Self> {
        let capabilities = page.capabilities(session.role).ok_or_else(|| {
            SeaBlockError::Validation(format!("{} users cannot open {:?}", session.role, page))
        })?;
        Ok(Self {
            backend,
            session,
            page,
            capabilities,
            records: Vec::new(),
            search: String::new(),
        })
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn capabilities(&self) -> &PageCapabilities {
        &self.capabilities
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Everything fetched, before the search filter
    pub fn records(&self) -> &[T] {
        &self.records
    }

    /// Re-reads the scoped collection. Any failure leaves the list empty.
    pub async fn refresh(&mut self) {
        match self.fetch().await {
            Ok(records) => self.records = records,
            Err(e) => {
                error!("Failed to load {:?}: {}", self.page, e);
                self.records.clear();
            }
        }
    }

    async fn fetch(&self) -> SeaBlockResult<Vec<T>> {
        let scope = self.capabilities.scope;
        let collection = scope.collection(&self.session)?;
        let records: Vec<T> = self.backend.list(&collection).await?;
        Ok(records
            .into_iter()
            .filter(|record| scope.keeps(&record.row(), &self.session))
            .collect())
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Records matching the search term over the page's search fields
    pub fn visible(&self) -> Vec<&T> {
        self.records
            .iter()
            .filter(|record| {
                matches_fields(&record.row(), self.capabilities.search_fields, &self.search)
            })
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|record| record.record_id() == id)
    }

    pub fn ensure_can_create(&self) -> SeaBlockResult<()> {
        self.ensure(self.capabilities.can_create, "create")
    }

    pub fn ensure_can_edit(&self) -> SeaBlockResult<()> {
        self.ensure(self.capabilities.can_edit, "edit")
    }

    pub fn ensure_can_delete(&self) -> SeaBlockResult<()> {
        self.ensure(self.capabilities.can_delete, "delete")
    }

    fn ensure(&self, allowed: bool, action: &str) -> SeaBlockResult<()> {
        if allowed {
            Ok(())
        } else {
            Err(SeaBlockError::Validation(format!(
                "{} users cannot {} records on this page",
                self.session.role, action
            )))
        }
    }

    /// Asks, deletes, then reloads the list. Returns `false` when the user declined.
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> SeaBlockResult<bool> {
        self.ensure_can_delete()?;
        let endpoint = endpoint_for(self.page)?;

        let prompt = match self.page {
            Page::Users => "Are you sure you want to delete this user?",
            Page::Transactions => "Are you sure you want to delete this transaction?",
            _ => "Are you sure you want to delete this record?",
        };
        if !confirm.confirm(prompt) {
            return Ok(false);
        }

        self.backend.delete(endpoint, id).await?;
        info!("Deleted {} from {:?}", id, self.page);
        self.refresh().await;
        Ok(true)
    }
}

fn endpoint_for(page: Page) -> SeaBlockResult<RecordEndpoint> {
    match page {
        Page::CatchRecords => Ok(RecordEndpoint::CatchRecords),
        Page::ProcessRecords => Ok(RecordEndpoint::ProcessRecords),
        Page::Transactions => Ok(RecordEndpoint::Transactions),
        Page::Users => Ok(RecordEndpoint::Users),
        other => Err(SeaBlockError::Validation(format!(
            "{:?} has no deletable records",
            other
        ))),
    }
}
