// Shared ledger and distributed database views over several collections

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, error};

use crate::api::{BackendClient, Collection};
use crate::capabilities::Page;
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::export::write_csv;
use crate::filter::{matches_any_field, DateRange};
use crate::models::{display_value, Role, Row};
use crate::session::Session;

/// The aggregate pages, by which collections they read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerProfile {
    /// The supplier's own catch records and transactions
    SupplierSharedLedger,
    /// Served pre-joined by the backend for one distributor
    DistributorSharedLedger,
    /// Every freshness record and transaction, split by source
    CustomerSharedLedger,
    /// Same data as the customer ledger, with date filtering and export
    RegulatoryDatabase,
    /// Transactions received by the distributor and the matching freshness records
    DistributorDatabase,
}

impl LedgerProfile {
    pub fn for_page(role: Role, page: Page) -> Option<Self> {
        match (page, role) {
            (Page::SharedLedger, Role::Supplier) => Some(LedgerProfile::SupplierSharedLedger),
            (Page::SharedLedger, Role::Distributor) => Some(LedgerProfile::DistributorSharedLedger),
            (Page::SharedLedger, Role::Customer | Role::Company | Role::Regulatory) => {
                Some(LedgerProfile::CustomerSharedLedger)
            }
            (Page::DistributedDatabase, Role::Regulatory) => Some(LedgerProfile::RegulatoryDatabase),
            (Page::DistributedDatabase, Role::Distributor) => {
                Some(LedgerProfile::DistributorDatabase)
            }
            _ => None,
        }
    }

    /// Whether the page offers the all/company/supplier selector
    pub fn has_sources(&self) -> bool {
        matches!(
            self,
            LedgerProfile::CustomerSharedLedger | LedgerProfile::RegulatoryDatabase
        )
    }

    /// Whether the page offers date filtering and CSV export
    pub fn is_database(&self) -> bool {
        matches!(
            self,
            LedgerProfile::RegulatoryDatabase | LedgerProfile::DistributorDatabase
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerKind {
    #[default]
    Freshness,
    Transaction,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Freshness => "freshness",
            LedgerKind::Transaction => "transaction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerSource {
    #[default]
    All,
    Company,
    Supplier,
}

/// One kind of row as fetched from each source
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub all: Vec<Row>,
    pub company: Vec<Row>,
    pub supplier: Vec<Row>,
}

impl Sources {
    fn only(all: Vec<Row>) -> Self {
        Self {
            all,
            ..Default::default()
        }
    }

    fn get(&self, source: LedgerSource) -> &[Row] {
        match source {
            LedgerSource::All => &self.all,
            LedgerSource::Company => &self.company,
            LedgerSource::Supplier => &self.supplier,
        }
    }
}

pub struct LedgerView {
    profile: LedgerProfile,
    username: Option<String>,
    freshness: Sources,
    transactions: Sources,
    kind: LedgerKind,
    source: LedgerSource,
    search: String,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

async fn fetch_rows(backend: &BackendClient, collection: Collection) -> Vec<Row> {
    match backend.list_rows(&collection).await {
        Ok(rows) => {
            debug!("{} rows from {}", rows.len(), collection.path());
            rows
        }
        Err(e) => {
            error!("Failed to fetch {}: {}", collection.path(), e);
            Vec::new()
        }
    }
}

impl LedgerView {
    /// Fetches every collection the profile needs, concurrently. A failed
    /// collection is left empty; the others still load.
    pub async fn load(
        backend: &BackendClient,
        profile: LedgerProfile,
        session: &Session,
    ) -> SeaBlockResult<Self> {
        let (freshness, transactions) = match profile {
            LedgerProfile::SupplierSharedLedger => {
                let user_id = session.require_user_id()?.to_string();
                let (freshness, transactions) = tokio::join!(
                    fetch_rows(
                        backend,
                        Collection::SupplierCatchRecords {
                            supplier_id: user_id.clone()
                        }
                    ),
                    fetch_rows(backend, Collection::UserTransactions { user_id })
                );
                (Sources::only(freshness), Sources::only(transactions))
            }
            LedgerProfile::DistributorSharedLedger => {
                let name = session.require_username()?;
                match backend.shared_ledger_distributor(name).await {
                    Ok(ledger) => (
                        Sources::only(ledger.freshness_records),
                        Sources::only(ledger.transactions),
                    ),
                    Err(e) => {
                        error!("Failed to fetch shared ledger for {}: {}", name, e);
                        (Sources::default(), Sources::default())
                    }
                }
            }
            LedgerProfile::CustomerSharedLedger | LedgerProfile::RegulatoryDatabase => {
                let (all, company, supplier, all_tx, company_tx, supplier_tx) = tokio::join!(
                    fetch_rows(backend, Collection::FreshnessRecords),
                    fetch_rows(backend, Collection::CompanyFreshnessRecords),
                    fetch_rows(backend, Collection::SupplierFreshnessRecords),
                    fetch_rows(backend, Collection::Transactions),
                    fetch_rows(backend, Collection::CompanyTransactions),
                    fetch_rows(backend, Collection::SupplierTransactions)
                );
                (
                    Sources {
                        all,
                        company,
                        supplier,
                    },
                    Sources {
                        all: all_tx,
                        company: company_tx,
                        supplier: supplier_tx,
                    },
                )
            }
            LedgerProfile::DistributorDatabase => {
                session.require_username()?;
                let (freshness, transactions) = tokio::join!(
                    fetch_rows(backend, Collection::FreshnessRecords),
                    fetch_rows(backend, Collection::Transactions)
                );
                (Sources::only(freshness), Sources::only(transactions))
            }
        };

        Ok(Self::with_rows(
            profile,
            session.username.clone(),
            freshness,
            transactions,
        ))
    }

    /// A view over rows that are already in hand
    pub fn with_rows(
        profile: LedgerProfile,
        username: Option<String>,
        freshness: Sources,
        transactions: Sources,
    ) -> Self {
        Self {
            profile,
            username,
            freshness,
            transactions,
            kind: LedgerKind::default(),
            source: LedgerSource::default(),
            search: String::new(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn profile(&self) -> LedgerProfile {
        self.profile
    }

    pub fn kind(&self) -> LedgerKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: LedgerKind) {
        self.kind = kind;
    }

    pub fn set_source(&mut self, source: LedgerSource) -> SeaBlockResult<()> {
        if source != LedgerSource::All && !self.profile.has_sources() {
            return Err(SeaBlockError::Validation(
                "This ledger has a single source".to_string(),
            ));
        }
        self.source = source;
        Ok(())
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    /// Sets either end of the date range; filtering starts once both are set
    pub fn set_dates(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start_date = start;
        self.end_date = end;
    }

    pub fn date_range(&self) -> Option<DateRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(DateRange::new(start, end)),
            _ => None,
        }
    }

    /// The selected collection after role scoping, before search and dates
    pub fn current(&self) -> Vec<&Row> {
        let sources = match self.kind {
            LedgerKind::Freshness => &self.freshness,
            LedgerKind::Transaction => &self.transactions,
        };
        let rows = sources.get(self.source);

        match (self.profile, self.kind) {
            (LedgerProfile::DistributorDatabase, kind) => {
                let username = self.username.as_deref().unwrap_or_default();
                let received: Vec<&Row> = self
                    .transactions
                    .all
                    .iter()
                    .filter(|tx| field(tx, "end_user") == username)
                    .collect();
                match kind {
                    LedgerKind::Transaction => received,
                    LedgerKind::Freshness => {
                        let products: HashSet<String> =
                            received.iter().map(|tx| field(tx, "product_id")).collect();
                        rows.iter()
                            .filter(|r| products.contains(&field(r, "product_id")))
                            .collect()
                    }
                }
            }
            (LedgerProfile::DistributorSharedLedger, LedgerKind::Transaction) => {
                rows.iter().filter(|tx| is_well_formed_transaction(tx)).collect()
            }
            _ => rows.iter().collect(),
        }
    }

    /// `current()` narrowed by the search term, then by the date range
    pub fn filtered(&self) -> Vec<Row> {
        let range = self.date_range();
        self.current()
            .into_iter()
            .filter(|row| matches_any_field(row, &self.search))
            .filter(|row| range.map_or(true, |r| r.contains_row(row)))
            .cloned()
            .collect()
    }

    /// `{view}_records_{start}_to_{end}.csv`; unset dates leave their slot empty
    pub fn export_file_name(&self) -> String {
        let date = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_default();
        format!(
            "{}_records_{}_to_{}.csv",
            self.kind.as_str(),
            date(self.start_date),
            date(self.end_date)
        )
    }

    /// Writes the filtered rows into `dir`
    pub fn export_csv(&self, dir: &Path) -> SeaBlockResult<PathBuf> {
        write_csv(dir, &self.export_file_name(), &self.filtered())
    }
}

fn field(row: &Row, name: &str) -> String {
    row.get(name).map(display_value).unwrap_or_default()
}

/// Rows the distributor ledger can render: string ids and freshness, a
/// numeric amount and a date-like `created_at`
fn is_well_formed_transaction(row: &Row) -> bool {
    let is_string = |name: &str| matches!(row.get(name), Some(Value::String(_)));
    let numeric_amount = match row.get("amount") {
        Some(Value::Number(_)) | Some(Value::Null) | Some(Value::Bool(_)) => true,
        Some(Value::String(s)) => s.trim().is_empty() || s.trim().parse::<f64>().is_ok(),
        _ => false,
    };
    let dated = match row.get("created_at") {
        Some(Value::String(s)) => s.chars().count() >= 10,
        _ => false,
    };

    is_string("transaction_id") && is_string("product_id") && is_string("freshness") && numeric_amount && dated
}
