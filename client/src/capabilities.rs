// Per-role page descriptors

use crate::api::Collection;
use crate::error::SeaBlockResult;
use crate::models::{display_value, Role, Row};
use crate::session::Session;

/// Pages a role can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    CatchRecords,
    ProcessRecords,
    Transactions,
    TradeRecord,
    SharedLedger,
    DistributedDatabase,
    TrackRecall,
    Users,
}

/// Which slice of a table a page shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    AllCatchRecords,
    CatchRecordsReceivedByCompany,
    AllProcessRecords,
    /// Process records whose `source` is the logged-in company
    OwnProcessRecords,
    ProcessRecordsReceivedByDistributor,
    OwnTransactions,
    CompanySentTransactions,
    AllCertificates,
    AllUsers,
}

impl Scope {
    /// The backend collection this scope reads
    pub fn collection(&self, session: &Session) -> SeaBlockResult<Collection> {
        Ok(match self {
            Scope::AllCatchRecords => Collection::CatchRecords,
            Scope::CatchRecordsReceivedByCompany => Collection::CompanyReceivedRecords {
                company_name: session.require_username()?.to_string(),
            },
            Scope::AllProcessRecords | Scope::OwnProcessRecords => Collection::ProcessRecords,
            Scope::ProcessRecordsReceivedByDistributor => Collection::DistributorReceivedRecords {
                distributor_name: session.require_username()?.to_string(),
            },
            Scope::OwnTransactions => Collection::UserTransactions {
                user_id: session.require_user_id()?.to_string(),
            },
            Scope::CompanySentTransactions => Collection::CompanySenderTransactions {
                company_name: session.require_username()?.to_string(),
            },
            Scope::AllCertificates => Collection::CompanyCertificates,
            Scope::AllUsers => Collection::Users,
        })
    }

    /// Client-side narrowing applied after the fetch
    pub fn keeps(&self, row: &Row, session: &Session) -> bool {
        match self {
            Scope::OwnProcessRecords => {
                let source = row.get("source").map(display_value).unwrap_or_default();
                session.username.as_deref() == Some(source.as_str())
            }
            _ => true,
        }
    }
}

/// What one role may do on one record page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCapabilities {
    pub can_create: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub scope: Scope,
    pub visible_columns: &'static [&'static str],
    pub search_fields: &'static [&'static str],
}

const SUPPLIER_CATCH_COLUMNS: &[&str] = &[
    "product_id",
    "product_name",
    "quantity",
    "created_at",
    "source",
    "freshness_label",
];

const CATCH_COLUMNS: &[&str] = &[
    "product_id",
    "product_name",
    "source",
    "quantity",
    "freshness_score",
    "freshness_label",
    "created_at",
];

const PROCESS_COLUMNS: &[&str] = &[
    "product_id",
    "product_name",
    "source",
    "quantity",
    "process_method",
    "freshness_score",
    "freshness_label",
    "created_at",
];

const TRANSACTION_COLUMNS: &[&str] = &[
    "transaction_id",
    "product_id",
    "amount",
    "freshness",
    "end_user",
    "expiry_date",
    "created_at",
];

const CERTIFICATE_COLUMNS: &[&str] = &["company_name", "company_email", "company_phone", "license"];

const USER_COLUMNS: &[&str] = &["id", "username", "email", "wallet_address", "phone_no", "role", "license"];

const SEARCH_SUPPLIER_CATCH: &[&str] = &["product_id", "product_name", "freshness_label"];
const SEARCH_BY_SOURCE: &[&str] = &["product_id", "product_name", "source"];
const SEARCH_TRANSACTIONS: &[&str] = &["product_id", "end_user", "transaction_id"];
const SEARCH_CERTIFICATES: &[&str] = &["company_name", "company_email", "company_phone"];
const SEARCH_USERS: &[&str] = &["id", "username", "email"];

impl PageCapabilities {
    const fn read_only(scope: Scope, visible_columns: &'static [&'static str], search_fields: &'static [&'static str]) -> Self {
        Self {
            can_create: false,
            can_edit: false,
            can_delete: false,
            scope,
            visible_columns,
            search_fields,
        }
    }

    const fn full(scope: Scope, visible_columns: &'static [&'static str], search_fields: &'static [&'static str]) -> Self {
        Self {
            can_create: true,
            can_edit: true,
            can_delete: true,
            scope,
            visible_columns,
            search_fields,
        }
    }
}

impl Page {
    /// Descriptor for a record page, or `None` when the role cannot open it
    pub fn capabilities(&self, role: Role) -> Option<PageCapabilities> {
        use Role::*;
        match (self, role) {
            (Page::CatchRecords, Supplier) => Some(PageCapabilities::full(
                Scope::AllCatchRecords,
                SUPPLIER_CATCH_COLUMNS,
                SEARCH_SUPPLIER_CATCH,
            )),
            (Page::CatchRecords, Company) => Some(PageCapabilities::read_only(
                Scope::CatchRecordsReceivedByCompany,
                CATCH_COLUMNS,
                SEARCH_BY_SOURCE,
            )),
            (Page::CatchRecords, Regulatory | Customer) => Some(PageCapabilities::read_only(
                Scope::AllCatchRecords,
                CATCH_COLUMNS,
                SEARCH_BY_SOURCE,
            )),
            (Page::ProcessRecords, Company) => Some(PageCapabilities::full(
                Scope::OwnProcessRecords,
                PROCESS_COLUMNS,
                SEARCH_BY_SOURCE,
            )),
            (Page::ProcessRecords, Distributor) => Some(PageCapabilities::read_only(
                Scope::ProcessRecordsReceivedByDistributor,
                PROCESS_COLUMNS,
                SEARCH_BY_SOURCE,
            )),
            (Page::ProcessRecords, Regulatory | Customer) => Some(PageCapabilities::read_only(
                Scope::AllProcessRecords,
                PROCESS_COLUMNS,
                SEARCH_BY_SOURCE,
            )),
            (Page::Transactions, Supplier) => Some(PageCapabilities::full(
                Scope::OwnTransactions,
                TRANSACTION_COLUMNS,
                SEARCH_TRANSACTIONS,
            )),
            (Page::Transactions, Company) => Some(PageCapabilities::read_only(
                Scope::CompanySentTransactions,
                TRANSACTION_COLUMNS,
                SEARCH_TRANSACTIONS,
            )),
            (Page::TradeRecord, Regulatory) => Some(PageCapabilities::read_only(
                Scope::AllCertificates,
                CERTIFICATE_COLUMNS,
                SEARCH_CERTIFICATES,
            )),
            (Page::Users, Admin) => Some(PageCapabilities::full(
                Scope::AllUsers,
                USER_COLUMNS,
                SEARCH_USERS,
            )),
            _ => None,
        }
    }

    /// Whether the role's navigation includes this page
    pub fn is_open_to(&self, role: Role) -> bool {
        role.navigation().contains(self)
    }
}

impl Role {
    /// Pages linked from the role's home page, in menu order
    pub fn navigation(&self) -> &'static [Page] {
        match self {
            Role::Supplier => &[
                Page::Home,
                Page::Transactions,
                Page::CatchRecords,
                Page::SharedLedger,
                Page::TrackRecall,
            ],
            Role::Company => &[
                Page::Home,
                Page::ProcessRecords,
                Page::Transactions,
                Page::CatchRecords,
                Page::TradeRecord,
                Page::SharedLedger,
                Page::TrackRecall,
            ],
            Role::Distributor => &[
                Page::Home,
                Page::ProcessRecords,
                Page::TrackRecall,
                Page::SharedLedger,
                Page::DistributedDatabase,
            ],
            Role::Regulatory => &[
                Page::Home,
                Page::ProcessRecords,
                Page::CatchRecords,
                Page::TradeRecord,
                Page::SharedLedger,
                Page::DistributedDatabase,
            ],
            Role::Customer => &[
                Page::Home,
                Page::ProcessRecords,
                Page::CatchRecords,
                Page::SharedLedger,
            ],
            Role::Admin => &[Page::Users],
        }
    }
}
