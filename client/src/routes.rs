// URL paths of the web front end, kept so links and bookmarks still resolve

use crate::capabilities::Page;
use crate::models::Role;

/// A role-specific page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Page { role: Role, page: Page },
}

const ROUTES: &[(&str, Role, Page)] = &[
    ("/customer-home", Role::Customer, Page::Home),
    ("/regulatory-home", Role::Regulatory, Page::Home),
    ("/supplier-home", Role::Supplier, Page::Home),
    ("/distributor-home", Role::Distributor, Page::Home),
    ("/company-home", Role::Company, Page::Home),
    ("/admin-home", Role::Admin, Page::Users),
    ("/catch-record", Role::Supplier, Page::CatchRecords),
    ("/catch-record-company", Role::Company, Page::CatchRecords),
    ("/catch-record-regulatory", Role::Regulatory, Page::CatchRecords),
    ("/catch-record-customer", Role::Customer, Page::CatchRecords),
    ("/process-record", Role::Company, Page::ProcessRecords),
    ("/process-record-regulatory", Role::Regulatory, Page::ProcessRecords),
    ("/process-record-distributor", Role::Distributor, Page::ProcessRecords),
    ("/process-record-customer", Role::Customer, Page::ProcessRecords),
    ("/transaction", Role::Supplier, Page::Transactions),
    ("/transaction-company", Role::Company, Page::Transactions),
    ("/shared-ledger", Role::Supplier, Page::SharedLedger),
    ("/shared-ledger-company", Role::Company, Page::SharedLedger),
    ("/shared-ledger-regulatory", Role::Regulatory, Page::SharedLedger),
    ("/shared-ledger-distributor", Role::Distributor, Page::SharedLedger),
    ("/shared-ledger-customer", Role::Customer, Page::SharedLedger),
    ("/track-recall", Role::Supplier, Page::TrackRecall),
    ("/track-recall-company", Role::Company, Page::TrackRecall),
    ("/track-recall-distributor", Role::Distributor, Page::TrackRecall),
    ("/trade-record", Role::Company, Page::TradeRecord),
    ("/trade-record-regulatory", Role::Regulatory, Page::TradeRecord),
    ("/distributed-database-regulatory", Role::Regulatory, Page::DistributedDatabase),
    ("/distributed-database-distributor", Role::Distributor, Page::DistributedDatabase),
];

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Page { role, page } => ROUTES
                .iter()
                .find(|(_, r, p)| r == role && p == page)
                .map(|(path, _, _)| *path)
                .unwrap_or("/"),
        }
    }

    pub fn parse(path: &str) -> Option<Route> {
        if path == "/" {
            return Some(Route::Login);
        }
        ROUTES
            .iter()
            .find(|(p, _, _)| *p == path)
            .map(|(_, role, page)| Route::Page {
                role: *role,
                page: *page,
            })
    }
}

impl Role {
    /// Where a successful login lands
    pub fn home_route(&self) -> Route {
        Route::Page {
            role: *self,
            page: if *self == Role::Admin { Page::Users } else { Page::Home },
        }
    }
}
