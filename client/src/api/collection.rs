/// Every list endpoint the pages read from, with its query parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collection {
    CatchRecords,
    SupplierCatchRecords { supplier_id: String },
    CompanyReceivedRecords { company_name: String },
    ProcessRecords,
    DistributorReceivedRecords { distributor_name: String },
    Transactions,
    UserTransactions { user_id: String },
    CompanySenderTransactions { company_name: String },
    CompanyReceiverTransactions { company_name: String },
    TrackRecall { distributor_name: String },
    FreshnessRecords,
    CompanyFreshnessRecords,
    SupplierFreshnessRecords,
    CompanyTransactions,
    SupplierTransactions,
    Users,
    Companies,
    CompanyCertificates,
    Feedback,
}

impl Collection {
    /// Path below the API base URL
    pub fn path(&self) -> &'static str {
        match self {
            Collection::CatchRecords | Collection::SupplierCatchRecords { .. } => {
                "/api/catch-records"
            }
            Collection::CompanyReceivedRecords { .. } => "/api/company-received-records",
            Collection::ProcessRecords => "/api/process-records",
            Collection::DistributorReceivedRecords { .. } => "/api/distributor-received-records",
            Collection::Transactions | Collection::UserTransactions { .. } => "/api/transactions",
            Collection::CompanySenderTransactions { .. } => "/api/transactions-company-sender",
            Collection::CompanyReceiverTransactions { .. } => "/api/transactions-company-receiver",
            Collection::TrackRecall { .. } => "/api/track-recall",
            Collection::FreshnessRecords => "/api/freshness-records",
            Collection::CompanyFreshnessRecords => "/api/company-freshness-records",
            Collection::SupplierFreshnessRecords => "/api/supplier-freshness-records",
            Collection::CompanyTransactions => "/api/company-transactions",
            Collection::SupplierTransactions => "/api/supplier-transactions",
            Collection::Users => "/api/users",
            Collection::Companies => "/api/companies",
            Collection::CompanyCertificates => "/api/company-certificates",
            Collection::Feedback => "/api/feedback",
        }
    }

    /// Query string pairs
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Collection::SupplierCatchRecords { supplier_id } => {
                vec![("supplierId", supplier_id.clone())]
            }
            Collection::CompanyReceivedRecords { company_name }
            | Collection::CompanySenderTransactions { company_name }
            | Collection::CompanyReceiverTransactions { company_name } => {
                vec![("companyName", company_name.clone())]
            }
            Collection::DistributorReceivedRecords { distributor_name }
            | Collection::TrackRecall { distributor_name } => {
                vec![("distributorName", distributor_name.clone())]
            }
            Collection::UserTransactions { user_id } => vec![("userId", user_id.clone())],
            _ => Vec::new(),
        }
    }
}
