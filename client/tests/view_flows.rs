mod common;

use serde_json::json;

use common::{logged_in, shared, spawn, MockState, WALLET};
use seablock_client::capabilities::Page;
use seablock_client::models::{CatchRecord, Role, Transaction};
use seablock_client::routes::Route;
use seablock_client::services::auth::{LoginFlow, LoginState};
use seablock_client::services::ledger::{LedgerKind, LedgerProfile, LedgerSource, LedgerView};
use seablock_client::services::notifications::NotificationCenter;
use seablock_client::services::track_recall::TrackRecall;
use seablock_client::services::users::{UserDirectory, UserForm};
use seablock_client::services::{AutoConfirm, RecordPage};
use seablock_client::{BackendClient, SeaBlockError, SessionStore};

fn temp_dir() -> std::path::PathBuf {
    std::env::temp_dir().join(format!("seablock-it-{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn test_supplier_login_persists_session() {
    let state = shared(MockState::default());
    let config = spawn(state.clone()).await;
    let store = SessionStore::new(temp_dir().join("session.json"));
    let mut flow = LoginFlow::new(BackendClient::new(&config).unwrap(), store.clone());

    flow.select_role("Supplier").unwrap();
    let route = flow.submit("supplier1", "secret").await.unwrap();

    assert_eq!(
        route,
        Route::Page {
            role: Role::Supplier,
            page: Page::Home
        }
    );
    assert!(matches!(flow.state(), LoginState::Credentialed(_)));
    let saved = store.load().unwrap().unwrap();
    assert_eq!(saved.user_id.as_deref(), Some("S001"));
    assert_eq!(saved.wallet_address.as_deref(), Some(WALLET));
    assert!(saved.require_mnemonic().is_ok());
}

#[tokio::test]
async fn test_wrong_password_surfaces_backend_error() {
    let state = shared(MockState::default());
    let config = spawn(state.clone()).await;
    let store = SessionStore::new(temp_dir().join("session.json"));
    let mut flow = LoginFlow::new(BackendClient::new(&config).unwrap(), store.clone());

    flow.select_role("Supplier").unwrap();
    let err = flow.submit("supplier1", "nope").await.unwrap_err();

    assert!(matches!(err, SeaBlockError::Status { ref message, .. } if message == "Invalid credentials"));
    assert!(store.load().unwrap().is_none());
}

#[tokio::test]
async fn test_customer_enters_without_network() {
    let state = shared(MockState::default());
    let config = spawn(state.clone()).await;
    let store = SessionStore::new(temp_dir().join("session.json"));
    let mut flow = LoginFlow::new(BackendClient::new(&config).unwrap(), store.clone());

    flow.select_role("Customer").unwrap();
    assert!(!flow.needs_credentials());
    flow.submit("", "").await.unwrap();

    assert!(state.lock().unwrap().calls.is_empty());
    assert_eq!(store.load().unwrap().unwrap().role, Role::Customer);
}

#[tokio::test]
async fn test_mark_as_read_refetches_unread_count() {
    let state = shared(MockState {
        notifications: vec![
            json!({ "id": 1, "user_id": "S001", "message": "Feedback on TX1", "is_read": false }),
            json!({ "id": 2, "user_id": "S001", "message": "Feedback on TX2", "is_read": false }),
            json!({ "id": 3, "user_id": "S001", "message": "Old news", "is_read": true }),
        ],
        ..Default::default()
    });
    let config = spawn(state.clone()).await;
    let mut center =
        NotificationCenter::new(BackendClient::new(&config).unwrap(), Some("S001".into()));

    center.refresh().await;
    assert_eq!(center.notifications().len(), 3);
    assert_eq!(center.unread_count(), 2);

    center.mark_as_read("1").await.unwrap();
    assert_eq!(center.unread_count(), 1);
    assert!(state.lock().unwrap().called("PATCH /api/notifications/1/read"));
}

#[tokio::test]
async fn test_transaction_delete_reports_backend_message() {
    let state = shared(MockState {
        transactions: vec![json!({
            "id": 7,
            "transaction_id": "ALGOTX7",
            "product_id": "PID1",
            "amount": "40",
            "freshness": "Fresh",
            "end_user": "ocean_co"
        })],
        ..Default::default()
    });
    let config = spawn(state.clone()).await;
    let session = logged_in(Role::Supplier, "S001", "supplier1");
    let mut page: RecordPage<Transaction> =
        RecordPage::open(BackendClient::new(&config).unwrap(), session, Page::Transactions).unwrap();

    page.refresh().await;
    assert_eq!(page.records().len(), 1);
    assert_eq!(page.records()[0].amount, 40.0);

    let err = page.delete("99", &AutoConfirm(true)).await.unwrap_err();
    assert!(matches!(err, SeaBlockError::Status { ref message, .. } if message == "Transaction not found"));

    assert!(!page.delete("7", &AutoConfirm(false)).await.unwrap());
    assert_eq!(page.records().len(), 1);

    assert!(page.delete("7", &AutoConfirm(true)).await.unwrap());
    assert!(page.records().is_empty());
}

#[tokio::test]
async fn test_sender_feedback_notifies_end_user() {
    let state = shared(MockState {
        transactions: vec![json!({
            "id": 1,
            "transaction_id": "ALGOTX1",
            "product_id": "PID1",
            "freshness": "Fresh",
            "end_user": "ocean_co",
            "sender": "supplier1"
        })],
        ..Default::default()
    });
    let config = spawn(state.clone()).await;
    let session = logged_in(Role::Company, "C001", "ocean_co");
    let mut recall = TrackRecall::open(BackendClient::new(&config).unwrap(), session).unwrap();

    recall.refresh().await;
    assert_eq!(recall.transactions().len(), 1);
    assert_eq!(recall.freshness_distribution().get("Fresh"), Some(&1));

    let thread = recall
        .submit_feedback("ALGOTX1", "  Arrived warm  ")
        .await
        .unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].comment, "Arrived warm");

    let state = state.lock().unwrap();
    let posted = state.calls.iter().position(|c| c == "POST /api/feedback").unwrap();
    let notified = state
        .calls
        .iter()
        .position(|c| c == "POST /api/notify-enduser")
        .unwrap();
    assert!(posted < notified);
    assert!(!state.called("POST /api/notify-sender"));
    assert_eq!(state.body_of("POST /api/feedback").unwrap()["user_id"], "C001");
}

#[tokio::test]
async fn test_empty_feedback_is_rejected_locally() {
    let state = shared(MockState::default());
    let config = spawn(state.clone()).await;
    let session = logged_in(Role::Distributor, "D001", "fresh_dist");
    let mut recall = TrackRecall::open(BackendClient::new(&config).unwrap(), session).unwrap();

    assert!(matches!(
        recall.submit_feedback("ALGOTX1", "   ").await,
        Err(SeaBlockError::Validation(_))
    ));
    assert!(state.lock().unwrap().calls.is_empty());
}

#[tokio::test]
async fn test_admin_adds_user_with_next_id() {
    let state = shared(MockState {
        users: vec![
            json!({ "id": "D001", "username": "fresh_dist", "role": "Distributor" }),
            json!({ "id": "S001", "username": "supplier1", "role": "Supplier" }),
        ],
        ..Default::default()
    });
    let config = spawn(state.clone()).await;
    let session = logged_in(Role::Admin, "A001", "root");
    let mut directory = UserDirectory::open(BackendClient::new(&config).unwrap(), session).unwrap();
    directory.refresh().await;

    let form = UserForm {
        username: "cold_chain".into(),
        email: "ops@coldchain.io".into(),
        wallet_address: WALLET.into(),
        phone_no: "0123456789".into(),
        role: Some(Role::Distributor),
        mnemonic: common::mnemonic(),
        ..UserForm::add()
    };
    let id = directory.save(form).await.unwrap();

    assert_eq!(id, "D002");
    assert_eq!(directory.users().len(), 3);
    let state = state.lock().unwrap();
    let fields = &state.saved_users[0];
    assert_eq!(fields["id"], "D002");
    assert_eq!(fields["role"], "Distributor");
    assert_eq!(fields["wallet_address"], WALLET);
    assert!(!fields.contains_key("license"));
}

#[tokio::test]
async fn test_regulatory_ledger_survives_missing_collections() {
    let state = shared(MockState {
        freshness_records: vec![
            json!({ "product_id": "PID1", "freshness_label": "Fresh", "created_at": "2025-05-01T08:00:00Z" }),
            json!({ "product_id": "PID2", "freshness_label": "Spoiled", "created_at": "2025-05-20T08:00:00Z" }),
        ],
        ..Default::default()
    });
    let config = spawn(state.clone()).await;
    let backend = BackendClient::new(&config).unwrap();
    let session = logged_in(Role::Regulatory, "R001", "inspector");

    let mut view = LedgerView::load(&backend, LedgerProfile::RegulatoryDatabase, &session)
        .await
        .unwrap();

    assert_eq!(view.filtered().len(), 2);
    view.set_source(LedgerSource::Company).unwrap();
    assert_eq!(view.filtered().len(), 2);
    view.set_source(LedgerSource::Supplier).unwrap();
    assert!(view.filtered().is_empty());

    view.set_kind(LedgerKind::Transaction);
    assert!(view.filtered().is_empty());
    assert!(state.lock().unwrap().called("GET /api/company-freshness-records"));
}

#[tokio::test]
async fn test_ledger_export_round_trips_through_csv() {
    let state = shared(MockState {
        freshness_records: vec![
            json!({ "product_id": "PID1", "product_name": "Tuna, \"AAA\"", "created_at": "2025-05-01T08:00:00Z" }),
            json!({ "product_id": "PID2", "product_name": "Cod", "created_at": "2025-06-11T08:00:00Z" }),
        ],
        ..Default::default()
    });
    let config = spawn(state.clone()).await;
    let backend = BackendClient::new(&config).unwrap();
    let session = logged_in(Role::Regulatory, "R001", "inspector");

    let mut view = LedgerView::load(&backend, LedgerProfile::RegulatoryDatabase, &session)
        .await
        .unwrap();
    view.set_dates(
        Some("2025-05-01".parse().unwrap()),
        Some("2025-05-31".parse().unwrap()),
    );

    let dir = temp_dir();
    let path = view.export_csv(&dir).unwrap();
    assert!(path.ends_with("freshness_records_2025-05-01_to_2025-05-31.csv"));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "product_id");
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "Tuna, \"AAA\"");

    std::fs::remove_dir_all(dir).ok();
}

#[tokio::test]
async fn test_company_received_records_render_without_readings() {
    let state = shared(MockState {
        received_records: vec![
            json!({
                "product_id": "PID1",
                "product_name": "Tuna",
                "quantity": "12",
                "created_at": "2025-05-01T08:00:00Z",
                "source": "supplier1",
                "freshness_label": "Fresh"
            }),
            json!({
                "product_id": "PID2",
                "product_name": "Cod",
                "quantity": 4,
                "source": "supplier2",
                "freshness_label": "Moderate"
            }),
        ],
        ..Default::default()
    });
    let config = spawn(state.clone()).await;
    let session = logged_in(Role::Company, "C001", "ocean_co");
    let mut page: RecordPage<CatchRecord> =
        RecordPage::open(BackendClient::new(&config).unwrap(), session, Page::CatchRecords).unwrap();

    page.refresh().await;

    assert_eq!(page.records().len(), 2);
    assert_eq!(page.records()[0].quantity, 12.0);
    page.set_search("supplier2");
    assert_eq!(page.visible().len(), 1);
    assert!(state.lock().unwrap().called("GET /api/company-received-records"));
}
