mod common;

use serde_json::json;

use common::{logged_in, shared, spawn, MockState, WALLET};
use seablock_client::models::{CatchRecord, ProcessMethod, ProcessRecord, Role, SensorReadings};
use seablock_client::services::catch_service::{CatchForm, CatchService};
use seablock_client::services::process_service::{ProcessForm, ProcessService};
use seablock_client::services::transaction_service::{TransactionForm, TransactionService};
use seablock_client::services::{AutoConfirm, Clients, SubmissionOutcome};
use seablock_client::SeaBlockError;

fn catch_form() -> CatchForm {
    CatchForm {
        product_name: "Yellowfin Tuna".into(),
        quantity: 25.6,
        readings: SensorReadings {
            dissolved_oxygen: 7.8,
            temperature: -5.7,
            ph_level: 7.2,
            ammonia: 0.4,
            metals: 0.1,
            bacteria: 12.9,
        },
    }
}

#[tokio::test]
async fn test_spoiled_catch_is_never_saved() {
    let state = shared(MockState {
        verify_reply: json!({
            "status": "success",
            "freshness_score": 8.5,
            "freshness_label": "Spoiled",
            "tx_id": "ALGOTX1"
        }),
        ..Default::default()
    });
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Supplier, "S001", "supplier1");

    let outcome = CatchService::new(&clients, &session)
        .create(&catch_form(), &AutoConfirm(true))
        .await
        .unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Blocked { ref label, .. } if label == "Spoiled"));
    let state = state.lock().unwrap();
    assert!(state.called("POST /api/verify-freshness"));
    assert!(!state.called("POST /api/catch-records"));
    assert!(!state.called("GET /api/balance"));
}

#[tokio::test]
async fn test_fresh_catch_is_saved_with_raw_readings() {
    let state = shared(MockState {
        verify_reply: json!({
            "status": "success",
            "freshness_score": 91.2,
            "freshness_label": "Fresh",
            "tx_id": "ALGOTX2"
        }),
        ..Default::default()
    });
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Supplier, "S001", "supplier1");

    let outcome = CatchService::new(&clients, &session)
        .create(&catch_form(), &AutoConfirm(true))
        .await
        .unwrap();

    match outcome {
        SubmissionOutcome::Completed { record_id, balance } => {
            assert!(record_id.starts_with("PID"));
            assert_eq!(balance.to_string(), "3.250");
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let state = state.lock().unwrap();
    let verified = state.body_of("POST /api/verify-freshness").unwrap();
    assert_eq!(verified["temperature"], -5);
    assert_eq!(verified["pH_level"], 7);
    assert_eq!(verified["mnemonic"].as_str().unwrap().split(' ').count(), 25);

    let saved = state.body_of("POST /api/catch-records").unwrap();
    assert_eq!(saved["product_id"], verified["product_id"]);
    assert_eq!(saved["source"], "supplier1");
    assert_eq!(saved["supplier_id"], "S001");
    assert_eq!(saved["blockchain_tx_id"], "ALGOTX2");
    assert_eq!(saved["freshness_label"], "Fresh");
    assert_eq!(saved["quantity"], 25);
    assert_eq!(saved["temperature"], -5);
    assert_eq!(saved["bacteria"], 12);
}

#[tokio::test]
async fn test_failed_balance_lookup_is_partial_success() {
    let state = shared(MockState {
        verify_reply: json!({
            "status": "success",
            "freshness_score": 75,
            "freshness_label": "Moderate",
            "tx_id": "ALGOTX3"
        }),
        balance_fails: true,
        ..Default::default()
    });
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Supplier, "S001", "supplier1");

    let outcome = CatchService::new(&clients, &session)
        .create(&catch_form(), &AutoConfirm(true))
        .await
        .unwrap();

    assert!(matches!(outcome, SubmissionOutcome::SavedWithoutBalance { .. }));
    assert_eq!(outcome.title(), "Record Saved");
    assert_eq!(state.lock().unwrap().catch_records.len(), 1);
}

#[tokio::test]
async fn test_insufficient_balance_is_reported_in_algos() {
    let state = shared(MockState {
        verify_reply: json!({
            "status": "error",
            "error": "Insufficient ALGO balance to pay fees",
            "wallet_balance": 100000
        }),
        ..Default::default()
    });
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Supplier, "S001", "supplier1");

    let err = CatchService::new(&clients, &session)
        .create(&catch_form(), &AutoConfirm(true))
        .await
        .unwrap_err();

    assert_eq!(err.title(), "Not Enough ALGO");
    assert!(err.to_string().contains("Current balance: 0.100 Algos"));
    assert!(!state.lock().unwrap().called("POST /api/catch-records"));
}

#[tokio::test]
async fn test_invalid_mnemonic_stops_before_verification() {
    let state = shared(MockState::default());
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let mut session = logged_in(Role::Supplier, "S001", "supplier1");
    session.mnemonic = Some("too short".into());

    let err = CatchService::new(&clients, &session)
        .create(&catch_form(), &AutoConfirm(true))
        .await
        .unwrap_err();

    assert!(matches!(err, SeaBlockError::Session(_)));
    assert!(state.lock().unwrap().calls.is_empty());
}

#[tokio::test]
async fn test_declined_confirmation_sends_nothing() {
    let state = shared(MockState::default());
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Supplier, "S001", "supplier1");

    let outcome = CatchService::new(&clients, &session)
        .create(&catch_form(), &AutoConfirm(false))
        .await
        .unwrap();

    assert_eq!(outcome, SubmissionOutcome::Cancelled);
    assert!(state.lock().unwrap().calls.is_empty());
}

fn transaction_form() -> TransactionForm {
    TransactionForm {
        product_id: "PID1700000000000".into(),
        freshness: "Fresh".into(),
        amount: 40.0,
        expiry_date: "2025-09-30".into(),
        end_user: "ocean_co".into(),
        end_user_wallet: WALLET.into(),
    }
}

#[tokio::test]
async fn test_transaction_needs_a_ledger_id() {
    let state = shared(MockState {
        transaction_reply: json!({ "status": "success" }),
        ..Default::default()
    });
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Supplier, "S001", "supplier1");

    let err = TransactionService::new(&clients, &session)
        .create(&transaction_form(), &AutoConfirm(true))
        .await
        .unwrap_err();

    assert!(matches!(err, SeaBlockError::TransactionFailed(_)));
    assert!(!state.lock().unwrap().called("GET /api/balance"));
}

#[tokio::test]
async fn test_transaction_success_reports_balance() {
    let state = shared(MockState {
        transaction_reply: json!({ "status": "success", "tx_id": "ALGOTX9" }),
        ..Default::default()
    });
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Supplier, "S001", "supplier1");

    let outcome = TransactionService::new(&clients, &session)
        .create(&transaction_form(), &AutoConfirm(true))
        .await
        .unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Completed { ref record_id, .. } if record_id == "ALGOTX9"));
    let state = state.lock().unwrap();
    let sent = state.body_of("POST /api/create-transaction").unwrap();
    assert_eq!(sent["user_id"], "S001");
    assert_eq!(sent["amount"], 40);
    assert_eq!(sent["end_user_wallet"], WALLET);
}

fn process_form() -> ProcessForm {
    ProcessForm {
        product_name: "Smoked Mackerel".into(),
        quantity: 18.0,
        process_method: ProcessMethod::Smoking,
        readings: SensorReadings {
            dissolved_oxygen: 6.0,
            temperature: -5.0,
            ph_level: 7.0,
            ammonia: 1.0,
            metals: 0.0,
            bacteria: 8.0,
        },
    }
}

fn fresh_reply(tx_id: &str) -> serde_json::Value {
    json!({
        "status": "success",
        "freshness_score": 88,
        "freshness_label": "Fresh",
        "tx_id": tx_id
    })
}

#[tokio::test]
async fn test_process_create_verifies_shifted_and_stores_raw_temperature() {
    let state = shared(MockState {
        verify_reply: fresh_reply("ALGOTX20"),
        ..Default::default()
    });
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Company, "C001", "ocean_co");

    let outcome = ProcessService::new(&clients, &session)
        .create(&process_form(), &AutoConfirm(true))
        .await
        .unwrap();
    assert!(matches!(outcome, SubmissionOutcome::Completed { .. }));

    let state = state.lock().unwrap();
    let verified = state.body_of("POST /api/verify-freshness").unwrap();
    assert_eq!(verified["temperature"], -5 + 20);

    let saved = state.body_of("POST /api/process-records").unwrap();
    assert_eq!(saved["product_id"], verified["product_id"]);
    assert_eq!(saved["temperature"], -5);
    assert_eq!(saved["process_method"], "Smoking");
    assert_eq!(saved["source"], "ocean_co");
    assert_eq!(saved["company_id"], "C001");
    assert_eq!(saved["blockchain_tx_id"], "ALGOTX20");
    assert_eq!(saved["freshness_label"], "Fresh");
}

#[tokio::test]
async fn test_process_edit_reverifies_under_existing_id() {
    let state = shared(MockState {
        verify_reply: fresh_reply("ALGOTX21"),
        ..Default::default()
    });
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Company, "C001", "ocean_co");
    let existing: ProcessRecord = serde_json::from_value(json!({
        "product_id": "PID9",
        "product_name": "Smoked Mackerel",
        "quantity": 18,
        "process_method": "Smoking",
        "dissolved_oxygen": 6, "temperature": 2, "ph_level": 7,
        "ammonia": 1, "metals": 0, "bacteria": 8,
        "freshness_label": "Moderate",
        "source": "ocean_co"
    }))
    .unwrap();

    let mut form = ProcessForm::from_record(&existing).unwrap();
    form.readings.temperature = -8.0;
    ProcessService::new(&clients, &session)
        .edit(&existing, &form, &AutoConfirm(true))
        .await
        .unwrap();

    let state = state.lock().unwrap();
    let verified = state.body_of("POST /api/verify-freshness").unwrap();
    assert_eq!(verified["product_id"], "PID9");
    assert_eq!(verified["temperature"], 12);

    let updated = state.body_of("PUT /api/process-records/PID9").unwrap();
    assert_eq!(updated["temperature"], -8);
    assert_eq!(updated["freshness_label"], "Fresh");
    assert!(!state.called("POST /api/process-records"));
}

#[tokio::test]
async fn test_catch_edit_skips_verification_and_shifts_temperature() {
    let state = shared(MockState::default());
    let clients = Clients::new(&spawn(state.clone()).await).unwrap();
    let session = logged_in(Role::Supplier, "S001", "supplier1");
    let existing: CatchRecord = serde_json::from_value(json!({
        "product_id": "PID3",
        "product_name": "Yellowfin Tuna",
        "quantity": 25,
        "dissolved_oxygen": 7, "temperature": 3, "ph_level": 7,
        "ammonia": 0, "metals": 0, "bacteria": 12,
        "freshness_score": 80,
        "freshness_label": "Fresh",
        "source": "supplier1"
    }))
    .unwrap();

    let mut form = CatchForm::from_record(&existing);
    form.readings.temperature = -5.7;
    let outcome = CatchService::new(&clients, &session)
        .edit(&existing, &form, &AutoConfirm(true))
        .await
        .unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Updated { ref record_id } if record_id == "PID3"));
    let state = state.lock().unwrap();
    assert!(!state.called("POST /api/verify-freshness"));
    assert!(!state.called("GET /api/balance"));

    let updated = state.body_of("PUT /api/catch-records/PID3").unwrap();
    assert_eq!(updated["temperature"], 15);
    assert_eq!(updated["freshness_label"], "Fresh");
    assert_eq!(updated["freshness_score"], 80.0);
    assert_eq!(updated["source"], "supplier1");
}
