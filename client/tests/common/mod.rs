// In-process stand-in for the SeaBlock backend and verification service

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};

use seablock_client::models::Role;
use seablock_client::{ClientConfig, Session};

pub const WALLET: &str = "ALGOWALLETADDRESSALGOWALLETADDRESSALGOWALLETADDRESSALGOWAL";

pub fn mnemonic() -> String {
    vec!["abandon"; 25].join(" ")
}

#[derive(Default)]
pub struct MockState {
    /// `METHOD /path` of every request, in arrival order
    pub calls: Vec<String>,
    /// JSON bodies received, keyed by `METHOD /path`
    pub bodies: Vec<(String, Value)>,
    pub verify_reply: Value,
    pub transaction_reply: Value,
    pub balance_fails: bool,
    pub catch_records: Vec<Value>,
    pub process_records: Vec<Value>,
    /// Rows served by `/api/company-received-records`
    pub received_records: Vec<Value>,
    pub transactions: Vec<Value>,
    pub notifications: Vec<Value>,
    pub feedback: Vec<Value>,
    pub freshness_records: Vec<Value>,
    pub users: Vec<Value>,
    pub saved_users: Vec<HashMap<String, String>>,
}

pub type Shared = Arc<Mutex<MockState>>;

impl MockState {
    pub fn called(&self, call: &str) -> bool {
        self.calls.iter().any(|c| c == call)
    }

    pub fn body_of(&self, call: &str) -> Option<&Value> {
        self.bodies.iter().find(|(c, _)| c == call).map(|(_, b)| b)
    }
}

async fn record_call(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let call = format!("{} {}", request.method(), request.uri().path());
    state.lock().unwrap().calls.push(call);
    next.run(request).await
}

fn keep_body(state: &Shared, call: &str, body: Value) {
    state.lock().unwrap().bodies.push((call.to_string(), body));
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == "supplier1" && body["useid"] == "secret" {
        Json(json!({
            "user": {
                "id": "S001",
                "username": "supplier1",
                "role": body["requiredRole"],
                "wallet_address": WALLET,
                "mnemonic": mnemonic()
            }
        }))
        .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid credentials" })),
        )
            .into_response()
    }
}

async fn verify_freshness(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    keep_body(&state, "POST /api/verify-freshness", body);
    let reply = state.lock().unwrap().verify_reply.clone();
    Json(reply)
}

async fn create_transaction(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    keep_body(&state, "POST /api/create-transaction", body);
    let reply = state.lock().unwrap().transaction_reply.clone();
    Json(reply)
}

async fn list_catch_records(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().catch_records.clone()))
}

async fn create_catch_record(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    keep_body(&state, "POST /api/catch-records", body.clone());
    state.lock().unwrap().catch_records.push(body);
    StatusCode::CREATED
}

async fn update_catch_record(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    keep_body(&state, &format!("PUT /api/catch-records/{}", id), body);
    StatusCode::OK
}

async fn list_process_records(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().process_records.clone()))
}

async fn create_process_record(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    keep_body(&state, "POST /api/process-records", body.clone());
    state.lock().unwrap().process_records.push(body);
    StatusCode::CREATED
}

async fn update_process_record(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    keep_body(&state, &format!("PUT /api/process-records/{}", id), body);
    StatusCode::OK
}

async fn list_received_records(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().received_records.clone()))
}

async fn balance(State(state): State<Shared>) -> Response {
    if state.lock().unwrap().balance_fails {
        return (StatusCode::INTERNAL_SERVER_ERROR, "node down").into_response();
    }
    Json(json!({ "status": "success", "balance": 3_250_000 })).into_response()
}

async fn list_transactions(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().transactions.clone()))
}

async fn delete_transaction(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = state.lock().unwrap();
    let before = state.transactions.len();
    state.transactions.retain(|tx| tx["id"].to_string() != id && tx["id"] != id.as_str());
    if state.transactions.len() == before {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Transaction not found" })),
        )
            .into_response()
    } else {
        StatusCode::OK.into_response()
    }
}

async fn list_notifications(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().notifications.clone()))
}

async fn read_notification(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    let mut state = state.lock().unwrap();
    for n in state.notifications.iter_mut() {
        if n["id"].to_string() == id {
            n["is_read"] = json!(true);
        }
    }
    StatusCode::OK
}

async fn list_feedback(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().feedback.clone()))
}

async fn feedback_thread(State(state): State<Shared>, Path(tx): Path<String>) -> Json<Value> {
    let thread = state
        .lock()
        .unwrap()
        .feedback
        .iter()
        .filter(|f| f["transaction_id"] == tx.as_str())
        .cloned()
        .collect();
    Json(Value::Array(thread))
}

async fn post_feedback(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    keep_body(&state, "POST /api/feedback", body.clone());
    let mut state = state.lock().unwrap();
    let id = state.feedback.len() + 1;
    state.feedback.push(json!({
        "id": id,
        "transaction_id": body["transaction_id"],
        "user_id": body["user_id"],
        "username": "ocean_co",
        "comment": body["comment"]
    }));
    StatusCode::CREATED
}

async fn notify_end_user(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    keep_body(&state, "POST /api/notify-enduser", body);
    StatusCode::OK
}

async fn notify_sender(State(state): State<Shared>, Json(body): Json<Value>) -> StatusCode {
    keep_body(&state, "POST /api/notify-sender", body);
    StatusCode::OK
}

async fn list_freshness(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().freshness_records.clone()))
}

async fn list_users(State(state): State<Shared>) -> Json<Value> {
    Json(Value::Array(state.lock().unwrap().users.clone()))
}

async fn save_user(State(state): State<Shared>, mut multipart: Multipart) -> StatusCode {
    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(String::from);
        let value = match file_name {
            Some(file_name) => file_name,
            None => field.text().await.unwrap_or_default(),
        };
        fields.insert(name, value);
    }

    let mut state = state.lock().unwrap();
    state.users.push(json!({
        "id": fields.get("id"),
        "username": fields.get("username"),
        "email": fields.get("email"),
        "wallet_address": fields.get("wallet_address"),
        "phone_no": fields.get("phone_no"),
        "role": fields.get("role"),
        "license": fields.get("license")
    }));
    state.saved_users.push(fields);
    StatusCode::OK
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/verify-freshness", post(verify_freshness))
        .route("/api/create-transaction", post(create_transaction))
        .route(
            "/api/catch-records",
            get(list_catch_records).post(create_catch_record),
        )
        .route("/api/catch-records/{id}", put(update_catch_record))
        .route(
            "/api/process-records",
            get(list_process_records).post(create_process_record),
        )
        .route("/api/process-records/{id}", put(update_process_record))
        .route("/api/company-received-records", get(list_received_records))
        .route("/api/balance", get(balance))
        .route("/api/transactions", get(list_transactions))
        .route("/api/transactions/{id}", delete(delete_transaction))
        .route("/api/transactions-company-sender", get(list_transactions))
        .route("/api/transactions-company-receiver", get(list_transactions))
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/{id}/read", patch(read_notification))
        .route("/api/feedback", get(list_feedback).post(post_feedback))
        .route("/api/feedback/{tx}", get(feedback_thread))
        .route("/api/notify-enduser", post(notify_end_user))
        .route("/api/notify-sender", post(notify_sender))
        .route("/api/freshness-records", get(list_freshness))
        .route("/api/company-freshness-records", get(list_freshness))
        .route("/api/users", get(list_users).post(save_user))
        .layer(middleware::from_fn_with_state(state.clone(), record_call))
        .with_state(state)
}

/// Serves the mock on an ephemeral port and returns a config pointing at it
pub async fn spawn(state: Shared) -> ClientConfig {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    let base = format!("http://{}", addr);
    ClientConfig::new(base.clone(), base)
}

pub fn shared(state: MockState) -> Shared {
    Arc::new(Mutex::new(state))
}

pub fn logged_in(role: Role, user_id: &str, username: &str) -> Session {
    Session {
        role,
        user_id: Some(user_id.to_string()),
        username: Some(username.to_string()),
        wallet_address: Some(WALLET.to_string()),
        mnemonic: Some(mnemonic()),
    }
}
