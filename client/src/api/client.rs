use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::{check, decode, http_client, Collection};
use crate::config::ClientConfig;
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::{
    BalanceReply, DistributorLedger, Feedback, LoginResponse, LoginUser, Notification, Role, Row,
};

/// Record tables that accept update and delete by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordEndpoint {
    CatchRecords,
    ProcessRecords,
    Transactions,
    Users,
}

impl RecordEndpoint {
    pub fn path(&self) -> &'static str {
        match self {
            RecordEndpoint::CatchRecords => "/api/catch-records",
            RecordEndpoint::ProcessRecords => "/api/process-records",
            RecordEndpoint::Transactions => "/api/transactions",
            RecordEndpoint::Users => "/api/users",
        }
    }
}

/// Who gets told about a new feedback comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyTarget {
    Sender,
    EndUser,
}

impl NotifyTarget {
    fn path(&self) -> &'static str {
        match self {
            NotifyTarget::Sender => "/api/notify-sender",
            NotifyTarget::EndUser => "/api/notify-enduser",
        }
    }
}

#[derive(Debug, Deserialize)]
struct UserLicense {
    #[serde(default)]
    license: Option<String>,
}

/// Client for the SeaBlock backend REST API
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    api_url: String,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(config: &ClientConfig) -> SeaBlockResult<Self> {
        Ok(Self {
            client: http_client(config)?,
            api_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.api_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// `POST /api/login`. Anything but a 200 carrying a user is a failure.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        required_role: Role,
    ) -> SeaBlockResult<LoginUser> {
        let response = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({
                "username": username,
                "useid": password,
                "requiredRole": required_role,
            }))
            .send()
            .await?;
        let status = response.status();
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| SeaBlockError::Decode(format!("login response: {}", e)))?;

        match body.user {
            Some(user) if status == StatusCode::OK => Ok(user),
            _ => Err(SeaBlockError::Status {
                status,
                message: body.error.unwrap_or_else(|| "Login failed".to_string()),
            }),
        }
    }

    /// Fetch a whole collection as typed records
    pub async fn list<T: DeserializeOwned>(&self, collection: &Collection) -> SeaBlockResult<Vec<T>> {
        debug!("GET {} {:?}", collection.path(), collection.query());
        let response = self
            .client
            .get(self.url(collection.path()))
            .query(&collection.query())
            .send()
            .await?;
        decode(response).await
    }

    /// Fetch a whole collection as untyped rows
    pub async fn list_rows(&self, collection: &Collection) -> SeaBlockResult<Vec<Row>> {
        self.list::<Row>(collection).await
    }

    pub async fn create<B: Serialize + ?Sized>(
        &self,
        endpoint: RecordEndpoint,
        body: &B,
    ) -> SeaBlockResult<()> {
        let response = self
            .client
            .post(self.url(endpoint.path()))
            .json(body)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn update<B: Serialize + ?Sized>(
        &self,
        endpoint: RecordEndpoint,
        id: &str,
        body: &B,
    ) -> SeaBlockResult<()> {
        let response = self
            .client
            .put(format!("{}/{}", self.url(endpoint.path()), id))
            .json(body)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn delete(&self, endpoint: RecordEndpoint, id: &str) -> SeaBlockResult<()> {
        let response = self
            .client
            .delete(format!("{}/{}", self.url(endpoint.path()), id))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// `GET /api/shared-ledger-distributor`
    pub async fn shared_ledger_distributor(
        &self,
        distributor_name: &str,
    ) -> SeaBlockResult<DistributorLedger> {
        let response = self
            .client
            .get(self.url("/api/shared-ledger-distributor"))
            .query(&[("distributorName", distributor_name)])
            .send()
            .await?;
        decode(response).await
    }

    /// `GET /api/balance?address=`
    pub async fn balance(&self, address: &str) -> SeaBlockResult<BalanceReply> {
        let response = self
            .client
            .get(self.url("/api/balance"))
            .query(&[("address", address)])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn notifications(&self, user_id: &str) -> SeaBlockResult<Vec<Notification>> {
        let response = self
            .client
            .get(self.url("/api/notifications"))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        decode(response).await
    }

    pub async fn mark_notification_read(&self, id: &str) -> SeaBlockResult<()> {
        let response = self
            .client
            .patch(self.url(&format!("/api/notifications/{}/read", id)))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// Feedback left on one transaction
    pub async fn feedback_for(&self, transaction_id: &str) -> SeaBlockResult<Vec<Feedback>> {
        let response = self
            .client
            .get(self.url(&format!("/api/feedback/{}", transaction_id)))
            .send()
            .await?;
        decode(response).await
    }

    pub async fn post_feedback(
        &self,
        transaction_id: &str,
        user_id: &str,
        comment: &str,
    ) -> SeaBlockResult<()> {
        let response = self
            .client
            .post(self.url("/api/feedback"))
            .json(&json!({
                "transaction_id": transaction_id,
                "user_id": user_id,
                "comment": comment,
            }))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// The backend decides whether `user_id` may edit this comment
    pub async fn patch_feedback(
        &self,
        feedback_id: &str,
        user_id: &str,
        comment: &str,
    ) -> SeaBlockResult<()> {
        let response = self
            .client
            .patch(self.url(&format!("/api/feedback/{}", feedback_id)))
            .json(&json!({ "comment": comment, "user_id": user_id }))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn notify(
        &self,
        target: NotifyTarget,
        transaction_id: &str,
        comment: &str,
    ) -> SeaBlockResult<()> {
        let response = self
            .client
            .post(self.url(target.path()))
            .json(&json!({ "transaction_id": transaction_id, "comment": comment }))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// License file name stored on a user
    pub async fn user_license(&self, user_id: &str) -> SeaBlockResult<Option<String>> {
        let response = self
            .client
            .get(self.url(&format!("/api/users/{}", user_id)))
            .send()
            .await?;
        let user: UserLicense = decode(response).await?;
        Ok(user.license.filter(|l| !l.is_empty()))
    }

    /// `POST /api/users` (multipart). The backend upserts by id.
    pub async fn save_user(&self, form: Form) -> SeaBlockResult<()> {
        let response = self
            .client
            .post(self.url("/api/users"))
            .multipart(form)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    pub async fn upload_certificate(
        &self,
        user_id: &str,
        file_name: &str,
        contents: Vec<u8>,
    ) -> SeaBlockResult<()> {
        let form = Form::new()
            .part("license", Part::bytes(contents).file_name(file_name.to_string()))
            .text("userId", user_id.to_string());
        let response = self
            .client
            .post(self.url("/api/upload-certificate"))
            .multipart(form)
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// Static route for a user's uploaded license
    pub fn license_url(&self, file: &str) -> String {
        self.url(&format!("/uploads/{}", file))
    }

    /// Static route for a company's trade certificate
    pub fn certificate_url(&self, file: &str) -> String {
        self.url(&format!("/uploads/company-certificates/{}", file))
    }
}
