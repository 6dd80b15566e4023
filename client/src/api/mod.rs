// Typed HTTP layer for the SeaBlock backend and the verification service

pub mod client;
pub mod collection;
pub mod verifier;

pub use client::{BackendClient, NotifyTarget, RecordEndpoint};
pub use collection::Collection;
pub use verifier::VerifierClient;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{SeaBlockError, SeaBlockResult};

/// Builds the shared HTTP client; no timeout unless one is configured
fn http_client(config: &ClientConfig) -> SeaBlockResult<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.http_timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Turns any non-2xx response into `SeaBlockError::Status`.
/// The message is the body's `error` field when there is one.
async fn check(response: Response) -> SeaBlockResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| {
            if body.is_empty() {
                status.canonical_reason().unwrap_or("request failed").to_string()
            } else {
                body
            }
        });

    Err(SeaBlockError::Status { status, message })
}

/// Checks the status and decodes the JSON body
async fn decode<T: DeserializeOwned>(response: Response) -> SeaBlockResult<T> {
    let response = check(response).await?;
    let url = response.url().to_string();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| SeaBlockError::Decode(format!("{} ({})", e, url)))
}
