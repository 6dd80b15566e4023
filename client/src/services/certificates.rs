// Trade certificates: company uploads and the regulator's listing

use std::path::Path;

use tracing::info;

use super::submission::save_failed;
use super::RecordPage;
use crate::api::BackendClient;
use crate::capabilities::Page;
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::{Role, TradeCertificate};
use crate::session::Session;

/// File types the upload form accepts
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "jpg", "png"];

fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether a stored license can be shown inline rather than linked
pub fn is_image(file_name: &str) -> bool {
    matches!(extension(file_name).as_deref(), Some("jpg" | "jpeg" | "png"))
}

/// Where a stored certificate can be viewed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateLink {
    pub file_name: String,
    pub url: String,
    pub is_image: bool,
}

/// A company's own trade certificate
pub struct CertificateCenter<'a> {
    backend: &'a BackendClient,
    session: &'a Session,
}

impl<'a> CertificateCenter<'a> {
    pub fn new(backend: &'a BackendClient, session: &'a Session) -> SeaBlockResult<Self> {
        if session.role != Role::Company {
            return Err(SeaBlockError::Validation(
                "Only companies upload trade certificates".to_string(),
            ));
        }
        Ok(Self { backend, session })
    }

    /// Reads a file from disk and uploads it
    pub async fn upload_file(&self, path: &Path) -> SeaBlockResult<()> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let contents = tokio::fs::read(path).await?;
        self.upload(&file_name, contents).await
    }

    pub async fn upload(&self, file_name: &str, contents: Vec<u8>) -> SeaBlockResult<()> {
        if file_name.is_empty() {
            return Err(SeaBlockError::Validation(
                "Please select a certificate file.".to_string(),
            ));
        }
        match extension(file_name) {
            Some(ext) if ACCEPTED_EXTENSIONS.contains(&ext.as_str()) => {}
            _ => {
                return Err(SeaBlockError::Validation(format!(
                    "Certificates must be one of: {}",
                    ACCEPTED_EXTENSIONS.join(", ")
                )))
            }
        }
        let user_id = self.session.require_user_id()?;

        self.backend
            .upload_certificate(user_id, file_name, contents)
            .await
            .map_err(save_failed)?;
        info!("Certificate {} uploaded for {}", file_name, user_id);
        Ok(())
    }

    /// The certificate currently stored on the company's user row
    pub async fn current_license(&self) -> SeaBlockResult<Option<CertificateLink>> {
        let user_id = self.session.require_user_id()?;
        Ok(self
            .backend
            .user_license(user_id)
            .await?
            .map(|file_name| CertificateLink {
                url: self.backend.certificate_url(&file_name),
                is_image: is_image(&file_name),
                file_name,
            }))
    }
}

/// The regulator's searchable certificate table
pub fn certificate_register(
    backend: BackendClient,
    session: Session,
) -> SeaBlockResult<RecordPage<TradeCertificate>> {
    RecordPage::open(backend, session, Page::TradeRecord)
}
