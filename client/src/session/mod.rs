// Persisted login session

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::{LoginUser, Role};

/// Number of words in a valid wallet mnemonic
pub const MNEMONIC_WORDS: usize = 25;

/// The logged-in user as every page sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

impl Session {
    /// Guest session: only the role marker is stored
    pub fn customer() -> Self {
        Self {
            role: Role::Customer,
            user_id: None,
            username: None,
            wallet_address: None,
            mnemonic: None,
        }
    }

    /// Session for a credentialed login. Wallet credentials are kept only
    /// when the backend returned a wallet address.
    pub fn from_login(user: LoginUser) -> Self {
        let (wallet_address, mnemonic) = match user.wallet_address.filter(|w| !w.is_empty()) {
            Some(wallet) => (Some(wallet), user.mnemonic),
            None => (None, None),
        };
        Self {
            role: user.role,
            user_id: Some(user.id),
            username: Some(user.username),
            wallet_address,
            mnemonic,
        }
    }

    pub fn require_user_id(&self) -> SeaBlockResult<&str> {
        self.user_id
            .as_deref()
            .ok_or_else(|| SeaBlockError::Session("No user id in session. Please log in.".into()))
    }

    pub fn require_username(&self) -> SeaBlockResult<&str> {
        self.username
            .as_deref()
            .ok_or_else(|| SeaBlockError::Session("No username in session. Please log in.".into()))
    }

    pub fn require_wallet(&self) -> SeaBlockResult<&str> {
        self.wallet_address
            .as_deref()
            .ok_or_else(|| SeaBlockError::Session("No wallet address in session.".into()))
    }

    /// The mnemonic, provided it has exactly 25 words
    pub fn require_mnemonic(&self) -> SeaBlockResult<&str> {
        match self.mnemonic.as_deref() {
            Some(m) if m.split(' ').count() == MNEMONIC_WORDS => Ok(m),
            _ => Err(SeaBlockError::Session(
                "Mnemonic is missing or invalid. Please log in again.".into(),
            )),
        }
    }
}

/// File-backed session storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the session; a missing file means nobody is logged in
    pub fn load(&self) -> SeaBlockResult<Option<Session>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Loads the session or fails with a prompt to log in
    pub fn require(&self) -> SeaBlockResult<Session> {
        self.load()?
            .ok_or_else(|| SeaBlockError::Session("Not logged in. Run `seablock login` first.".into()))
    }

    pub fn save(&self, session: &Session) -> SeaBlockResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Logout: drops every persisted key at once
    pub fn clear(&self) -> SeaBlockResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
