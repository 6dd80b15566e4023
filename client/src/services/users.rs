// Admin user management

use reqwest::multipart::{Form, Part};
use tracing::info;

use super::submission::save_failed;
use super::{Confirm, RecordPage};
use crate::api::BackendClient;
use crate::capabilities::Page;
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::{Role, User};
use crate::session::Session;
use crate::validation::{is_valid_email, is_valid_wallet_address, require_all};

/// Next free id for a role: prefix plus the count of ids already using it
pub fn next_user_id(role: Role, users: &[User]) -> String {
    let prefix = role.id_prefix();
    let taken = users.iter().filter(|u| u.id.starts_with(prefix)).count();
    format!("{}{:03}", prefix, taken + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// A license document attached to the user form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserForm {
    pub mode: FormMode,
    pub id: String,
    pub username: String,
    pub email: String,
    pub wallet_address: String,
    pub phone_no: String,
    pub role: Option<Role>,
    /// Required when adding; never pre-filled when editing
    pub mnemonic: String,
    pub license: Option<LicenseFile>,
    pub existing_license: Option<String>,
}

impl UserForm {
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            id: String::new(),
            username: String::new(),
            email: String::new(),
            wallet_address: String::new(),
            phone_no: String::new(),
            role: None,
            mnemonic: String::new(),
            license: None,
            existing_license: None,
        }
    }

    pub fn edit(user: &User) -> Self {
        Self {
            mode: FormMode::Edit,
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            wallet_address: user.wallet_address.clone(),
            phone_no: user.phone_no.clone(),
            role: Some(user.role),
            mnemonic: String::new(),
            license: None,
            existing_license: user.license.clone().filter(|l| !l.is_empty()),
        }
    }

    /// Returns the selected role once every check passes
    pub fn validate(&self) -> SeaBlockResult<Role> {
        let missing = match self.mode {
            FormMode::Add => "Please fill in all required fields including mnemonic.",
            FormMode::Edit => "Please fill in all required fields.",
        };
        require_all(
            &[&self.username, &self.email, &self.wallet_address, &self.phone_no],
            missing,
        )?;
        if self.mode == FormMode::Add {
            require_all(&[&self.mnemonic], missing)?;
        }
        let role = self
            .role
            .ok_or_else(|| SeaBlockError::Validation(missing.to_string()))?;

        if !is_valid_email(&self.email) {
            return Err(SeaBlockError::Validation("Invalid email format.".to_string()));
        }
        if !is_valid_wallet_address(&self.wallet_address) {
            return Err(SeaBlockError::Validation("Invalid wallet address.".to_string()));
        }
        Ok(role)
    }

    fn into_multipart(self, id: &str, role: Role) -> Form {
        let form = Form::new()
            .text("id", id.to_string())
            .text("username", self.username)
            .text("email", self.email)
            .text("wallet_address", self.wallet_address)
            .text("phone_no", self.phone_no)
            .text("role", role.as_str())
            .text("mnemonic", self.mnemonic);
        match self.license {
            Some(file) => form.part("license", Part::bytes(file.contents).file_name(file.file_name)),
            None => form,
        }
    }
}

/// The admin's user table with a role filter
pub struct UserDirectory {
    page: RecordPage<User>,
    role_filter: Option<Role>,
}

impl UserDirectory {
    pub fn open(backend: BackendClient, session: Session) -> SeaBlockResult<Self> {
        Ok(Self {
            page: RecordPage::open(backend, session, Page::Users)?,
            role_filter: None,
        })
    }

    pub async fn refresh(&mut self) {
        self.page.refresh().await;
    }

    pub fn users(&self) -> &[User] {
        self.page.records()
    }

    pub fn find(&self, id: &str) -> Option<&User> {
        self.page.find(id)
    }

    /// `None` shows every role
    pub fn set_role_filter(&mut self, role: Option<Role>) {
        self.role_filter = role;
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.page.set_search(term);
    }

    pub fn visible(&self) -> Vec<&User> {
        self.page
            .visible()
            .into_iter()
            .filter(|u| self.role_filter.map_or(true, |role| u.role == role))
            .collect()
    }

    /// Adds or updates the user (the backend upserts by id) and reloads the table.
    /// Returns the id the user was saved under.
    pub async fn save(&mut self, form: UserForm) -> SeaBlockResult<String> {
        self.page.ensure_can_create()?;
        let role = form.validate()?;
        let id = match form.mode {
            FormMode::Edit => form.id.clone(),
            FormMode::Add => next_user_id(role, self.users()),
        };

        self.page
            .backend()
            .save_user(form.into_multipart(&id, role))
            .await
            .map_err(save_failed)?;
        info!("User {} saved", id);

        self.refresh().await;
        Ok(id)
    }

    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> SeaBlockResult<bool> {
        self.page.delete(id, confirm).await
    }

    /// Link to the user's uploaded license, if any
    pub fn license_url(&self, user: &User) -> Option<String> {
        user.license
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| self.page.backend().license_url(l))
    }
}
