// Login and logout

use tracing::info;

use crate::api::BackendClient;
use crate::error::{SeaBlockError, SeaBlockResult};
use crate::models::Role;
use crate::routes::Route;
use crate::session::{Session, SessionStore};

const MISSING_FIELDS: &str = "Please fill in all required fields";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    RoleUnselected,
    RoleSelected(Role),
    /// Logged in and persisted
    Credentialed(Session),
}

/// The login screen: pick a role, then enter credentials unless browsing as a customer
pub struct LoginFlow {
    backend: BackendClient,
    store: SessionStore,
    state: LoginState,
}

impl LoginFlow {
    pub fn new(backend: BackendClient, store: SessionStore) -> Self {
        Self {
            backend,
            store,
            state: LoginState::RoleUnselected,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn select_role(&mut self, role: &str) -> SeaBlockResult<Role> {
        let role: Role = role.parse()?;
        self.state = LoginState::RoleSelected(role);
        Ok(role)
    }

    /// Customers enter as guests; every other role needs a username and password
    pub fn needs_credentials(&self) -> bool {
        !matches!(self.state, LoginState::RoleSelected(Role::Customer))
    }

    /// Logs in and persists the session. Returns where the user lands.
    pub async fn submit(&mut self, username: &str, password: &str) -> SeaBlockResult<Route> {
        let role = match &self.state {
            LoginState::RoleSelected(role) => *role,
            _ => return Err(SeaBlockError::Validation(MISSING_FIELDS.to_string())),
        };

        let session = if role == Role::Customer {
            Session::customer()
        } else {
            if username.trim().is_empty() || password.is_empty() {
                return Err(SeaBlockError::Validation(MISSING_FIELDS.to_string()));
            }
            let user = self.backend.login(username.trim(), password, role).await?;
            Session::from_login(user)
        };

        self.store.save(&session)?;
        info!(
            "Logged in as {} ({})",
            session.username.as_deref().unwrap_or("guest"),
            role
        );
        self.state = LoginState::Credentialed(session);
        Ok(role.home_route())
    }
}

/// Drops the whole session and returns to the login screen
pub fn logout(store: &SessionStore) -> SeaBlockResult<Route> {
    store.clear()?;
    Ok(Route::Login)
}
