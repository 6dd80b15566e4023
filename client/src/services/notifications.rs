// Notification bell: pull-based unread list

use tracing::{error, info};

use crate::api::BackendClient;
use crate::error::SeaBlockResult;
use crate::models::Notification;

/// Notifications for one user, refreshed on demand
pub struct NotificationCenter {
    backend: BackendClient,
    user_id: Option<String>,
    notifications: Vec<Notification>,
    open: bool,
}

impl NotificationCenter {
    pub fn new(backend: BackendClient, user_id: Option<String>) -> Self {
        Self {
            backend,
            user_id,
            notifications: Vec::new(),
            open: false,
        }
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn unread_count(&self) -> usize {
        self.notifications.iter().filter(|n| !n.is_read).count()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens or closes the dropdown
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// Pulls the list again. Without a user id there is nothing to fetch.
    pub async fn refresh(&mut self) {
        let Some(user_id) = self.user_id.as_deref() else {
            return;
        };
        match self.backend.notifications(user_id).await {
            Ok(list) => self.notifications = list,
            Err(e) => {
                error!("Failed to fetch notifications for {}: {}", user_id, e);
                self.notifications.clear();
            }
        }
    }

    /// Marks one notification read on the server, then refetches
    pub async fn mark_as_read(&mut self, id: &str) -> SeaBlockResult<()> {
        self.backend.mark_notification_read(id).await?;
        info!("Notification {} marked as read", id);
        self.refresh().await;
        Ok(())
    }
}
