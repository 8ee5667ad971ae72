//! Notification center: the user's latest notifications and read state.
//!
//! Local state changes only after the backend confirms; failures leave the
//! list as it was and queue an error notice.

use crate::model::account::UserId;
use crate::model::notification::{Notification, NotificationId};
use crate::repo::backend_types::BackendResult;
use crate::repo::notification_repo::NotificationStore;
use crate::service::notice::Notice;
use log::{error, info};

/// How many notifications the center shows.
pub const NOTIFICATION_PAGE_SIZE: u32 = 20;

pub const MSG_UPDATE_FAILED: &str = "Erreur lors de la mise à jour";
pub const MSG_ALL_READ: &str = "Toutes les notifications marquées comme lues";
pub const MSG_DELETE_FAILED: &str = "Erreur lors de la suppression";

pub struct NotificationCenter<'a, B: NotificationStore + ?Sized> {
    backend: &'a B,
    user_id: UserId,
    items: Vec<Notification>,
    notices: Vec<Notice>,
}

impl<'a, B: NotificationStore + ?Sized> NotificationCenter<'a, B> {
    pub fn new(backend: &'a B, user_id: UserId) -> Self {
        Self {
            backend,
            user_id,
            items: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Loads the newest `NOTIFICATION_PAGE_SIZE` rows. Errors keep the old list.
    pub fn refresh(&mut self) -> BackendResult<()> {
        match self
            .backend
            .list_notifications(self.user_id, NOTIFICATION_PAGE_SIZE)
        {
            Ok(items) => {
                info!(
                    "event=notifications_load module=service status=ok count={}",
                    items.len()
                );
                self.items = items;
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=notifications_load module=service status=error error_code={}",
                    err.code
                );
                Err(err)
            }
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    pub fn mark_read(&mut self, id: NotificationId) -> BackendResult<()> {
        if let Err(err) = self.backend.mark_notification_read(id) {
            self.fail("notification_read", err.code, MSG_UPDATE_FAILED);
            return Err(err);
        }
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            item.read = true;
        }
        Ok(())
    }

    pub fn mark_all_read(&mut self) -> BackendResult<()> {
        if let Err(err) = self.backend.mark_all_notifications_read(self.user_id) {
            self.fail("notifications_read_all", err.code, MSG_UPDATE_FAILED);
            return Err(err);
        }
        for item in &mut self.items {
            item.read = true;
        }
        self.notices.push(Notice::success(MSG_ALL_READ));
        Ok(())
    }

    pub fn delete(&mut self, id: NotificationId) -> BackendResult<()> {
        if let Err(err) = self.backend.delete_notification(id) {
            self.fail("notification_delete", err.code, MSG_DELETE_FAILED);
            return Err(err);
        }
        self.items.retain(|item| item.id != id);
        Ok(())
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn fail(&mut self, event: &str, code: &str, message: &str) {
        error!("event={event} module=service status=error error_code={code}");
        self.notices.push(Notice::error(message));
    }
}
