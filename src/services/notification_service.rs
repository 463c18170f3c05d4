//! Notification service: per-user inbox operations.

use crate::error::{AppError, AppResult};
use crate::models::Notification;
use crate::repositories::NotificationRepository;

#[derive(Clone)]
pub struct NotificationService {
    repo: NotificationRepository,
}

impl NotificationService {
    pub fn new(repo: NotificationRepository) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        user_id: i32,
        unread_only: bool,
        page: i64,
        per_page: i64,
    ) -> AppResult<Vec<Notification>> {
        let offset = (page - 1) * per_page;
        self.repo
            .list_by_user(user_id, unread_only, per_page, offset)
            .await
    }

    pub async fn unread_count(&self, user_id: i32) -> AppResult<i64> {
        self.repo.unread_count(user_id).await
    }

    pub async fn mark_read(&self, notification_id: i64, user_id: i32) -> AppResult<()> {
        let affected = self.repo.mark_read(notification_id, user_id).await?;
        if affected == 0 {
            return Err(AppError::not_found("Notification", notification_id));
        }
        Ok(())
    }

    /// Returns how many notifications were marked.
    pub async fn mark_all_read(&self, user_id: i32) -> AppResult<usize> {
        self.repo.mark_all_read(user_id).await
    }
}
