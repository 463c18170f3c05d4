//! Notification repository.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::db::AsyncDbPool;
use crate::error::AppError;
use crate::models::{NewNotification, Notification};

#[derive(Clone)]
pub struct NotificationRepository {
    pool: AsyncDbPool,
}

impl NotificationRepository {
    pub fn new(pool: AsyncDbPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new_notification: NewNotification) -> Result<Notification, AppError> {
        use crate::schema::notifications::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::insert_into(notifications)
            .values(&new_notification)
            .returning(Notification::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    pub async fn list_by_user(
        &self,
        for_user: i32,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, AppError> {
        use crate::schema::notifications::dsl::*;
        let mut conn = self.pool.get().await?;

        let mut statement = notifications
            .filter(user_id.eq(for_user))
            .select(Notification::as_select())
            .order(created_at.desc())
            .limit(limit)
            .offset(offset)
            .into_boxed();

        if unread_only {
            statement = statement.filter(read.eq(false));
        }

        statement.load(&mut conn).await.map_err(AppError::from)
    }

    pub async fn unread_count(&self, for_user: i32) -> Result<i64, AppError> {
        use crate::schema::notifications::dsl::*;
        let mut conn = self.pool.get().await?;

        notifications
            .filter(user_id.eq(for_user))
            .filter(read.eq(false))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(AppError::from)
    }

    /// Marks one notification read. The user filter keeps a user from
    /// touching someone else's notification.
    pub async fn mark_read(
        &self,
        notification_id: i64,
        for_user: i32,
    ) -> Result<usize, AppError> {
        use crate::schema::notifications::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(
            notifications
                .filter(id.eq(notification_id))
                .filter(user_id.eq(for_user)),
        )
        .set(read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(AppError::from)
    }

    pub async fn mark_all_read(&self, for_user: i32) -> Result<usize, AppError> {
        use crate::schema::notifications::dsl::*;
        let mut conn = self.pool.get().await?;

        diesel::update(
            notifications
                .filter(user_id.eq(for_user))
                .filter(read.eq(false)),
        )
        .set(read.eq(true))
        .execute(&mut conn)
        .await
        .map_err(AppError::from)
    }
}
