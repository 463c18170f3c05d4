//! Notification DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::api::dto::format_timestamp;
use crate::models::Notification;

/// Query parameters for the notification inbox.
#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationListParams {
    /// When true, only unread notifications are returned
    #[serde(default)]
    pub unread_only: bool,
}

/// Response body for a notification.
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationResponse {
    pub id: i64,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            kind: notification.kind,
            title: notification.title,
            body: notification.body,
            read: notification.read,
            created_at: format_timestamp(notification.created_at),
        }
    }
}

/// Response body for the unread counter.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountResponse {
    pub unread: i64,
}
