//! Notifications

use async_trait::async_trait;

use super::ControllerResult;
use crate::models::Notification;

#[async_trait]
pub trait NotificationController: Send + Sync {
    async fn get_all_notifications(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Notification>>>;

    async fn delete_notification(
        &self,
        token: &str,
        user_id: &str,
        notification_id: &str,
    ) -> ControllerResult<()>;

    async fn delete_all_notifications(&self, token: &str, user_id: &str) -> ControllerResult<()>;
}
