//! Profile and private messaging

use async_trait::async_trait;
use serde_json::Value;

use super::ControllerResult;
use crate::models::{Conversation, Message};

#[async_trait]
pub trait UserController: Send + Sync {
    async fn get_profile(&self, token: &str, user_id: &str) -> ControllerResult<Option<Value>>;

    async fn get_message_conversations(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Conversation>>>;

    async fn get_messages(
        &self,
        token: &str,
        conversation_id: &str,
    ) -> ControllerResult<Option<Vec<Message>>>;

    async fn send_message(
        &self,
        token: &str,
        user_id: &str,
        conversation_id: &str,
        message: &str,
    ) -> ControllerResult<Option<Message>>;
}
