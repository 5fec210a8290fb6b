//! Community membership

use async_trait::async_trait;
use serde_json::Value;

use super::ControllerResult;
use crate::models::Community;

#[async_trait]
pub trait CommunityController: Send + Sync {
    async fn get_all_communities(&self, token: &str) -> ControllerResult<Option<Vec<Community>>>;

    async fn join_community(
        &self,
        token: &str,
        user_id: &str,
        community_id: &str,
    ) -> ControllerResult<Option<Value>>;

    async fn leave_community(
        &self,
        token: &str,
        user_id: &str,
        community_id: &str,
    ) -> ControllerResult<()>;
}
