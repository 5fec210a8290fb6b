//! Feed, bookmarks and sharing

use async_trait::async_trait;
use serde_json::Value;

use super::ControllerResult;
use crate::models::Post;

#[async_trait]
pub trait FeedController: Send + Sync {
    /// Posts visible to the caller; `page` is passed through untouched
    async fn get_feed(&self, token: &str, page: Option<&str>) -> ControllerResult<Option<Vec<Post>>>;

    async fn get_all_saved_posts(
        &self,
        token: &str,
        user_id: &str,
    ) -> ControllerResult<Option<Vec<Post>>>;

    async fn save_post(
        &self,
        token: &str,
        user_id: &str,
        post_id: &str,
    ) -> ControllerResult<Option<Value>>;

    async fn unsave_post(&self, token: &str, user_id: &str, post_id: &str)
        -> ControllerResult<()>;

    async fn share_post(
        &self,
        token: &str,
        user_id: &str,
        post_id: &str,
    ) -> ControllerResult<Option<Value>>;
}
