//! Login against the backend

use async_trait::async_trait;

use super::ControllerResult;
use crate::auth::WordPressLogin;

#[async_trait]
pub trait AuthController: Send + Sync {
    /// Exchange credentials for a backend token and the user it belongs to
    async fn login(&self, username: &str, password: &str)
        -> ControllerResult<Option<WordPressLogin>>;
}
