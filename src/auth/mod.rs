//! Authentication and session management

pub mod jwt;
pub mod middleware;
pub mod models;
pub mod session;

pub use jwt::{create_token, decode_wordpress_token, validate_token, SessionClaims, WordPressClaims};
pub use middleware::{session_token_candidates, CurrentSession};
pub use models::{AuthenticatedUser, LoginResponse, WordPressLogin};
pub use session::{Session, SessionStore};
