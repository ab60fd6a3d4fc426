use async_trait::async_trait;

use crate::models::user::AuthUser;

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("{0}")]
    Api(String),
    #[error("identity service unreachable: {0}")]
    Transport(String),
    #[error("invalid user payload: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        IdentityError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait IdentityService: Send + Sync {
    /// `Ok(None)` when the service reports no such user.
    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<AuthUser>, IdentityError>;
}

mod mock;
mod supabase;

#[allow(unused_imports)]
pub use mock::MockIdentityService;
pub use supabase::SupabaseIdentityClient;
