use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account record owned by the identity service. Read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}
