use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::{IdentityError, IdentityService};
use crate::models::user::AuthUser;

/// Admin user lookup against the Supabase auth API using the service-role
/// key. Sessions are never persisted or refreshed.
pub struct SupabaseIdentityClient {
    client: Client,
    base_url: String,
    service_role_key: String,
}

impl SupabaseIdentityClient {
    pub fn new(client: Client, base_url: &str, service_role_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }
}

fn error_message(body: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.to_string())
}

#[async_trait]
impl IdentityService for SupabaseIdentityClient {
    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<AuthUser>, IdentityError> {
        let url = format!(
            "{}/auth/v1/admin/users/{}",
            self.base_url,
            urlencoding::encode(user_id)
        );

        let res = self
            .client
            .get(url)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: Value = res.json().await.unwrap_or(Value::Null);
        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| status.to_string());
            return Err(IdentityError::Api(message));
        }

        let user = body.get("user").cloned().unwrap_or(body);
        serde_json::from_value::<AuthUser>(user)
            .map(Some)
            .map_err(|e| IdentityError::InvalidResponse(e.to_string()))
    }
}
