#![allow(dead_code)]
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{IdentityError, IdentityService};
use crate::models::user::AuthUser;

#[derive(Default)]
pub struct MockIdentityService {
    pub users: HashMap<String, AuthUser>,
    pub error: Option<String>,
    pub lookups: Mutex<Vec<String>>,
}

impl MockIdentityService {
    pub fn with_user(mut self, user: AuthUser) -> Self {
        self.users.insert(user.id.to_string(), user);
        self
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }
}

#[async_trait]
impl IdentityService for MockIdentityService {
    async fn get_user_by_id(&self, user_id: &str) -> Result<Option<AuthUser>, IdentityError> {
        self.lookups.lock().unwrap().push(user_id.to_string());
        if let Some(message) = &self.error {
            return Err(IdentityError::Api(message.clone()));
        }
        Ok(self.users.get(user_id).cloned())
    }
}
