#![allow(dead_code)]
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::training_repository::{
    FailureOutcome, RepositoryError, StatusTransition, TrainingRepository,
};
use crate::models::training_model::{ModelRecord, ModelStatus};

/// In-memory stand-in for the models and credits tables.
#[derive(Default)]
pub struct MockTrainingRepository {
    pub models: Mutex<HashMap<String, ModelRecord>>,
    pub credits: Mutex<HashMap<Uuid, i32>>,
    pub should_fail: bool,
    pub finished_calls: Mutex<usize>,
    pub failed_calls: Mutex<usize>,
}

impl MockTrainingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(self, job_id: &str, user_id: Uuid, status: ModelStatus) -> Self {
        {
            let mut models = self.models.lock().unwrap();
            let id = models.len() as i64 + 1;
            models.insert(
                job_id.to_string(),
                ModelRecord {
                    id,
                    model_id: job_id.to_string(),
                    user_id,
                    status,
                    created_at: OffsetDateTime::now_utc(),
                },
            );
        }
        self
    }

    pub fn with_credits(self, user_id: Uuid, credits: i32) -> Self {
        self.credits.lock().unwrap().insert(user_id, credits);
        self
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Default::default()
        }
    }

    pub fn model(&self, job_id: &str) -> Option<ModelRecord> {
        self.models.lock().unwrap().get(job_id).cloned()
    }

    pub fn credits_for(&self, user_id: Uuid) -> Option<i32> {
        self.credits.lock().unwrap().get(&user_id).copied()
    }

    fn transition(&self, job_id: &str, to: ModelStatus) -> StatusTransition {
        let mut models = self.models.lock().unwrap();
        match models.get_mut(job_id) {
            Some(record) if record.status.is_terminal() => {
                StatusTransition::AlreadyTerminal(record.clone())
            }
            Some(record) => {
                record.status = to;
                StatusTransition::Applied(record.clone())
            }
            None => StatusTransition::Missing,
        }
    }
}

fn mock_failure() -> RepositoryError {
    RepositoryError::Database(sqlx::Error::Protocol("Mock DB failure".into()))
}

#[async_trait]
impl TrainingRepository for MockTrainingRepository {
    async fn find_model_by_job_id(
        &self,
        job_id: &str,
    ) -> Result<Option<ModelRecord>, RepositoryError> {
        if self.should_fail {
            return Err(mock_failure());
        }
        Ok(self.model(job_id))
    }

    async fn get_credit_balance(&self, user_id: Uuid) -> Result<i32, RepositoryError> {
        if self.should_fail {
            return Err(mock_failure());
        }
        self.credits_for(user_id)
            .ok_or(RepositoryError::CreditsNotFound(user_id))
    }

    async fn mark_model_finished(&self, job_id: &str) -> Result<StatusTransition, RepositoryError> {
        *self.finished_calls.lock().unwrap() += 1;
        if self.should_fail {
            return Err(mock_failure());
        }
        Ok(self.transition(job_id, ModelStatus::Finished))
    }

    async fn mark_model_failed(
        &self,
        job_id: &str,
        user_id: Uuid,
        refund: bool,
    ) -> Result<FailureOutcome, RepositoryError> {
        *self.failed_calls.lock().unwrap() += 1;
        if self.should_fail {
            return Err(mock_failure());
        }

        let previous = self.model(job_id);
        let transition = self.transition(job_id, ModelStatus::Failed);

        let mut refunded_balance = None;
        if refund && !transition.is_already_terminal() {
            let mut credits = self.credits.lock().unwrap();
            match credits.get_mut(&user_id) {
                Some(balance) => {
                    *balance += 1;
                    refunded_balance = Some(*balance);
                }
                None => {
                    // roll back the status change like the transactional version
                    if let Some(previous) = previous {
                        self.models
                            .lock()
                            .unwrap()
                            .insert(job_id.to_string(), previous);
                    }
                    return Err(RepositoryError::CreditsNotFound(user_id));
                }
            }
        }

        Ok(FailureOutcome {
            transition,
            refunded_balance,
        })
    }
}
