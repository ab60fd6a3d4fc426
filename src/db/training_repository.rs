use async_trait::async_trait;
use uuid::Uuid;

use crate::models::training_model::ModelRecord;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("no credit balance found for user {0}")]
    CreditsNotFound(Uuid),
}

/// Result of moving a model row into a terminal status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTransition {
    /// The row was pending and now holds the requested status.
    Applied(ModelRecord),
    /// The row had already reached `finished` or `failed`; nothing changed.
    AlreadyTerminal(ModelRecord),
    /// No row matches the job id.
    Missing,
}

impl StatusTransition {
    pub fn is_applied(&self) -> bool {
        matches!(self, StatusTransition::Applied(_))
    }

    pub fn is_already_terminal(&self) -> bool {
        matches!(self, StatusTransition::AlreadyTerminal(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureOutcome {
    pub transition: StatusTransition,
    /// Balance after the refund, when one was issued.
    pub refunded_balance: Option<i32>,
}

#[async_trait]
pub trait TrainingRepository: Send + Sync {
    async fn find_model_by_job_id(&self, job_id: &str)
        -> Result<Option<ModelRecord>, RepositoryError>;

    /// `CreditsNotFound` when the user has no credits row.
    async fn get_credit_balance(&self, user_id: Uuid) -> Result<i32, RepositoryError>;

    async fn mark_model_finished(&self, job_id: &str) -> Result<StatusTransition, RepositoryError>;

    /// Moves the job to `failed` and, when `refund` is set, adds one credit
    /// to `user_id` in the same transaction. No refund is issued for a job
    /// that was already terminal; a job without a model row is still
    /// refunded. A missing credits row rolls the status change back.
    async fn mark_model_failed(
        &self,
        job_id: &str,
        user_id: Uuid,
        refund: bool,
    ) -> Result<FailureOutcome, RepositoryError>;
}
