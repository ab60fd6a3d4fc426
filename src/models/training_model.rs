use core::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Copy, Clone)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Pending,
    Finished,
    Failed,
}

impl ModelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelStatus::Pending => "pending",
            ModelStatus::Finished => "finished",
            ModelStatus::Failed => "failed",
        }
    }

    /// `finished` and `failed` are final; nothing moves a model out of them.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ModelStatus::Finished | ModelStatus::Failed)
    }
}

impl TryFrom<String> for ModelStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(ModelStatus::Pending),
            "finished" => Ok(ModelStatus::Finished),
            "failed" => Ok(ModelStatus::Failed),
            other => Err(format!("unknown model status '{}'", other)),
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One training job, keyed by the upstream job id.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: i64,
    pub model_id: String,
    pub user_id: Uuid,
    #[sqlx(try_from = "String")]
    pub status: ModelStatus,
    pub created_at: OffsetDateTime,
}
