use serde::{Deserialize, Serialize};

pub const STATUS_FINISHED: &str = "finished";

/// Query string the training service echoes back on completion.
#[derive(Debug, Default, Deserialize)]
pub struct TrainWebhookQuery {
    pub user_id: Option<String>,
    pub webhook_secret: Option<String>,
    pub model_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainWebhookPayload {
    pub result: TrainingResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingResult {
    pub id: String,
    pub status: String,
}

impl TrainingResult {
    /// Anything other than `finished` is handled as a failed job.
    pub fn is_finished(&self) -> bool {
        self.status == STATUS_FINISHED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_ignores_extra_upstream_fields() {
        let payload: TrainWebhookPayload = serde_json::from_str(
            r#"{ "result": { "id": "job-1", "status": "finished", "createdAt": "2023-10-01" }, "extra": 1 }"#,
        )
        .unwrap();
        assert_eq!(payload.result.id, "job-1");
        assert!(payload.result.is_finished());
    }

    #[test]
    fn non_finished_statuses_are_failures() {
        for status in ["failed", "FINISHED", "queued", ""] {
            let result = TrainingResult {
                id: "job".into(),
                status: status.into(),
            };
            assert!(!result.is_finished(), "{status} should not count as finished");
        }
    }
}
