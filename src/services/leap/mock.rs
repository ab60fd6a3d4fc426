#![allow(dead_code)]
use async_trait::async_trait;
use std::sync::Mutex;

use super::{ImageGenerationError, ImageGenerationRequest, ImageGenerator, InferenceJob};

/// Records every inference request; optionally starts failing after a
/// number of successful calls.
#[derive(Default)]
pub struct MockImageGenerator {
    pub requests: Mutex<Vec<(String, ImageGenerationRequest)>>,
    pub fail_after: Option<usize>,
}

impl MockImageGenerator {
    pub fn failing_after(successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Default::default()
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, req)| req.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_images(
        &self,
        model_id: &str,
        request: &ImageGenerationRequest,
    ) -> Result<InferenceJob, ImageGenerationError> {
        let mut requests = self.requests.lock().unwrap();
        if let Some(limit) = self.fail_after {
            if requests.len() >= limit {
                return Err(ImageGenerationError::Api {
                    status: 500,
                    message: "mock failure".into(),
                });
            }
        }
        requests.push((model_id.to_string(), request.clone()));
        Ok(InferenceJob {
            id: format!("inf_{}", requests.len()),
            status: Some("queued".into()),
        })
    }
}
