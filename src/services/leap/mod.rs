use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::generation::GenerationProfile;

#[derive(Debug, thiserror::Error)]
pub enum ImageGenerationError {
    #[error("leap api error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("leap request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ImageGenerationError {
    fn from(err: reqwest::Error) -> Self {
        ImageGenerationError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub number_of_images: u32,
    pub width: u32,
    pub height: u32,
    pub steps: u32,
    pub prompt_strength: f32,
    pub webhook_url: String,
}

impl ImageGenerationRequest {
    pub fn from_profile(profile: &GenerationProfile, prompt: String, webhook_url: &str) -> Self {
        Self {
            prompt,
            negative_prompt: profile.negative_prompt.clone(),
            number_of_images: profile.number_of_images,
            width: profile.width,
            height: profile.height,
            steps: profile.steps,
            prompt_strength: profile.prompt_strength,
            webhook_url: webhook_url.to_string(),
        }
    }
}

/// Inference job accepted by the image service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceJob {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate_images(
        &self,
        model_id: &str,
        request: &ImageGenerationRequest,
    ) -> Result<InferenceJob, ImageGenerationError>;
}

pub struct CallbackParams<'a> {
    pub user_id: &'a str,
    pub model_id: &'a str,
    pub webhook_secret: &'a str,
    pub model_db_id: Option<i64>,
}

/// Callback the image service hits once each inference completes.
pub fn build_callback_url(base: &str, params: &CallbackParams<'_>) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    let model_db_id = params
        .model_db_id
        .map(|id| id.to_string())
        .unwrap_or_default();
    format!(
        "{}{}user_id={}&model_id={}&webhook_secret={}&model_db_id={}",
        base,
        separator,
        urlencoding::encode(params.user_id),
        urlencoding::encode(params.model_id),
        urlencoding::encode(params.webhook_secret),
        model_db_id
    )
}

mod client;
mod mock;

pub use client::LeapClient;
#[allow(unused_imports)]
pub use mock::MockImageGenerator;
