use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{ImageGenerationError, ImageGenerationRequest, ImageGenerator, InferenceJob};

pub struct LeapClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl LeapClient {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl ImageGenerator for LeapClient {
    async fn generate_images(
        &self,
        model_id: &str,
        request: &ImageGenerationRequest,
    ) -> Result<InferenceJob, ImageGenerationError> {
        let url = format!(
            "{}/api/v1/images/models/{}/inferences",
            self.base_url,
            urlencoding::encode(model_id)
        );

        let res = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body: Value = res.json().await.unwrap_or(Value::Null);
            let message = body
                .get("error")
                .or_else(|| body.get("message"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| status.to_string());
            return Err(ImageGenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(res.json::<InferenceJob>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::generation::GenerationProfile;
    use httpmock::{Method::POST, MockServer};
    use serde_json::json;

    fn request() -> ImageGenerationRequest {
        ImageGenerationRequest::from_profile(
            &GenerationProfile::default(),
            "8k photo of @subject man".into(),
            "https://app.test/leap/image-webhook?user_id=u",
        )
    }

    #[tokio::test]
    async fn posts_inference_for_model() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/images/models/job-1/inferences")
                    .header("authorization", "Bearer leap-key")
                    .json_body_partial(
                        json!({
                            "prompt": "8k photo of @subject man",
                            "numberOfImages": 4,
                            "width": 512,
                            "height": 512,
                            "steps": 50,
                            "promptStrength": 7.5
                        })
                        .to_string(),
                    );
                then.status(201)
                    .header("content-type", "application/json")
                    .body(json!({ "id": "inf-1", "status": "queued", "prompt": "x" }).to_string());
            })
            .await;

        let client = LeapClient::new(Client::new(), &server.base_url(), "leap-key");
        let job = client.generate_images("job-1", &request()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(job.id, "inf-1");
        assert_eq!(job.status.as_deref(), Some("queued"));
    }

    #[tokio::test]
    async fn api_failure_carries_status_and_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/images/models/job-1/inferences");
                then.status(402)
                    .header("content-type", "application/json")
                    .body(json!({ "error": "Insufficient credits" }).to_string());
            })
            .await;

        let client = LeapClient::new(Client::new(), &server.base_url(), "leap-key");
        match client.generate_images("job-1", &request()).await {
            Err(ImageGenerationError::Api { status, message }) => {
                assert_eq!(status, 402);
                assert_eq!(message, "Insufficient credits");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
