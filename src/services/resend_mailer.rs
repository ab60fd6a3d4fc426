use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::services::mailer::{MailError, Mailer};

#[derive(Clone)]
pub struct ResendMailer {
    api_key: String,
    base_url: String,
    from: String,
    http: Client,
}

impl ResendMailer {
    pub fn new(http: &Client, api_key: &str, base_url: &str, from: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            from: from.to_string(),
            http: http.clone(),
        }
    }

    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<(), MailError> {
        if to.trim().is_empty() {
            return Err(MailError::InvalidEmailAddress("empty recipient".into()));
        }

        let payload = json!({
            "from": self.from,
            "to": [to],
            "subject": subject,
            "html": html,
        });

        let resp = self
            .http
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if resp.status().is_success() {
            return Ok(());
        }

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        Err(MailError::SendError(format!(
            "Resend send failed: {} {}",
            status, text
        )))
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_email_generic(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), MailError> {
        self.send(to, subject, html).await
    }
}
