use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;

use crate::config::{Config, EmailSettings};
use crate::services::mailer::{MailError, Mailer, SmtpMailer};

use super::resend_mailer::ResendMailer;

#[derive(Clone)]
enum AppSender {
    Smtp(Arc<SmtpMailer>),
    Resend(Arc<ResendMailer>),
}

/// Routes notification email to whichever provider the deployment
/// configured.
#[derive(Clone)]
pub struct PluggableMailer {
    app_sender: AppSender,
}

impl PluggableMailer {
    /// `Ok(None)` when no provider is configured; notifications are then
    /// skipped.
    pub fn from_config(config: &Config, http: &Client) -> Result<Option<Self>, MailError> {
        let Some(settings) = config.email.as_ref() else {
            return Ok(None);
        };

        let app_sender = match settings {
            EmailSettings::Resend { api_key, base_url } => AppSender::Resend(Arc::new(
                ResendMailer::new(http, api_key, base_url, &config.email_from),
            )),
            EmailSettings::Smtp(smtp) => {
                AppSender::Smtp(Arc::new(SmtpMailer::from_settings(smtp, &config.email_from)?))
            }
        };

        Ok(Some(Self { app_sender }))
    }

    pub fn provider_name(&self) -> &'static str {
        match &self.app_sender {
            AppSender::Smtp(_) => "smtp",
            AppSender::Resend(_) => "resend",
        }
    }
}

#[async_trait]
impl Mailer for PluggableMailer {
    async fn send_email_generic(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), MailError> {
        match &self.app_sender {
            AppSender::Smtp(smtp) => smtp.send_email_generic(to, subject, html).await,
            AppSender::Resend(resend) => resend.send_email_generic(to, subject, html).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SmtpSettings;
    use crate::test_support::test_config;

    #[test]
    fn no_email_settings_means_no_mailer() {
        let config = test_config();
        let mailer = PluggableMailer::from_config(&config, &Client::new()).unwrap();
        assert!(mailer.is_none());
    }

    #[test]
    fn resend_settings_select_resend() {
        let mut config = test_config();
        config.email = Some(EmailSettings::Resend {
            api_key: "re_123".into(),
            base_url: "https://api.resend.com".into(),
        });
        let mailer = PluggableMailer::from_config(&config, &Client::new())
            .unwrap()
            .unwrap();
        assert_eq!(mailer.provider_name(), "resend");
    }

    #[test]
    fn smtp_settings_select_smtp() {
        let mut config = test_config();
        config.email = Some(EmailSettings::Smtp(SmtpSettings {
            host: "localhost".into(),
            port: 2525,
            username: None,
            password: None,
            tls_disabled: true,
        }));
        let mailer = PluggableMailer::from_config(&config, &Client::new())
            .unwrap()
            .unwrap();
        assert_eq!(mailer.provider_name(), "smtp");
    }
}
