use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

use crate::config::SmtpSettings;
use crate::services::mailer::{MailError, Mailer};

#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    sender: Mailbox,
}

impl SmtpMailer {
    pub fn from_settings(settings: &SmtpSettings, from: &str) -> Result<Self, MailError> {
        let sender: Mailbox = from.parse()?;

        let transport = if settings.tls_disabled {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
                .port(settings.port)
                .build()
        } else {
            let tls = TlsParameters::new(settings.host.clone()).map_err(|err| {
                MailError::Config(format!(
                    "Failed to configure TLS for {}:{}: {}",
                    settings.host, settings.port, err
                ))
            })?;
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
                .port(settings.port)
                .tls(Tls::Required(tls));
            if let (Some(username), Some(password)) =
                (settings.username.as_ref(), settings.password.as_ref())
            {
                builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
            }
            builder.build()
        };

        Ok(Self {
            transport: Arc::new(transport),
            sender,
        })
    }

    fn build_message(&self, to: &str, subject: &str, html: &str) -> Result<Message, MailError> {
        let recipient: Mailbox = to.parse()?;
        let message = Message::builder()
            .from(self.sender.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html.to_string())?;
        Ok(message)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_email_generic(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), MailError> {
        let email = self.build_message(to, subject, html)?;
        self.transport
            .send(email)
            .await
            .map(|_| ())
            .map_err(|e| e.into())
    }
}
