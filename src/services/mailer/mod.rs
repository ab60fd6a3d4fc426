use async_trait::async_trait;
use std::fmt;

use lettre::address::AddressError;

pub const TRAINING_SUCCEEDED_SUBJECT: &str = "Your model was successfully trained!";
pub const TRAINING_SUCCEEDED_HTML: &str = "<h2>We're writing to notify you that your model training was successful! 1 credit has been used from your account.</h2>";
pub const TRAINING_FAILED_SUBJECT: &str = "Your model failed to train!";
pub const TRAINING_FAILED_HTML: &str = "<h2>We're writing to notify you that your model training failed!. Since this failed, you will not be billed for it</h2>";

#[derive(Debug)]
pub enum MailError {
    InvalidEmailAddress(String),
    SendError(String),
    Config(String),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::InvalidEmailAddress(e) => write!(f, "Invalid Address: {}", e),
            MailError::SendError(e) => write!(f, "Send error: {}", e),
            MailError::Config(e) => write!(f, "Mailer config error: {}", e),
        }
    }
}

impl std::error::Error for MailError {}

impl From<lettre::transport::smtp::Error> for MailError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        MailError::SendError(err.to_string())
    }
}

impl From<lettre::error::Error> for MailError {
    fn from(err: lettre::error::Error) -> Self {
        MailError::SendError(err.to_string())
    }
}

impl From<AddressError> for MailError {
    fn from(e: AddressError) -> Self {
        MailError::InvalidEmailAddress(e.to_string())
    }
}

impl From<reqwest::Error> for MailError {
    fn from(err: reqwest::Error) -> Self {
        MailError::SendError(err.to_string())
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email_generic(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<(), MailError>;

    async fn send_training_succeeded_email(&self, to: &str) -> Result<(), MailError> {
        self.send_email_generic(to, TRAINING_SUCCEEDED_SUBJECT, TRAINING_SUCCEEDED_HTML)
            .await
    }

    async fn send_training_failed_email(&self, to: &str) -> Result<(), MailError> {
        self.send_email_generic(to, TRAINING_FAILED_SUBJECT, TRAINING_FAILED_HTML)
            .await
    }
}

mod mock_mailer;
mod smtp_impl;

#[allow(unused_imports)]
pub use mock_mailer::{MockMailer, SentEmail};
pub use smtp_impl::SmtpMailer;
