use std::env;
use std::net::SocketAddr;
use std::path::Path;

use crate::models::generation::{GenerationProfile, ProfileError};

pub const DEFAULT_LEAP_API_BASE_URL: &str = "https://api.tryleap.ai";
pub const DEFAULT_RESEND_API_BASE_URL: &str = "https://api.resend.com";
pub const DEFAULT_EMAIL_FROM: &str = "noreply@klone.images.ai";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_RATE_LIMIT_MS: u64 = 200;
pub const DEFAULT_RATE_LIMIT_BURST: u32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("MISSING {0}!")]
    Missing(&'static str),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
    #[error("invalid GENERATION_PROFILE_PATH: {0}")]
    Profile(#[from] ProfileError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub tls_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailSettings {
    Resend { api_key: String, base_url: String },
    Smtp(SmtpSettings),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeSettings {
    pub enabled: bool,
    pub pricing_table_id: Option<String>,
    pub publishable_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub supabase_url: String,
    pub supabase_service_role_key: String,
    pub leap_api_key: Option<String>,
    pub leap_api_base_url: String,
    pub leap_image_webhook_url: String,
    pub leap_webhook_secret: String,
    pub email: Option<EmailSettings>,
    pub email_from: String,
    pub stripe: StripeSettings,
    pub generation: GenerationProfile,
    pub bind_addr: SocketAddr,
    pub frontend_origin: Option<String>,
    pub rate_limit_ms: u64,
    pub rate_limit_burst: u32,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok(); // Load .env file
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let database_url = require("DATABASE_URL")?;
        let supabase_url = get("SUPABASE_URL")
            .or_else(|| get("NEXT_PUBLIC_SUPABASE_URL"))
            .ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let supabase_service_role_key = require("SUPABASE_SERVICE_ROLE_KEY")?;
        let leap_image_webhook_url = require("LEAP_IMAGE_WEBHOOK_URL")?;
        let leap_webhook_secret = require("LEAP_WEBHOOK_SECRET")?;

        let email = email_settings(&get)?;
        if email.is_none() {
            tracing::warn!(
                "email provider is not configured; the app still works but training notifications will not be sent"
            );
        }

        let stripe_flag = get("STRIPE_IS_ENABLED").or_else(|| get("NEXT_PUBLIC_STRIPE_IS_ENABLED"));
        let stripe = StripeSettings {
            enabled: stripe_flag.as_deref() == Some("true"),
            pricing_table_id: get("STRIPE_PRICING_TABLE_ID"),
            publishable_key: get("STRIPE_PUBLISHABLE_KEY"),
        };

        let generation = match get("GENERATION_PROFILE_PATH") {
            Some(path) => GenerationProfile::from_file(Path::new(&path))?,
            None => GenerationProfile::default(),
        };

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        Ok(Config {
            database_url,
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            supabase_service_role_key,
            leap_api_key: get("LEAP_API_KEY"),
            leap_api_base_url: get("LEAP_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LEAP_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            leap_image_webhook_url,
            leap_webhook_secret,
            email,
            email_from: get("EMAIL_FROM").unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_string()),
            stripe,
            generation,
            bind_addr,
            frontend_origin: get("FRONTEND_ORIGIN"),
            rate_limit_ms: get("RATE_LIMITER_MILLISECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RATE_LIMIT_MS),
            rate_limit_burst: get("RATE_LIMITER_BURST")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RATE_LIMIT_BURST),
            run_migrations: get("RUN_MIGRATIONS").as_deref() == Some("true"),
        })
    }

    pub fn billing_enabled(&self) -> bool {
        self.stripe.enabled
    }
}

fn email_settings<G>(get: &G) -> Result<Option<EmailSettings>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let provider = get("EMAIL_PROVIDER")
        .unwrap_or_else(|| "resend".into())
        .to_ascii_lowercase();

    match provider.as_str() {
        "resend" => Ok(get("RESEND_API_KEY").map(|api_key| EmailSettings::Resend {
            api_key,
            base_url: get("RESEND_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_RESEND_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        })),
        "smtp" => {
            let Some(host) = get("SMTP_HOST") else {
                return Ok(None);
            };
            let port = match get("SMTP_PORT") {
                Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                    key: "SMTP_PORT",
                    reason: e.to_string(),
                })?,
                None => 587,
            };
            Ok(Some(EmailSettings::Smtp(SmtpSettings {
                host,
                port,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                tls_disabled: get("SMTP_TLS_DISABLED")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
            })))
        }
        _ => Err(ConfigError::Invalid {
            key: "EMAIL_PROVIDER",
            reason: format!("unsupported provider '{}' (expected 'resend' or 'smtp')", provider),
        }),
    }
}
