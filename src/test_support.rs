use std::sync::Arc;

use crate::config::{Config, StripeSettings, DEFAULT_EMAIL_FROM};
use crate::db::mock_db::MockTrainingRepository;
use crate::models::generation::GenerationProfile;
use crate::services::identity::MockIdentityService;
use crate::services::leap::{ImageGenerator, MockImageGenerator};
use crate::services::mailer::{Mailer, MockMailer};
use crate::state::AppState;

pub const TEST_WEBHOOK_SECRET: &str = "Leap-Webhook-Secret";
pub const TEST_IMAGE_WEBHOOK_URL: &str = "https://app.test/leap/image-webhook";

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        supabase_url: "http://identity.test".into(),
        supabase_service_role_key: "service-role".into(),
        leap_api_key: Some("leap-key".into()),
        leap_api_base_url: "http://leap.test".into(),
        leap_image_webhook_url: TEST_IMAGE_WEBHOOK_URL.into(),
        leap_webhook_secret: TEST_WEBHOOK_SECRET.into(),
        email: None,
        email_from: DEFAULT_EMAIL_FROM.into(),
        stripe: StripeSettings {
            enabled: false,
            pricing_table_id: None,
            publishable_key: None,
        },
        generation: GenerationProfile::default(),
        bind_addr: ([127, 0, 0, 1], 0).into(),
        frontend_origin: None,
        rate_limit_ms: 200,
        rate_limit_burst: 20,
        run_migrations: false,
    }
}

/// Mock collaborators kept behind `Arc`s so tests can inspect them after
/// the handler ran.
pub struct TestHarness {
    pub identity: Arc<MockIdentityService>,
    pub repo: Arc<MockTrainingRepository>,
    pub mailer: Option<Arc<MockMailer>>,
    pub images: Option<Arc<MockImageGenerator>>,
    pub config: Config,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            identity: Arc::new(MockIdentityService::default()),
            repo: Arc::new(MockTrainingRepository::default()),
            mailer: Some(Arc::new(MockMailer::default())),
            images: Some(Arc::new(MockImageGenerator::default())),
            config: test_config(),
        }
    }

    pub fn with_identity(mut self, identity: MockIdentityService) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    pub fn with_repo(mut self, repo: MockTrainingRepository) -> Self {
        self.repo = Arc::new(repo);
        self
    }

    pub fn with_mailer(mut self, mailer: Option<MockMailer>) -> Self {
        self.mailer = mailer.map(Arc::new);
        self
    }

    pub fn with_images(mut self, images: Option<MockImageGenerator>) -> Self {
        self.images = images.map(Arc::new);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn state(&self) -> AppState {
        AppState {
            identity: self.identity.clone(),
            training_repo: self.repo.clone(),
            mailer: self.mailer.clone().map(|m| m as Arc<dyn Mailer>),
            image_generator: self.images.clone().map(|g| g as Arc<dyn ImageGenerator>),
            config: Arc::new(self.config.clone()),
        }
    }
}
