use crate::config::Config;
use crate::db::training_repository::TrainingRepository;
use crate::services::identity::IdentityService;
use crate::services::leap::ImageGenerator;
use crate::services::mailer::Mailer;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityService>,
    pub training_repo: Arc<dyn TrainingRepository>,
    /// `None` when no email provider is configured.
    pub mailer: Option<Arc<dyn Mailer>>,
    /// `None` when `LEAP_API_KEY` is unset.
    pub image_generator: Option<Arc<dyn ImageGenerator>>,
    pub config: Arc<Config>,
}
