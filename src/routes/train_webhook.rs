use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use tracing::{error, info, warn};

use crate::db::training_repository::{RepositoryError, StatusTransition};
use crate::models::user::AuthUser;
use crate::models::webhook::{TrainWebhookPayload, TrainWebhookQuery, TrainingResult};
use crate::responses::JsonResponse;
use crate::services::leap::{
    build_callback_url, CallbackParams, ImageGenerationError, ImageGenerationRequest,
    ImageGenerator,
};
use crate::state::AppState;
use crate::utils::secret::secrets_match;

pub const MISSING_API_KEY: &str = "Missing API Key: Add your Leap API Key to generate headshots";
pub const MISSING_WEBHOOK_SECRET: &str = "Malformed URL, no webhook_secret detected!";
pub const MISSING_USER_ID: &str = "Malformed URL, no user_id detected!";
pub const UNAUTHORIZED: &str = "Unauthorized!";
pub const USER_NOT_FOUND: &str = "User not found!";
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong!";

#[derive(Debug, thiserror::Error)]
enum WebhookError {
    #[error("persistence failure: {0}")]
    Persistence(#[from] RepositoryError),
    #[error("image generation request {index} failed: {source}")]
    Generation {
        index: usize,
        source: ImageGenerationError,
    },
}

#[derive(Debug, Clone, Copy)]
enum TrainingOutcome {
    Succeeded,
    Failed,
}

// POST /leap/train-webhook
pub async fn handle_train_webhook(
    State(app_state): State<AppState>,
    Query(query): Query<TrainWebhookQuery>,
    body: Bytes,
) -> Response {
    let config = app_state.config.clone();

    let Some(image_generator) = app_state.image_generator.clone() else {
        return JsonResponse::server_error_with_message(MISSING_API_KEY).into_response();
    };

    let Some(webhook_secret) = non_empty(query.webhook_secret.as_deref()) else {
        return JsonResponse::server_error(MISSING_WEBHOOK_SECRET).into_response();
    };

    if !secrets_match(webhook_secret, &config.leap_webhook_secret) {
        warn!("training webhook called with an invalid secret");
        return JsonResponse::unauthorized(UNAUTHORIZED).into_response();
    }

    let Some(user_id) = non_empty(query.user_id.as_deref()) else {
        return JsonResponse::server_error(MISSING_USER_ID).into_response();
    };

    let user = match app_state.identity.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return JsonResponse::unauthorized(USER_NOT_FOUND).into_response(),
        Err(err) => {
            warn!(%err, user_id, "user lookup failed");
            return JsonResponse::unauthorized(&err.to_string()).into_response();
        }
    };

    let payload: TrainWebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            error!(%err, user_id, "training webhook body is not a valid result payload");
            return JsonResponse::server_error_with_message(SOMETHING_WENT_WRONG).into_response();
        }
    };

    let model_type = query.model_type.as_deref().unwrap_or("");
    let result = payload.result;

    let outcome = if result.is_finished() {
        handle_finished(&app_state, image_generator, &user, &result, model_type).await
    } else {
        handle_failed(&app_state, &user, &result).await
    };

    match outcome {
        Ok(()) => JsonResponse::success("success").into_response(),
        Err(err) => {
            error!(%err, job_id = %result.id, user_id = %user.id, "training webhook failed");
            JsonResponse::server_error_with_message(SOMETHING_WENT_WRONG).into_response()
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Images are requested before the model is marked `finished`, so a
/// delivery that fails part-way leaves the row pending and a retry sends
/// the full prompt table again.
async fn handle_finished(
    app_state: &AppState,
    image_generator: Arc<dyn ImageGenerator>,
    user: &AuthUser,
    result: &TrainingResult,
    model_type: &str,
) -> Result<(), WebhookError> {
    let repo = &app_state.training_repo;
    let existing = repo.find_model_by_job_id(&result.id).await?;

    let model_db_id = match existing {
        Some(record) if record.status.is_terminal() => {
            info!(
                job_id = %result.id,
                status = %record.status,
                "duplicate completion for a settled model; skipping"
            );
            return Ok(());
        }
        Some(record) => Some(record.id),
        None => {
            warn!(job_id = %result.id, "no model row for finished job");
            None
        }
    };

    let config = &app_state.config;
    let profile = &config.generation;
    let user_id = user.id.to_string();
    let webhook_url = build_callback_url(
        &config.leap_image_webhook_url,
        &CallbackParams {
            user_id: &user_id,
            model_id: &result.id,
            webhook_secret: &config.leap_webhook_secret,
            model_db_id,
        },
    );

    for (index, prompt) in profile.render_prompts(model_type).into_iter().enumerate() {
        let request = ImageGenerationRequest::from_profile(profile, prompt, &webhook_url);
        let job = image_generator
            .generate_images(&result.id, &request)
            .await
            .map_err(|source| WebhookError::Generation { index, source })?;
        info!(job_id = %result.id, inference_id = %job.id, index, "queued image generation");
    }

    match repo.mark_model_finished(&result.id).await? {
        StatusTransition::Applied(_) => {}
        StatusTransition::AlreadyTerminal(record) => {
            // a concurrent delivery settled the row while images were queued
            info!(
                job_id = %result.id,
                status = %record.status,
                "model settled by another delivery; skipping notification"
            );
            return Ok(());
        }
        StatusTransition::Missing => {
            error!(job_id = %result.id, "No model updated!");
        }
    }

    send_notification(app_state, user, TrainingOutcome::Succeeded).await;
    Ok(())
}

async fn handle_failed(
    app_state: &AppState,
    user: &AuthUser,
    result: &TrainingResult,
) -> Result<(), WebhookError> {
    let repo = &app_state.training_repo;
    if let Some(record) = repo.find_model_by_job_id(&result.id).await? {
        if record.status.is_terminal() {
            info!(
                job_id = %result.id,
                status = %record.status,
                "duplicate failure for a settled model; skipping"
            );
            return Ok(());
        }
    }

    let refund = app_state.config.billing_enabled();
    let prior_balance = if refund {
        Some(repo.get_credit_balance(user.id).await?)
    } else {
        None
    };

    let outcome = repo.mark_model_failed(&result.id, user.id, refund).await?;

    match &outcome.transition {
        StatusTransition::AlreadyTerminal(record) => {
            info!(
                job_id = %result.id,
                status = %record.status,
                "model settled by another delivery; skipping"
            );
            return Ok(());
        }
        StatusTransition::Missing => {
            warn!(job_id = %result.id, "no model row for failed job");
        }
        StatusTransition::Applied(_) => {}
    }

    if let Some(balance) = outcome.refunded_balance {
        info!(user_id = %user.id, ?prior_balance, balance, "Refunded user 1 credit!");
    }

    send_notification(app_state, user, TrainingOutcome::Failed).await;
    Ok(())
}

/// Best-effort email; a failure is logged and never changes the response.
async fn send_notification(app_state: &AppState, user: &AuthUser, outcome: TrainingOutcome) {
    let Some(mailer) = app_state.mailer.as_ref() else {
        return;
    };
    let Some(email) = user.email.as_deref().filter(|e| !e.trim().is_empty()) else {
        warn!(target: "notifications", user_id = %user.id, "user has no email address; skipping notification");
        return;
    };

    let sent = match outcome {
        TrainingOutcome::Succeeded => mailer.send_training_succeeded_email(email).await,
        TrainingOutcome::Failed => mailer.send_training_failed_email(email).await,
    };
    if let Err(err) = sent {
        warn!(target: "notifications", %err, user_id = %user.id, ?outcome, "training notification email failed");
    }
}
