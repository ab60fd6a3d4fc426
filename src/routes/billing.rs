use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::warn;

use crate::responses::JsonResponse;
use crate::services::pricing_table::PricingTable;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PricingTableQuery {
    pub user_id: Option<String>,
}

// GET /billing/pricing-table
pub async fn pricing_table(
    State(app_state): State<AppState>,
    Query(query): Query<PricingTableQuery>,
) -> Response {
    let stripe = &app_state.config.stripe;
    if !stripe.enabled {
        return JsonResponse::not_found("Billing is not enabled").into_response();
    }

    let (Some(pricing_table_id), Some(publishable_key)) = (
        stripe.pricing_table_id.clone(),
        stripe.publishable_key.clone(),
    ) else {
        warn!("billing is enabled but the pricing table id or publishable key is missing");
        return JsonResponse::not_found("Pricing table is not configured").into_response();
    };

    let table = PricingTable {
        pricing_table_id,
        publishable_key,
        client_reference_id: query.user_id.filter(|id| !id.trim().is_empty()),
    };
    Html(table.render()).into_response()
}
