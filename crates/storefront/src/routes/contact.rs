//! Quote request route.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::services::contact::{QuoteRequest, whatsapp_url};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub whatsapp_url: String,
}

/// Validate a quote request and return the link that opens the
/// conversation.
///
/// POST /contact
#[instrument(skip(state, request), fields(event_type = %request.event_type))]
pub async fn submit(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<ContactResponse>> {
    request.validate()?;

    add_breadcrumb("contact", "Quote request composed", &[("event_type", &request.event_type)]);
    tracing::info!("Quote request composed");

    Ok(Json(ContactResponse {
        whatsapp_url: whatsapp_url(&state.config().whatsapp_number, &request.message()),
    }))
}
