use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde_json::json;

use super::crm::CrmDelivery;
use super::domain::{LeadId, LeadSubmission};
use super::repository::{LeadRepository, RepositoryError};
use super::service::{LeadIntakeError, LeadIntakeService};
use crate::workflows::attribution::GeocodeClient;

/// Router builder exposing HTTP endpoints for lead intake and the admin
/// console operations.
pub fn lead_router<G, R, C>(service: Arc<LeadIntakeService<G, R, C>>) -> Router
where
    G: GeocodeClient + 'static,
    R: LeadRepository + 'static,
    C: CrmDelivery + 'static,
{
    Router::new()
        .route(
            "/api/v1/leads",
            post(submit_handler::<G, R, C>).get(list_handler::<G, R, C>),
        )
        .route(
            "/api/v1/leads/:lead_id/webhook",
            post(retry_webhook_handler::<G, R, C>),
        )
        .with_state(service)
}

pub(crate) async fn submit_handler<G, R, C>(
    State(service): State<Arc<LeadIntakeService<G, R, C>>>,
    axum::Json(submission): axum::Json<LeadSubmission>,
) -> Response
where
    G: GeocodeClient + 'static,
    R: LeadRepository + 'static,
    C: CrmDelivery + 'static,
{
    match service.submit(submission).await {
        Ok(record) => {
            let payload = json!({
                "status": "success",
                "lead_id": record.id.0,
                "campaign": record.campaign_code,
                "message": "Lead saved successfully.",
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(LeadIntakeError::Validation(error)) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(error @ LeadIntakeError::Duplicate) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        Err(LeadIntakeError::Geocode(error)) => {
            let payload = json!({
                "error": "invalid zip code, please enter a valid US zip code",
                "detail": error.to_string(),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn list_handler<G, R, C>(
    State(service): State<Arc<LeadIntakeService<G, R, C>>>,
) -> Response
where
    G: GeocodeClient + 'static,
    R: LeadRepository + 'static,
    C: CrmDelivery + 'static,
{
    match service.list() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn retry_webhook_handler<G, R, C>(
    State(service): State<Arc<LeadIntakeService<G, R, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    G: GeocodeClient + 'static,
    R: LeadRepository + 'static,
    C: CrmDelivery + 'static,
{
    let id = LeadId(lead_id);
    match service.retry_webhook(&id).await {
        Ok(record) => {
            let payload = json!({
                "status": "success",
                "message": "Webhook retry attempted",
                "webhook_status": record.webhook.status.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(LeadIntakeError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "error": "lead not found",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
