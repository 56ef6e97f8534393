use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use model_scanner::workflows::attribution::GeocodeClient;
use model_scanner::workflows::leads::{
    lead_router, CrmDelivery, LeadIntakeService, LeadRepository,
};

pub(crate) fn with_lead_routes<G, R, C>(
    service: Arc<LeadIntakeService<G, R, C>>,
) -> axum::Router
where
    G: GeocodeClient + 'static,
    R: LeadRepository + 'static,
    C: CrmDelivery + 'static,
{
    lead_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryLeadRepository;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use model_scanner::workflows::attribution::{
        CampaignCodeService, GeoLookupResult, GeocodeFailure, TerritoryCatalog,
    };
    use model_scanner::workflows::leads::{CrmPayload, DeliveryReport, WebhookStatus};
    use serde_json::Value;
    use tower::ServiceExt;

    struct FixedGeocode;

    impl GeocodeClient for FixedGeocode {
        async fn resolve(&self, postal_code: &str) -> Result<GeoLookupResult, GeocodeFailure> {
            if postal_code == "10001" {
                Ok(GeoLookupResult {
                    latitude: 40.7484,
                    longitude: -73.9967,
                    city_name: "New York City".to_string(),
                    region_code: Some("NY".to_string()),
                })
            } else {
                Err(GeocodeFailure::UnknownPostalCode(postal_code.to_string()))
            }
        }
    }

    struct SilentCrm;

    impl CrmDelivery for SilentCrm {
        async fn deliver(&self, _payload: &CrmPayload) -> DeliveryReport {
            DeliveryReport {
                status: WebhookStatus::NotConfigured,
                response: "CRM_WEBHOOK_URL not set".to_string(),
            }
        }
    }

    fn build_router() -> axum::Router {
        let campaigns = CampaignCodeService::new(FixedGeocode, TerritoryCatalog::standard());
        let repository = Arc::new(InMemoryLeadRepository::default());
        let crm = Arc::new(SilentCrm);
        let service = Arc::new(LeadIntakeService::new(campaigns, repository, crm));
        with_lead_routes(service)
    }

    #[tokio::test]
    async fn healthcheck_is_routable() {
        let router = build_router();
        let response = router
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn lead_submission_flows_through_mounted_routes() {
        let router = build_router();
        let body = json!({
            "first_name": "Jane",
            "last_name": "Doe",
            "age": 30,
            "gender": "Female",
            "email": "jane@example.com",
            "phone": "5550123456",
            "zip_code": "10001"
        });

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/leads")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");

        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("body");
        let payload: Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(
            payload.get("campaign").and_then(Value::as_str),
            Some("#NYIG21F")
        );
    }
}
