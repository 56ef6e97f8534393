use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryLeadRepository};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use model_scanner::config::AppConfig;
use model_scanner::error::AppError;
use model_scanner::telemetry;
use model_scanner::workflows::attribution::{
    CampaignCodeService, TerritoryCatalog, ZippopotamClient,
};
use model_scanner::workflows::leads::{CrmWebhookClient, LeadIntakeService};
use tracing::info;

const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);
const OUTBOUND_USER_AGENT: &str = "ModelScanner/1.0";

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let http = reqwest::Client::builder()
        .timeout(OUTBOUND_TIMEOUT)
        .user_agent(OUTBOUND_USER_AGENT)
        .build()?;

    let geocode = ZippopotamClient::new(http.clone(), config.geocode.base_url.clone());
    let campaigns = CampaignCodeService::new(geocode, TerritoryCatalog::standard());
    let repository = Arc::new(InMemoryLeadRepository::default());
    let crm = Arc::new(CrmWebhookClient::new(http, config.crm.webhook_url.clone()));
    let intake_service = Arc::new(LeadIntakeService::new(campaigns, repository, crm));

    let app = with_lead_routes(intake_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead-capture service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
