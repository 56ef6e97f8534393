use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::info;

use super::crm::{CrmDelivery, CrmPayload};
use super::domain::{LeadId, LeadSubmission, ValidationError, WebhookState, WebhookStatus};
use super::repository::{LeadRecord, LeadRepository, LeadSummaryView, RepositoryError};
use crate::workflows::attribution::{CampaignCodeService, GeocodeClient, GeocodeFailure};

/// Service composing validation, duplicate screening, campaign attribution,
/// persistence, and CRM delivery for one submission.
pub struct LeadIntakeService<G, R, C> {
    campaigns: CampaignCodeService<G>,
    repository: Arc<R>,
    crm: Arc<C>,
}

static LEAD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_lead_id() -> LeadId {
    let id = LEAD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    LeadId(format!("lead-{id:06}"))
}

impl<G, R, C> LeadIntakeService<G, R, C>
where
    G: GeocodeClient + 'static,
    R: LeadRepository + 'static,
    C: CrmDelivery + 'static,
{
    pub fn new(campaigns: CampaignCodeService<G>, repository: Arc<R>, crm: Arc<C>) -> Self {
        Self {
            campaigns,
            repository,
            crm,
        }
    }

    /// Run the full intake pipeline for one submission.
    ///
    /// A geocode failure rejects the submission before anything is stored; a
    /// CRM delivery failure is recorded on the lead but does not reject it.
    pub async fn submit(&self, submission: LeadSubmission) -> Result<LeadRecord, LeadIntakeError> {
        submission.validate()?;

        if self
            .repository
            .find_by_contact(&submission.email, &submission.phone)?
            .is_some()
        {
            return Err(LeadIntakeError::Duplicate);
        }

        let assignment = self
            .campaigns
            .assign(&submission.zip_code, submission.age, &submission.gender)
            .await?;

        let (score, category) = extract_analysis_summary(submission.analysis.as_ref());

        let record = LeadRecord {
            id: next_lead_id(),
            first_name: submission.first_name,
            last_name: submission.last_name,
            age: submission.age,
            gender: submission.gender,
            email: submission.email,
            phone: submission.phone,
            city: assignment.resolved_city,
            zip_code: submission.zip_code,
            campaign_code: assignment.composed_code,
            wants_assessment: submission.wants_assessment,
            score,
            category,
            analysis: submission.analysis.unwrap_or_else(|| Value::Object(Default::default())),
            image_url: submission.image_url,
            webhook: WebhookState::pending(),
            created_at: Utc::now(),
        };

        let stored = self.repository.insert(record)?;
        info!(lead_id = %stored.id.0, campaign = %stored.campaign_code, "lead captured");

        let delivered = self.deliver_to_crm(stored).await?;
        Ok(delivered)
    }

    /// Captured leads for the admin console, newest first.
    pub fn list(&self) -> Result<Vec<LeadSummaryView>, LeadIntakeError> {
        let mut records = self.repository.list()?;
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(records.iter().map(LeadRecord::summary_view).collect())
    }

    /// Re-send the CRM webhook for a stored lead and record the new outcome.
    pub async fn retry_webhook(&self, id: &LeadId) -> Result<LeadRecord, LeadIntakeError> {
        let record = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;

        let delivered = self.deliver_to_crm(record).await?;
        Ok(delivered)
    }

    async fn deliver_to_crm(&self, mut record: LeadRecord) -> Result<LeadRecord, LeadIntakeError> {
        let payload = CrmPayload::from_record(&record);
        let report = self.crm.deliver(&payload).await;

        record.webhook = WebhookState {
            sent: report.status != WebhookStatus::NotConfigured,
            status: report.status,
            response: Some(report.response),
        };
        self.repository.update(record.clone())?;

        Ok(record)
    }
}

fn extract_analysis_summary(analysis: Option<&Value>) -> (i64, String) {
    let score = analysis
        .and_then(|value| value.get("suitability_score"))
        .and_then(Value::as_i64)
        .unwrap_or(0);

    let category = match analysis.and_then(|value| value.get("market_categorization")) {
        Some(Value::Object(map)) => map
            .get("primary")
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
            .to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => "Unknown".to_string(),
    };

    (score, category)
}

/// Error raised by the intake service.
#[derive(Debug, thiserror::Error)]
pub enum LeadIntakeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("this email or phone number has already been submitted")]
    Duplicate,
    #[error(transparent)]
    Geocode(#[from] GeocodeFailure),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
