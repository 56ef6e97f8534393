use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{LeadId, WebhookState};

/// Repository record for one captured lead, including the derived campaign
/// attribution and the latest webhook delivery state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadRecord {
    pub id: LeadId,
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub gender: String,
    pub email: String,
    pub phone: String,
    /// Display city resolved from the zip code, not visitor-entered.
    pub city: String,
    pub zip_code: String,
    pub campaign_code: String,
    pub wants_assessment: bool,
    pub score: i64,
    pub category: String,
    pub analysis: serde_json::Value,
    pub image_url: Option<String>,
    pub webhook: WebhookState,
    pub created_at: DateTime<Utc>,
}

impl LeadRecord {
    pub fn summary_view(&self) -> LeadSummaryView {
        LeadSummaryView {
            lead_id: self.id.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            city: self.city.clone(),
            zip_code: self.zip_code.clone(),
            campaign: self.campaign_code.clone(),
            score: self.score,
            category: self.category.clone(),
            webhook_status: self.webhook.status.label(),
            created_at: self.created_at,
        }
    }
}

/// Sanitized listing row for the admin console; the raw analysis blob stays
/// out of list responses.
#[derive(Debug, Clone, Serialize)]
pub struct LeadSummaryView {
    pub lead_id: LeadId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub zip_code: String,
    pub campaign: String,
    pub score: i64,
    pub category: String,
    pub webhook_status: &'static str,
    pub created_at: DateTime<Utc>,
}

/// Storage abstraction so the intake service can be exercised in isolation.
/// The production backend is an external collaborator; in-process adapters
/// keep records in memory.
pub trait LeadRepository: Send + Sync {
    fn insert(&self, record: LeadRecord) -> Result<LeadRecord, RepositoryError>;
    fn update(&self, record: LeadRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &LeadId) -> Result<Option<LeadRecord>, RepositoryError>;
    /// Find a lead matching either contact field, for duplicate screening.
    fn find_by_contact(
        &self,
        email: &str,
        phone: &str,
    ) -> Result<Option<LeadRecord>, RepositoryError>;
    /// All stored leads, in no particular order.
    fn list(&self) -> Result<Vec<LeadRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
