//! Lead intake: form validation, duplicate screening, campaign attribution,
//! persistence, and CRM webhook delivery with admin retry.

pub mod crm;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use crm::{CrmDelivery, CrmPayload, CrmWebhookClient, DeliveryReport};
pub use domain::{LeadId, LeadSubmission, ValidationError, WebhookState, WebhookStatus};
pub use repository::{LeadRecord, LeadRepository, LeadSummaryView, RepositoryError};
pub use router::lead_router;
pub use service::{LeadIntakeError, LeadIntakeService};
