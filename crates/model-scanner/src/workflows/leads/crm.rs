use std::future::Future;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::WebhookStatus;
use super::repository::LeadRecord;

const RESPONSE_PREVIEW_CHARS: usize = 500;

/// Flat payload shape the CRM endpoint expects. Every field is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrmPayload {
    pub campaign: String,
    pub email: String,
    pub telephone: String,
    pub address: String,
    pub firstname: String,
    pub lastname: String,
    pub image: String,
    pub analyticsid: String,
    pub age: String,
    pub gender: String,
    pub opt_in: String,
}

impl CrmPayload {
    pub fn from_record(record: &LeadRecord) -> Self {
        let address = match (record.city.is_empty(), record.zip_code.is_empty()) {
            (false, false) => format!("{}, {}", record.city, record.zip_code),
            (false, true) => record.city.clone(),
            (true, false) => record.zip_code.clone(),
            (true, true) => String::new(),
        };

        // The CRM gender flag defaults to F for anything but the Male
        // literal; the campaign code's bucket defaults the other way.
        let gender = if record.gender == "Male" { "M" } else { "F" };

        Self {
            campaign: record.campaign_code.clone(),
            email: record.email.clone(),
            telephone: record.phone.clone(),
            address,
            firstname: record.first_name.clone(),
            lastname: record.last_name.clone(),
            image: record.image_url.clone().unwrap_or_default(),
            analyticsid: String::new(),
            age: record.age.to_string(),
            gender: gender.to_string(),
            opt_in: if record.wants_assessment {
                "true".to_string()
            } else {
                "false".to_string()
            },
        }
    }
}

/// Outcome of one delivery attempt. Delivery never raises; transport problems
/// come back as a `Failed` report so the lead record can store them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub status: WebhookStatus,
    pub response: String,
}

pub trait CrmDelivery: Send + Sync {
    fn deliver(&self, payload: &CrmPayload) -> impl Future<Output = DeliveryReport> + Send;
}

/// CRM forwarder POSTing leads to the configured webhook URL.
#[derive(Debug, Clone)]
pub struct CrmWebhookClient {
    http: reqwest::Client,
    webhook_url: Option<String>,
}

impl CrmWebhookClient {
    pub fn new(http: reqwest::Client, webhook_url: Option<String>) -> Self {
        Self { http, webhook_url }
    }
}

impl CrmDelivery for CrmWebhookClient {
    async fn deliver(&self, payload: &CrmPayload) -> DeliveryReport {
        let Some(url) = self.webhook_url.as_deref() else {
            return DeliveryReport {
                status: WebhookStatus::NotConfigured,
                response: "CRM_WEBHOOK_URL not set".to_string(),
            };
        };

        info!(%url, campaign = %payload.campaign, "sending CRM webhook");

        match self.http.post(url).json(payload).send().await {
            Ok(response) => {
                let status = if response.status().as_u16() < 300 {
                    WebhookStatus::Success
                } else {
                    WebhookStatus::Failed
                };
                let body = match response.text().await {
                    Ok(text) => preview(&text),
                    Err(err) => format!("unreadable response body: {err}"),
                };
                if status == WebhookStatus::Failed {
                    warn!(response = %body, "CRM webhook rejected the payload");
                }
                DeliveryReport {
                    status,
                    response: body,
                }
            }
            Err(err) if err.is_timeout() => DeliveryReport {
                status: WebhookStatus::Failed,
                response: "timeout: request took longer than 10 seconds".to_string(),
            },
            Err(err) if err.is_connect() => DeliveryReport {
                status: WebhookStatus::Failed,
                response: preview(&format!("connection error: {err}")),
            },
            Err(err) => DeliveryReport {
                status: WebhookStatus::Failed,
                response: preview(&format!("request error: {err}")),
            },
        }
    }
}

fn preview(text: &str) -> String {
    text.chars().take(RESPONSE_PREVIEW_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::leads::domain::{LeadId, WebhookState};
    use chrono::Utc;

    fn record() -> LeadRecord {
        LeadRecord {
            id: LeadId("lead-000001".to_string()),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            age: 30,
            gender: "Female".to_string(),
            email: "jane@example.com".to_string(),
            phone: "5550123456".to_string(),
            city: "New York City".to_string(),
            zip_code: "10001".to_string(),
            campaign_code: "#NYIG21F".to_string(),
            wants_assessment: true,
            score: 82,
            category: "Commercial".to_string(),
            analysis: serde_json::json!({}),
            image_url: None,
            webhook: WebhookState::pending(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn payload_formats_address_and_flags() {
        let payload = CrmPayload::from_record(&record());
        assert_eq!(payload.address, "New York City, 10001");
        assert_eq!(payload.gender, "F");
        assert_eq!(payload.opt_in, "true");
        assert_eq!(payload.age, "30");
        assert_eq!(payload.image, "");
        assert_eq!(payload.analyticsid, "");
    }

    #[test]
    fn crm_gender_flag_defaults_to_f_unless_male() {
        let mut male = record();
        male.gender = "Male".to_string();
        assert_eq!(CrmPayload::from_record(&male).gender, "M");

        let mut other = record();
        other.gender = "Other".to_string();
        assert_eq!(CrmPayload::from_record(&other).gender, "F");
    }

    #[test]
    fn missing_city_leaves_zip_only_address() {
        let mut no_city = record();
        no_city.city = String::new();
        assert_eq!(CrmPayload::from_record(&no_city).address, "10001");
    }

    #[tokio::test]
    async fn missing_url_reports_not_configured() {
        let client = CrmWebhookClient::new(reqwest::Client::new(), None);
        let report = client.deliver(&CrmPayload::from_record(&record())).await;
        assert_eq!(report.status, WebhookStatus::NotConfigured);
        assert!(report.response.contains("CRM_WEBHOOK_URL"));
    }
}
