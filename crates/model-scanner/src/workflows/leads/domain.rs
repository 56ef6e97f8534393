use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub String);

/// The raw form payload a visitor submits to unlock their report.
///
/// The uploaded image itself lives with the storage collaborator; the
/// submission only carries the public URL once the upload completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadSubmission {
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub gender: String,
    pub email: String,
    pub phone: String,
    pub zip_code: String,
    #[serde(default)]
    pub wants_assessment: bool,
    #[serde(default)]
    pub analysis: Option<serde_json::Value>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl LeadSubmission {
    /// Form-layer validation, applied before any geocoding happens. Campaign
    /// attribution itself assumes already-validated input.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !email_is_valid(&self.email) {
            return Err(ValidationError::InvalidEmail);
        }

        let digits: String = self.phone.chars().filter(char::is_ascii_digit).collect();
        if digits.len() != 10 {
            return Err(ValidationError::PhoneLength);
        }
        if digits.starts_with('1') {
            return Err(ValidationError::PhoneCountryPrefix);
        }

        if self.zip_code.len() != 5 || !self.zip_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidZip);
        }

        if self.age == 0 {
            return Err(ValidationError::InvalidAge);
        }

        Ok(())
    }
}

fn email_is_valid(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        _ => false,
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("phone number must be exactly 10 digits")]
    PhoneLength,
    #[error("phone number cannot start with 1")]
    PhoneCountryPrefix,
    #[error("zip code must be exactly 5 digits")]
    InvalidZip,
    #[error("age must be a positive integer")]
    InvalidAge,
}

/// Outcome of the most recent CRM delivery attempt for a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookStatus {
    Pending,
    Success,
    Failed,
    NotConfigured,
}

impl WebhookStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Failed => "failed",
            Self::NotConfigured => "not_configured",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookState {
    pub sent: bool,
    pub status: WebhookStatus,
    pub response: Option<String>,
}

impl WebhookState {
    pub fn pending() -> Self {
        Self {
            sent: false,
            status: WebhookStatus::Pending,
            response: None,
        }
    }
}
