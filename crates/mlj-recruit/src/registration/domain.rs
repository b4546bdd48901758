use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for persisted registrations. Assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub String);

/// The one condition an applicant marked as most important in step 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Vision,
    Fulfillment,
    Salary,
    Location,
    Atmosphere,
    Benefits,
}

impl Priority {
    pub const fn code(self) -> &'static str {
        match self {
            Priority::Vision => "vision",
            Priority::Fulfillment => "fulfillment",
            Priority::Salary => "salary",
            Priority::Location => "location",
            Priority::Atmosphere => "atmosphere",
            Priority::Benefits => "benefits",
        }
    }

    /// Display label shown in the admin console and CSV export.
    pub const fn label(self) -> &'static str {
        match self {
            Priority::Vision => "ビジョン",
            Priority::Fulfillment => "やりがい",
            Priority::Salary => "給与",
            Priority::Location => "勤務地",
            Priority::Atmosphere => "雰囲気",
            Priority::Benefits => "福利厚生",
        }
    }
}

/// Review status of a persisted registration. New records start pending;
/// only the admin console moves them afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub const fn code(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "未対応",
            RegistrationStatus::Approved => "承認済み",
            RegistrationStatus::Rejected => "却下",
        }
    }
}

/// In-progress form state for one registration session. Text fields use the
/// empty string for "not yet entered"; `website` is the honeypot and must
/// stay empty for human submissions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDraft {
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub prefecture: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub agree_to_terms: bool,
    #[serde(default)]
    pub apply_for_agent: bool,
    #[serde(default)]
    pub website: String,
}

/// A persisted registration as the admin console sees it. Carries every
/// draft field except the honeypot, plus store-assigned metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    pub id: RegistrationId,
    pub priority: Option<Priority>,
    pub qualifications: Vec<String>,
    pub prefecture: String,
    pub full_name: String,
    pub age: String,
    pub phone_number: String,
    pub email: String,
    pub agree_to_terms: bool,
    pub apply_for_agent: bool,
    pub created_at: DateTime<Utc>,
    pub status: RegistrationStatus,
}

impl RegistrationRecord {
    /// Build the record that gets persisted for an accepted draft. The
    /// honeypot field is dropped here and never reaches the store.
    pub fn from_draft(
        id: RegistrationId,
        draft: &RegistrationDraft,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            priority: draft.priority,
            qualifications: draft.qualifications.clone(),
            prefecture: draft.prefecture.clone(),
            full_name: draft.full_name.clone(),
            age: draft.age.clone(),
            phone_number: draft.phone_number.clone(),
            email: draft.email.clone(),
            agree_to_terms: draft.agree_to_terms,
            apply_for_agent: draft.apply_for_agent,
            created_at,
            status: RegistrationStatus::Pending,
        }
    }

    /// Age parsed for range filtering; `None` for free text that never
    /// passed validation (legacy rows).
    pub fn age_years(&self) -> Option<u32> {
        self.age.trim().parse().ok()
    }
}
