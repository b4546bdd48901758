use serde::{Deserialize, Serialize};

use super::domain::{Priority, RegistrationDraft};
use super::validation::{is_valid_email, is_valid_phone_number};

pub const FIRST_STEP: u8 = 1;
pub const LAST_STEP: u8 = 5;

/// Partial update for a draft: only named fields are overwritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Option<Priority>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifications: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agree_to_terms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_for_agent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// Holds the current step and accumulated field values for one form session.
///
/// Transitions move by exactly one step and clamp to `[FIRST_STEP, LAST_STEP]`.
/// The store performs no validation; callers gate transitions with
/// [`FormStore::can_proceed`] or the validators directly.
#[derive(Debug, Clone)]
pub struct FormStore {
    current_step: u8,
    data: RegistrationDraft,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStore {
    pub fn new() -> Self {
        Self {
            current_step: FIRST_STEP,
            data: RegistrationDraft::default(),
        }
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn data(&self) -> &RegistrationDraft {
        &self.data
    }

    /// Merge the given fields into the draft, overwriting only named ones.
    pub fn set_data(&mut self, patch: DraftPatch) {
        if let Some(priority) = patch.priority {
            self.data.priority = priority;
        }
        if let Some(qualifications) = patch.qualifications {
            self.data.qualifications = qualifications;
        }
        if let Some(prefecture) = patch.prefecture {
            self.data.prefecture = prefecture;
        }
        if let Some(full_name) = patch.full_name {
            self.data.full_name = full_name;
        }
        if let Some(age) = patch.age {
            self.data.age = age;
        }
        if let Some(phone_number) = patch.phone_number {
            self.data.phone_number = phone_number;
        }
        if let Some(email) = patch.email {
            self.data.email = email;
        }
        if let Some(agree_to_terms) = patch.agree_to_terms {
            self.data.agree_to_terms = agree_to_terms;
        }
        if let Some(apply_for_agent) = patch.apply_for_agent {
            self.data.apply_for_agent = apply_for_agent;
        }
        if let Some(website) = patch.website {
            self.data.website = website;
        }
    }

    pub fn set_step(&mut self, step: u8) {
        self.current_step = step.clamp(FIRST_STEP, LAST_STEP);
    }

    pub fn next_step(&mut self) {
        self.current_step = (self.current_step + 1).min(LAST_STEP);
    }

    pub fn prev_step(&mut self) {
        self.current_step = self.current_step.saturating_sub(1).max(FIRST_STEP);
    }

    /// Restore the initial draft and return to step 1.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Whether the current step's requirements are met. Step 5 is the
    /// completion screen and always passes.
    pub fn can_proceed(&self) -> bool {
        match self.current_step {
            1 => self.data.priority.is_some(),
            2 => !self.data.qualifications.is_empty(),
            3 => {
                !self.data.prefecture.is_empty()
                    && !self.data.full_name.is_empty()
                    && !self.data.age.is_empty()
                    && is_valid_phone_number(&self.data.phone_number)
                    && is_valid_email(&self.data.email)
            }
            4 => self.data.agree_to_terms,
            _ => true,
        }
    }
}
