use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{RegistrationDraft, RegistrationId};
use super::form::FormStore;
use super::guard::{GuardRejection, RateLimitPolicy, SubmissionGuard};
use super::repository::{RegistrationRepository, RepositoryError};
use super::validation::{age_error, email_error, phone_error};
use crate::storage::StoragePort;

/// Where a submission attempt currently is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Validating,
    Guards,
    Writing,
    Succeeded,
    Failed,
}

/// A field-scoped, user-correctable validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// What the caller gets back for a committed submission: the assigned id and
/// the completion route to navigate to.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub id: RegistrationId,
    pub redirect: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] FieldError),
    #[error(transparent)]
    Guard(#[from] GuardRejection),
    #[error("登録に失敗しました。もう一度お試しください。")]
    Write(#[source] RepositoryError),
}

impl SubmissionError {
    /// The phase the attempt failed in.
    pub fn phase(&self) -> SubmissionPhase {
        match self {
            SubmissionError::Validation(_) => SubmissionPhase::Validating,
            SubmissionError::Guard(_) => SubmissionPhase::Guards,
            SubmissionError::Write(_) => SubmissionPhase::Writing,
        }
    }
}

/// Orchestrates one submission attempt: draft validation, the guard chain,
/// a single write, then local rate-limit bookkeeping.
///
/// Per attempt the phases run idle → validating → guards → writing →
/// succeeded/failed, each gating the next. Failures leave the draft exactly
/// as it was so the applicant can correct and retry.
pub struct SubmissionService<R, S> {
    repository: Arc<R>,
    guard: SubmissionGuard<R, S>,
}

impl<R, S> SubmissionService<R, S>
where
    R: RegistrationRepository,
    S: StoragePort,
{
    pub fn new(repository: Arc<R>, storage: Arc<S>, policy: RateLimitPolicy) -> Self {
        let guard = SubmissionGuard::new(repository.clone(), storage, policy);
        Self { repository, guard }
    }

    /// Validate, guard, and persist a draft. The rate-limit timestamp is
    /// recorded only after the write commits.
    pub fn submit_draft(
        &self,
        draft: &RegistrationDraft,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let mut phase = SubmissionPhase::Validating;
        debug!(?phase, "submission attempt started");
        validate_draft(draft)?;

        phase = SubmissionPhase::Guards;
        debug!(?phase, "draft valid, running guards");
        self.guard.check(draft, now)?;

        phase = SubmissionPhase::Writing;
        debug!(?phase, "guards passed, writing record");
        let record = self
            .repository
            .insert(draft)
            .map_err(SubmissionError::Write)?;

        self.guard.limiter().record(now);
        info!(id = %record.id.0, "registration accepted");

        Ok(SubmissionReceipt {
            id: record.id,
            redirect: "/complete",
        })
    }

    /// Submit the draft held by a form store, resetting the store on success
    /// so a fresh session starts at step 1.
    pub fn submit(
        &self,
        form: &mut FormStore,
        now: DateTime<Utc>,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let receipt = self.submit_draft(form.data(), now)?;
        form.reset();
        Ok(receipt)
    }
}

/// Whole-draft validation applied before the guards: the step 1-4 completion
/// rules collapsed into field-scoped checks.
pub fn validate_draft(draft: &RegistrationDraft) -> Result<(), FieldError> {
    if draft.priority.is_none() {
        return Err(FieldError::new("priority", "優先条件を選択してください"));
    }
    if draft.qualifications.is_empty() {
        return Err(FieldError::new(
            "qualifications",
            "資格を1つ以上選択してください",
        ));
    }
    if draft.prefecture.trim().is_empty() {
        return Err(FieldError::new("prefecture", "都道府県を入力してください"));
    }
    if draft.full_name.trim().is_empty() {
        return Err(FieldError::new("fullName", "氏名を入力してください"));
    }
    if let Some(message) = age_error(&draft.age) {
        return Err(FieldError::new("age", message));
    }
    if let Some(message) = phone_error(&draft.phone_number) {
        return Err(FieldError::new("phoneNumber", message));
    }
    if let Some(message) = email_error(&draft.email) {
        return Err(FieldError::new("email", message));
    }
    if !draft.agree_to_terms {
        return Err(FieldError::new(
            "agreeToTerms",
            "利用規約への同意が必要です",
        ));
    }
    Ok(())
}
