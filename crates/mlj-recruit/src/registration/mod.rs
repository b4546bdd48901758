//! Registration intake pipeline: form state, field validation, anti-abuse
//! guards, and the submission executor that writes accepted drafts to the
//! registration store.

pub mod domain;
pub mod form;
pub mod guard;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    Priority, RegistrationDraft, RegistrationId, RegistrationRecord, RegistrationStatus,
};
pub use form::{DraftPatch, FormStore, FIRST_STEP, LAST_STEP};
pub use guard::{GuardRejection, RateLimitPolicy, RateLimiter, SubmissionGuard};
pub use repository::{RegistrationRepository, RepositoryError};
pub use router::registration_router;
pub use service::{
    FieldError, SubmissionError, SubmissionPhase, SubmissionReceipt, SubmissionService,
};
