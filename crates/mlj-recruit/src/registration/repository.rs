use super::domain::{RegistrationDraft, RegistrationId, RegistrationRecord, RegistrationStatus};
use chrono::{DateTime, Utc};

/// Port onto the registration store so the pipeline and the admin console
/// can be exercised against in-memory fakes.
///
/// The store assigns identifiers and creation timestamps on insert. Both
/// fetch operations return records ordered by creation time descending;
/// `fetch_since` is strictly greater-than, which is what the incremental
/// sync marker relies on.
pub trait RegistrationRepository: Send + Sync {
    fn insert(&self, draft: &RegistrationDraft) -> Result<RegistrationRecord, RepositoryError>;
    fn fetch_all(&self) -> Result<Vec<RegistrationRecord>, RepositoryError>;
    fn fetch_since(
        &self,
        marker: DateTime<Utc>,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError>;
    fn update_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<(), RepositoryError>;
    /// Whether a pending record with this exact email and phone pair exists.
    fn has_pending_contact(&self, email: &str, phone: &str) -> Result<bool, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("registration store unavailable: {0}")]
    Unavailable(String),
}
