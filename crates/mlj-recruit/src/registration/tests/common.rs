use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::registration::domain::{
    Priority, RegistrationDraft, RegistrationId, RegistrationRecord, RegistrationStatus,
};
use crate::registration::guard::RateLimitPolicy;
use crate::registration::repository::{RegistrationRepository, RepositoryError};
use crate::registration::service::SubmissionService;
use crate::storage::MemoryStorage;

/// Store fake with togglable failure modes and a probe counter so tests can
/// assert guard short-circuiting.
#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) records: Mutex<Vec<RegistrationRecord>>,
    sequence: AtomicU64,
    pub(super) fail_inserts: AtomicBool,
    pub(super) fail_duplicate_checks: AtomicBool,
    pub(super) duplicate_probes: AtomicU64,
}

impl MemoryRepository {
    pub(super) fn stored(&self) -> Vec<RegistrationRecord> {
        self.records.lock().expect("repository mutex").clone()
    }
}

impl RegistrationRepository for MemoryRepository {
    fn insert(&self, draft: &RegistrationDraft) -> Result<RegistrationRecord, RepositoryError> {
        if self.fail_inserts.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = RegistrationRecord::from_draft(
            RegistrationId(format!("reg-{id:06}")),
            draft,
            Utc::now(),
        );
        let mut records = self.records.lock().expect("repository mutex");
        records.push(record.clone());
        Ok(record)
    }

    fn fetch_all(&self) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        let mut records = self.stored();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn fetch_since(
        &self,
        marker: DateTime<Utc>,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        let mut records: Vec<_> = self
            .stored()
            .into_iter()
            .filter(|record| record.created_at > marker)
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn update_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().expect("repository mutex");
        match records.iter_mut().find(|record| record.id == *id) {
            Some(record) => {
                record.status = status;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn has_pending_contact(&self, email: &str, phone: &str) -> Result<bool, RepositoryError> {
        self.duplicate_probes.fetch_add(1, Ordering::Relaxed);
        if self.fail_duplicate_checks.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("query failed".to_string()));
        }
        let records = self.records.lock().expect("repository mutex");
        Ok(records.iter().any(|record| {
            record.email == email
                && record.phone_number == phone
                && record.status == RegistrationStatus::Pending
        }))
    }
}

pub(super) fn valid_draft() -> RegistrationDraft {
    RegistrationDraft {
        priority: Some(Priority::Salary),
        qualifications: vec!["介護福祉士".to_string()],
        prefecture: "東京都".to_string(),
        full_name: "山田 太郎".to_string(),
        age: "32".to_string(),
        phone_number: "090-1234-5678".to_string(),
        email: "taro@example.com".to_string(),
        agree_to_terms: true,
        apply_for_agent: false,
        website: String::new(),
    }
}

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().expect("valid instant")
}

pub(super) fn build_service(
) -> (Arc<MemoryRepository>, Arc<MemoryStorage>, SubmissionService<MemoryRepository, MemoryStorage>)
{
    let repository = Arc::new(MemoryRepository::default());
    let storage = Arc::new(MemoryStorage::default());
    let service = SubmissionService::new(
        repository.clone(),
        storage.clone(),
        RateLimitPolicy::default(),
    );
    (repository, storage, service)
}
