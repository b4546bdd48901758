use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::admin::auth::{AuthError, Identity, IdentityProvider, Role, UserProfile};
use crate::registration::domain::{
    Priority, RegistrationDraft, RegistrationId, RegistrationRecord, RegistrationStatus,
};
use crate::registration::repository::{RegistrationRepository, RepositoryError};

/// Store fake seeded with explicit records and timestamps so sync tests can
/// control the watermark behavior.
#[derive(Default)]
pub(super) struct SeededRepository {
    pub(super) records: Mutex<Vec<RegistrationRecord>>,
    pub(super) fail_fetches: AtomicBool,
    pub(super) fail_updates: AtomicBool,
}

impl SeededRepository {
    pub(super) fn seed(&self, records: Vec<RegistrationRecord>) {
        *self.records.lock().expect("repository mutex") = records;
    }

    pub(super) fn push(&self, record: RegistrationRecord) {
        self.records.lock().expect("repository mutex").push(record);
    }

    pub(super) fn stored(&self) -> Vec<RegistrationRecord> {
        self.records.lock().expect("repository mutex").clone()
    }
}

impl RegistrationRepository for SeededRepository {
    fn insert(&self, draft: &RegistrationDraft) -> Result<RegistrationRecord, RepositoryError> {
        let record = RegistrationRecord::from_draft(
            RegistrationId(format!("reg-{:06}", self.stored().len() + 1)),
            draft,
            Utc::now(),
        );
        self.push(record.clone());
        Ok(record)
    }

    fn fetch_all(&self) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        if self.fail_fetches.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
        let mut records = self.stored();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn fetch_since(
        &self,
        marker: DateTime<Utc>,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        if self.fail_fetches.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
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
        if self.fail_updates.load(Ordering::Relaxed) {
            return Err(RepositoryError::Unavailable("store offline".to_string()));
        }
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
        let records = self.records.lock().expect("repository mutex");
        Ok(records.iter().any(|record| {
            record.email == email
                && record.phone_number == phone
                && record.status == RegistrationStatus::Pending
        }))
    }
}

/// Identity fake with a fixed admin account and togglable outage.
pub(super) struct FakeProvider {
    session: Mutex<Option<Identity>>,
    pub(super) admin_uid: &'static str,
    pub(super) fail_profile_lookups: AtomicBool,
    pub(super) fail_identity_lookups: AtomicBool,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            session: Mutex::new(None),
            admin_uid: "admin-uid",
            fail_profile_lookups: AtomicBool::new(false),
            fail_identity_lookups: AtomicBool::new(false),
        }
    }
}

impl FakeProvider {
    pub(super) fn sign_in_as(&self, uid: &str, email: &str) {
        *self.session.lock().expect("session mutex") = Some(Identity {
            uid: uid.to_string(),
            email: email.to_string(),
        });
    }
}

impl IdentityProvider for FakeProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if email == "admin@example.com" && password == "secret" {
            let identity = Identity {
                uid: self.admin_uid.to_string(),
                email: email.to_string(),
            };
            *self.session.lock().expect("session mutex") = Some(identity.clone());
            return Ok(identity);
        }
        if email == "user@example.com" && password == "secret" {
            let identity = Identity {
                uid: "user-uid".to_string(),
                email: email.to_string(),
            };
            *self.session.lock().expect("session mutex") = Some(identity.clone());
            return Ok(identity);
        }
        Err(AuthError::InvalidCredentials)
    }

    fn sign_out(&self) {
        *self.session.lock().expect("session mutex") = None;
    }

    fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        if self.fail_identity_lookups.load(Ordering::Relaxed) {
            return Err(AuthError::Unavailable("identity outage".to_string()));
        }
        Ok(self.session.lock().expect("session mutex").clone())
    }

    fn profile(&self, uid: &str) -> Result<Option<UserProfile>, AuthError> {
        if self.fail_profile_lookups.load(Ordering::Relaxed) {
            return Err(AuthError::Unavailable("profile outage".to_string()));
        }
        if uid == self.admin_uid {
            return Ok(Some(UserProfile {
                email: "admin@example.com".to_string(),
                role: Role::Admin,
                created_at: instant(0),
            }));
        }
        if uid == "user-uid" {
            return Ok(Some(UserProfile {
                email: "user@example.com".to_string(),
                role: Role::User,
                created_at: instant(0),
            }));
        }
        Ok(None)
    }
}

/// Minutes after a fixed epoch, so fixtures read chronologically.
pub(super) fn instant(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("valid instant")
        + chrono::Duration::minutes(minutes)
}

pub(super) fn record(id: &str, created_minutes: i64) -> RegistrationRecord {
    RegistrationRecord {
        id: RegistrationId(id.to_string()),
        priority: Some(Priority::Salary),
        qualifications: vec!["介護福祉士".to_string()],
        prefecture: "東京都".to_string(),
        full_name: "山田 太郎".to_string(),
        age: "32".to_string(),
        phone_number: "090-1234-5678".to_string(),
        email: "taro@example.com".to_string(),
        agree_to_terms: true,
        apply_for_agent: false,
        created_at: instant(created_minutes),
        status: RegistrationStatus::Pending,
    }
}
