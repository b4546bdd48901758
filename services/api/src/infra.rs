use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use mlj_recruit::admin::{AuthError, Identity, IdentityProvider, Role, UserProfile};
use mlj_recruit::config::AdminConfig;
use mlj_recruit::registration::{
    RegistrationDraft, RegistrationId, RegistrationRecord, RegistrationRepository,
    RegistrationStatus, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local registration store. Identifiers are assigned from a
/// monotonic sequence so listing order is stable under equal timestamps.
#[derive(Default)]
pub(crate) struct InMemoryRegistrationRepository {
    records: Mutex<Vec<RegistrationRecord>>,
    sequence: AtomicU64,
}

impl RegistrationRepository for InMemoryRegistrationRepository {
    fn insert(&self, draft: &RegistrationDraft) -> Result<RegistrationRecord, RepositoryError> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let record = RegistrationRecord::from_draft(
            RegistrationId(format!("reg-{seq:06}")),
            draft,
            Utc::now(),
        );
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?
            .push(record.clone());
        Ok(record)
    }

    fn fetch_all(&self) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut records = guard.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn fetch_since(
        &self,
        marker: DateTime<Utc>,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut records: Vec<_> = guard
            .iter()
            .filter(|record| record.created_at > marker)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn update_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        match guard.iter_mut().find(|record| record.id == *id) {
            Some(record) => {
                record.status = status;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn has_pending_contact(&self, email: &str, phone: &str) -> Result<bool, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.iter().any(|record| {
            record.email == email
                && record.phone_number == phone
                && record.status == RegistrationStatus::Pending
        }))
    }
}

const ADMIN_UID: &str = "admin-local";

/// Identity adapter backed by the `ADMIN_EMAIL`/`ADMIN_PASSWORD` pair from
/// configuration. One session slot: the console is single-operator.
pub(crate) struct EnvIdentityProvider {
    config: AdminConfig,
    created_at: DateTime<Utc>,
    session: Mutex<Option<Identity>>,
}

impl EnvIdentityProvider {
    pub(crate) fn new(config: AdminConfig) -> Self {
        Self {
            config,
            created_at: Utc::now(),
            session: Mutex::new(None),
        }
    }
}

impl IdentityProvider for EnvIdentityProvider {
    fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        if !email.eq_ignore_ascii_case(&self.config.email) || password != self.config.password {
            return Err(AuthError::InvalidCredentials);
        }
        let identity = Identity {
            uid: ADMIN_UID.to_string(),
            email: self.config.email.clone(),
        };
        *self
            .session
            .lock()
            .map_err(|_| AuthError::Unavailable("session mutex poisoned".to_string()))? =
            Some(identity.clone());
        Ok(identity)
    }

    fn sign_out(&self) {
        if let Ok(mut guard) = self.session.lock() {
            *guard = None;
        }
    }

    fn current_identity(&self) -> Result<Option<Identity>, AuthError> {
        Ok(self
            .session
            .lock()
            .map_err(|_| AuthError::Unavailable("session mutex poisoned".to_string()))?
            .clone())
    }

    fn profile(&self, uid: &str) -> Result<Option<UserProfile>, AuthError> {
        if uid != ADMIN_UID {
            return Ok(None);
        }
        Ok(Some(UserProfile {
            email: self.config.email.clone(),
            role: Role::Admin,
            created_at: self.created_at,
        }))
    }
}
