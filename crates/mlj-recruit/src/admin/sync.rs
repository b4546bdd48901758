//! Incremental fetch/merge of registration records for the admin console.
//!
//! A last-fetch watermark lives behind the storage port; each fetch pulls
//! only records created strictly after it, merges them into the in-memory
//! cache, and advances the watermark. The cache mutex serializes overlapping
//! fetches, so rapid refreshes cannot interleave merges.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::registration::domain::{RegistrationId, RegistrationRecord};
use crate::registration::repository::{RegistrationRepository, RepositoryError};
use crate::storage::StoragePort;

/// Storage slot holding the RFC 3339 timestamp of the last successful fetch.
pub const LAST_FETCH_KEY: &str = "menlabojob_admin_last_fetch";

pub struct SyncEngine<R, S> {
    repository: Arc<R>,
    storage: Arc<S>,
    cache: Mutex<Vec<RegistrationRecord>>,
}

impl<R, S> SyncEngine<R, S>
where
    R: RegistrationRepository,
    S: StoragePort,
{
    pub fn new(repository: Arc<R>, storage: Arc<S>) -> Self {
        Self {
            repository,
            storage,
            cache: Mutex::new(Vec::new()),
        }
    }

    /// The current watermark, if a fetch has succeeded before. A slot that
    /// does not parse counts as absent and forces a full fetch.
    pub fn last_fetch(&self) -> Option<DateTime<Utc>> {
        let raw = self.storage.get(LAST_FETCH_KEY)?;
        DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|parsed| parsed.with_timezone(&Utc))
    }

    /// Fetch records created after the watermark (everything on first use),
    /// merge them into the cache, and advance the watermark to `now`. The
    /// watermark moves on every successful fetch, including empty ones.
    pub fn fetch_incremental(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        let incoming = match self.last_fetch() {
            None => self.repository.fetch_all()?,
            Some(marker) => self.repository.fetch_since(marker)?,
        };

        let mut cache = self.cache.lock().expect("sync cache mutex poisoned");
        debug!(incoming = incoming.len(), cached = cache.len(), "merging fetched records");
        *cache = merge(&cache, incoming);
        self.storage.set(LAST_FETCH_KEY, &now.to_rfc3339());
        Ok(cache.clone())
    }

    /// Drop the watermark and replace the cache wholesale with a full fetch.
    pub fn refresh_all(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<RegistrationRecord>, RepositoryError> {
        self.storage.remove(LAST_FETCH_KEY);
        let records = self.repository.fetch_all()?;

        let mut cache = self.cache.lock().expect("sync cache mutex poisoned");
        *cache = records;
        self.storage.set(LAST_FETCH_KEY, &now.to_rfc3339());
        Ok(cache.clone())
    }

    /// Apply an in-memory patch to one cached record, independent of remote
    /// state. Returns whether the record was present.
    pub fn update_local<F>(&self, id: &RegistrationId, patch: F) -> bool
    where
        F: FnOnce(&mut RegistrationRecord),
    {
        let mut cache = self.cache.lock().expect("sync cache mutex poisoned");
        match cache.iter_mut().find(|record| record.id == *id) {
            Some(record) => {
                patch(record);
                true
            }
            None => false,
        }
    }

    pub fn find(&self, id: &RegistrationId) -> Option<RegistrationRecord> {
        let cache = self.cache.lock().expect("sync cache mutex poisoned");
        cache.iter().find(|record| record.id == *id).cloned()
    }

    pub fn snapshot(&self) -> Vec<RegistrationRecord> {
        self.cache.lock().expect("sync cache mutex poisoned").clone()
    }
}

/// Right-biased union keyed by id: the result starts as `incoming` in full,
/// then keeps every existing record whose id is not already present, so
/// fresher data wins on collision. Re-sorted by creation time descending.
pub fn merge(
    existing: &[RegistrationRecord],
    incoming: Vec<RegistrationRecord>,
) -> Vec<RegistrationRecord> {
    let incoming_ids: HashSet<RegistrationId> =
        incoming.iter().map(|record| record.id.clone()).collect();

    let mut merged = incoming;
    merged.extend(
        existing
            .iter()
            .filter(|record| !incoming_ids.contains(&record.id))
            .cloned(),
    );

    merged.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    merged
}
