use std::cmp::Ordering;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use super::sync::SyncEngine;
use crate::registration::domain::{RegistrationId, RegistrationRecord, RegistrationStatus};
use crate::registration::repository::{RegistrationRepository, RepositoryError};
use crate::storage::StoragePort;

/// Conjunctive filter over the review table. Every predicate is optional;
/// unset predicates match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewFilter {
    pub search: Option<String>,
    pub status: Option<RegistrationStatus>,
    pub age_min: Option<u32>,
    pub age_max: Option<u32>,
    pub qualification: Option<String>,
}

impl ReviewFilter {
    pub fn matches(&self, record: &RegistrationRecord) -> bool {
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let text_hit = record.full_name.to_lowercase().contains(&needle)
                || record.email.to_lowercase().contains(&needle)
                || record.phone_number.contains(search)
                || record.prefecture.contains(search);
            if !text_hit {
                return false;
            }
        }

        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }

        if self.age_min.is_some() || self.age_max.is_some() {
            // Unparsable ages are excluded whenever a bound is active.
            let Some(age) = record.age_years() else {
                return false;
            };
            if self.age_min.is_some_and(|min| age < min) {
                return false;
            }
            if self.age_max.is_some_and(|max| age > max) {
                return false;
            }
        }

        if let Some(qualification) = self.qualification.as_deref().filter(|q| !q.is_empty()) {
            if !record.qualifications.iter().any(|q| q == qualification) {
                return false;
            }
        }

        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CreatedAt,
    FullName,
    Age,
    Prefecture,
    Status,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Single active sort column plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for ReviewSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl ReviewSort {
    /// Clicking the active column flips direction; a new column starts
    /// descending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.order = match self.order {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
        } else {
            self.field = field;
            self.order = SortOrder::Desc;
        }
    }

    fn compare(&self, a: &RegistrationRecord, b: &RegistrationRecord) -> Ordering {
        let ascending = match self.field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::FullName => a.full_name.cmp(&b.full_name),
            SortField::Age => a.age_years().cmp(&b.age_years()),
            SortField::Prefecture => a.prefecture.cmp(&b.prefecture),
            SortField::Status => a.status.code().cmp(&b.status.code()),
        };
        match self.order {
            SortOrder::Asc => ascending,
            SortOrder::Desc => ascending.reverse(),
        }
    }
}

/// The review table's client-side view logic: filter then sort.
#[derive(Debug, Clone, Default)]
pub struct ReviewTable {
    pub filter: ReviewFilter,
    pub sort: ReviewSort,
}

impl ReviewTable {
    pub fn view(&self, records: &[RegistrationRecord]) -> Vec<RegistrationRecord> {
        let mut view: Vec<RegistrationRecord> = records
            .iter()
            .filter(|record| self.filter.matches(record))
            .cloned()
            .collect();
        view.sort_by(|a, b| self.sort.compare(a, b));
        view
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("record not found in the review cache")]
    UnknownRecord,
    #[error("ステータスの更新に失敗しました。")]
    Remote(#[source] RepositoryError),
}

/// Status mutation with an optimistic local echo: the cached record is
/// patched immediately, then the remote write runs; a remote failure rolls
/// the cached field back to its pre-update value.
pub struct ReviewService<R, S> {
    sync: Arc<SyncEngine<R, S>>,
    repository: Arc<R>,
}

impl<R, S> ReviewService<R, S>
where
    R: RegistrationRepository,
    S: StoragePort,
{
    pub fn new(sync: Arc<SyncEngine<R, S>>, repository: Arc<R>) -> Self {
        Self { sync, repository }
    }

    pub fn set_status(
        &self,
        id: &RegistrationId,
        status: RegistrationStatus,
    ) -> Result<(), ReviewError> {
        let previous = self
            .sync
            .find(id)
            .ok_or(ReviewError::UnknownRecord)?
            .status;

        self.sync.update_local(id, |record| record.status = status);

        if let Err(err) = self.repository.update_status(id, status) {
            warn!(%err, id = %id.0, "status update failed, rolling back");
            self.sync.update_local(id, |record| record.status = previous);
            return Err(ReviewError::Remote(err));
        }

        Ok(())
    }
}
