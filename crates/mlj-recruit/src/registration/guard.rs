//! Pre-submission anti-abuse checks: honeypot, client rate limit, and a
//! duplicate-submission probe against the registration store.
//!
//! The checks run in a fixed order (honeypot, rate limit, duplicate) and
//! short-circuit on the first failure. The duplicate probe fails OPEN on
//! store errors so an outage never blocks legitimate applicants; the admin
//! auth gate is deliberately the opposite.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use super::domain::RegistrationDraft;
use super::repository::RegistrationRepository;
use crate::storage::StoragePort;

/// Storage slot holding the submission history for this client.
pub const SUBMISSION_HISTORY_KEY: &str = "menlabojob_submission_history";

/// How many submissions are allowed inside the rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window_minutes: i64,
    pub max_submissions: usize,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            window_minutes: 7,
            max_submissions: 2,
        }
    }
}

/// Outcome of a rate-limit check. `remaining_minutes` is the ceiling of the
/// time until the oldest in-window submission expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitVerdict {
    pub allowed: bool,
    pub remaining_minutes: Option<i64>,
    pub current_count: usize,
}

/// Hidden-field check: legitimate users never fill the honeypot.
pub fn validate_honeypot(value: &str) -> bool {
    value.trim().is_empty()
}

/// Rolling-window submission limiter backed by the storage port. Entries
/// older than the window are pruned on every read and before every write.
pub struct RateLimiter<S> {
    storage: Arc<S>,
    policy: RateLimitPolicy,
}

impl<S: StoragePort> RateLimiter<S> {
    pub fn new(storage: Arc<S>, policy: RateLimitPolicy) -> Self {
        Self { storage, policy }
    }

    pub fn check(&self, now: DateTime<Utc>) -> RateLimitVerdict {
        let recent = self.recent_submissions(now);

        if recent.len() >= self.policy.max_submissions {
            let oldest = recent.iter().copied().min().unwrap_or_else(|| now.timestamp_millis());
            let remaining_ms = self.window().num_milliseconds() - (now.timestamp_millis() - oldest);
            let remaining_minutes = (remaining_ms + 59_999) / 60_000;
            return RateLimitVerdict {
                allowed: false,
                remaining_minutes: Some(remaining_minutes.max(1)),
                current_count: recent.len(),
            };
        }

        RateLimitVerdict {
            allowed: true,
            remaining_minutes: None,
            current_count: recent.len(),
        }
    }

    /// Record a successful submission: prune, append, persist.
    pub fn record(&self, now: DateTime<Utc>) {
        let mut recent = self.recent_submissions(now);
        recent.push(now.timestamp_millis());
        match serde_json::to_string(&recent) {
            Ok(serialized) => self.storage.set(SUBMISSION_HISTORY_KEY, &serialized),
            Err(err) => warn!(%err, "failed to serialize submission history"),
        }
    }

    pub fn clear(&self) {
        self.storage.remove(SUBMISSION_HISTORY_KEY);
    }

    fn window(&self) -> Duration {
        Duration::minutes(self.policy.window_minutes)
    }

    /// History entries still inside the window. Corrupt history is treated
    /// as empty so a bad slot never locks a client out.
    fn recent_submissions(&self, now: DateTime<Utc>) -> Vec<i64> {
        let Some(raw) = self.storage.get(SUBMISSION_HISTORY_KEY) else {
            return Vec::new();
        };

        let history: Vec<i64> = match serde_json::from_str(&raw) {
            Ok(history) => history,
            Err(err) => {
                warn!(%err, "corrupt submission history, treating as empty");
                return Vec::new();
            }
        };

        let cutoff = now.timestamp_millis() - self.window().num_milliseconds();
        history.into_iter().filter(|ts| *ts > cutoff).collect()
    }
}

/// Distinct rejection per guard. The honeypot message stays generic so the
/// detection mechanism is not revealed to the sender.
#[derive(Debug, thiserror::Error)]
pub enum GuardRejection {
    #[error("不正な送信が検知されました。")]
    Honeypot,
    #[error("送信回数の上限に達しました。あと{minutes}分後に再度お試しください。")]
    RateLimited { minutes: i64 },
    #[error("同じメールアドレスと電話番号での登録が既に処理中です。しばらくお待ちください。")]
    Duplicate,
}

/// Composes the three checks in order, short-circuiting on failure.
pub struct SubmissionGuard<R, S> {
    repository: Arc<R>,
    limiter: RateLimiter<S>,
}

impl<R, S> SubmissionGuard<R, S>
where
    R: RegistrationRepository,
    S: StoragePort,
{
    pub fn new(repository: Arc<R>, storage: Arc<S>, policy: RateLimitPolicy) -> Self {
        Self {
            repository,
            limiter: RateLimiter::new(storage, policy),
        }
    }

    pub fn limiter(&self) -> &RateLimiter<S> {
        &self.limiter
    }

    pub fn check(
        &self,
        draft: &RegistrationDraft,
        now: DateTime<Utc>,
    ) -> Result<(), GuardRejection> {
        if !validate_honeypot(&draft.website) {
            return Err(GuardRejection::Honeypot);
        }

        let verdict = self.limiter.check(now);
        if !verdict.allowed {
            return Err(GuardRejection::RateLimited {
                minutes: verdict.remaining_minutes.unwrap_or(1),
            });
        }

        // Duplicate probe fails open: an unreachable store must not block
        // legitimate applicants. Matches only pending records, so a handled
        // registration does not prevent re-applying.
        match self
            .repository
            .has_pending_contact(&draft.email, &draft.phone_number)
        {
            Ok(true) => Err(GuardRejection::Duplicate),
            Ok(false) => Ok(()),
            Err(err) => {
                warn!(%err, "duplicate check unavailable, allowing submission");
                Ok(())
            }
        }
    }
}
