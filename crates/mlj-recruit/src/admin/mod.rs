//! Admin review console: auth gate, incremental record sync, the filter/
//! sort/status-review table, and CSV export.

pub mod auth;
pub mod export;
pub mod review;
pub mod router;
pub mod sync;

#[cfg(test)]
mod tests;

pub use auth::{AccessDecision, AuthError, AuthGate, Identity, IdentityProvider, Role, UserProfile};
pub use export::{export_csv, export_filename, CSV_HEADERS};
pub use review::{ReviewError, ReviewFilter, ReviewService, ReviewSort, ReviewTable, SortField, SortOrder};
pub use router::{admin_router, AdminContext};
pub use sync::{merge, SyncEngine, LAST_FETCH_KEY};
