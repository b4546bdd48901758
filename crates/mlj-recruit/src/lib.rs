//! Registration intake and admin review engine for the MenLaboJob recruiting site.
//!
//! The crate is split along the two cooperating subsystems: [`registration`]
//! covers the multi-step form, field validation, anti-abuse guards, and the
//! submission executor; [`admin`] covers the authenticated review console
//! (auth gate, incremental sync, filtering/sorting, CSV export). Persistence
//! and identity are trait ports so the service binary and the tests can bind
//! their own adapters.

pub mod admin;
pub mod config;
pub mod error;
pub mod registration;
pub mod storage;
pub mod telemetry;
