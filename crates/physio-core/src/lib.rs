//! physio-core
//!
//! Pure domain types and storage key conventions for PhysioNote.
//! No AWS SDK dependency; this is the shared vocabulary of the system.

pub mod error;
pub mod keys;
pub mod models;
