//! Document key conventions.
//!
//! Pure string functions. These define the canonical layout of JSON
//! documents in the PhysioNote bucket.

use uuid::Uuid;

pub const PATIENTS_PREFIX: &str = "patients/";

/// Everything stored for one patient, including assessments.
pub fn patient_prefix(id: Uuid) -> String {
    format!("patients/{id}/")
}

pub fn patient(id: Uuid) -> String {
    format!("patients/{id}/patient.json")
}

/// True for keys produced by [`patient`]; assessments share the prefix.
pub fn is_patient_key(key: &str) -> bool {
    key.starts_with(PATIENTS_PREFIX) && key.ends_with("/patient.json")
}

pub fn assessments_prefix(patient_id: Uuid) -> String {
    format!("patients/{patient_id}/assessments/")
}

pub fn assessment(patient_id: Uuid, id: Uuid) -> String {
    format!("patients/{patient_id}/assessments/{id}.json")
}

pub fn is_assessment_key(key: &str) -> bool {
    key.starts_with(PATIENTS_PREFIX) && key.contains("/assessments/") && key.ends_with(".json")
}

pub const USERS_PREFIX: &str = "users/";

pub fn user(sub: &str) -> String {
    format!("users/{sub}.json")
}

pub const TRANSACTIONS_PREFIX: &str = "ai-transactions/";

pub fn transaction(id: Uuid) -> String {
    format!("ai-transactions/{id}.json")
}

/// Optional operator-supplied system prompt that replaces the built-in one.
pub const SYSTEM_PROMPT: &str = "system-prompt.md";
