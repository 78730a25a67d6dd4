use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// A patient record. Everything here is PHI.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
    pub age_sex: String,
    pub contact: Option<String>,
    pub referred_by: Option<String>,
    pub present_history: String,
    pub past_history: String,
    /// Auth subject of the therapist who created the record.
    pub created_by: String,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

/// Intake form submitted when a patient is first registered or edited.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientIntake {
    pub name: String,
    pub age_sex: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub referred_by: Option<String>,
    #[serde(default)]
    pub present_history: String,
    #[serde(default)]
    pub past_history: String,
}

impl PatientIntake {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::MissingField("name".to_string()));
        }
        if self.age_sex.trim().is_empty() {
            return Err(CoreError::MissingField("age_sex".to_string()));
        }
        Ok(())
    }

    pub fn into_patient(self, created_by: &str, now: jiff::Timestamp) -> Result<Patient, CoreError> {
        self.validate()?;
        Ok(Patient {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            age_sex: self.age_sex.trim().to_string(),
            contact: self.contact,
            referred_by: self.referred_by,
            present_history: self.present_history,
            past_history: self.past_history,
            created_by: created_by.to_string(),
            created_at: now,
            updated_at: now,
        })
    }
}

impl Patient {
    /// Apply an edited intake form, keeping identity and ownership.
    pub fn apply_intake(&mut self, intake: PatientIntake, now: jiff::Timestamp) -> Result<(), CoreError> {
        intake.validate()?;
        self.name = intake.name.trim().to_string();
        self.age_sex = intake.age_sex.trim().to_string();
        self.contact = intake.contact;
        self.referred_by = intake.referred_by;
        self.present_history = intake.present_history;
        self.past_history = intake.past_history;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intake(name: &str) -> PatientIntake {
        PatientIntake {
            name: name.to_string(),
            age_sex: "42/F".to_string(),
            contact: None,
            referred_by: Some("GP".to_string()),
            present_history: "Right shoulder pain for 6 weeks".to_string(),
            past_history: String::new(),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = intake("   ").into_patient("therapist-1", jiff::Timestamp::now());
        assert!(matches!(err, Err(CoreError::MissingField(f)) if f == "name"));
    }

    #[test]
    fn apply_intake_keeps_owner_and_id() {
        let created = jiff::Timestamp::now();
        let mut patient = intake("Jane Doe").into_patient("therapist-1", created).unwrap();
        let id = patient.id;

        patient.apply_intake(intake(" Jane Smith "), jiff::Timestamp::now()).unwrap();

        assert_eq!(patient.id, id);
        assert_eq!(patient.created_by, "therapist-1");
        assert_eq!(patient.name, "Jane Smith");
        assert_eq!(patient.created_at, created);
    }
}
