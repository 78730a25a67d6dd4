use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// One page of the multi-step assessment form, in the order the clinician
/// fills them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AssessmentStep {
    Subjective,
    PatientPerspectives,
    InitialPlan,
    Pathophysiology,
    ChronicDisease,
    ClinicalFlags,
    ObjectiveAssessment,
    ProvisionalDiagnosis,
    SmartGoals,
    TreatmentPlan,
}

impl AssessmentStep {
    pub const ALL: [AssessmentStep; 10] = [
        AssessmentStep::Subjective,
        AssessmentStep::PatientPerspectives,
        AssessmentStep::InitialPlan,
        AssessmentStep::Pathophysiology,
        AssessmentStep::ChronicDisease,
        AssessmentStep::ClinicalFlags,
        AssessmentStep::ObjectiveAssessment,
        AssessmentStep::ProvisionalDiagnosis,
        AssessmentStep::SmartGoals,
        AssessmentStep::TreatmentPlan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStep::Subjective => "subjective",
            AssessmentStep::PatientPerspectives => "patient_perspectives",
            AssessmentStep::InitialPlan => "initial_plan",
            AssessmentStep::Pathophysiology => "pathophysiology",
            AssessmentStep::ChronicDisease => "chronic_disease",
            AssessmentStep::ClinicalFlags => "clinical_flags",
            AssessmentStep::ObjectiveAssessment => "objective_assessment",
            AssessmentStep::ProvisionalDiagnosis => "provisional_diagnosis",
            AssessmentStep::SmartGoals => "smart_goals",
            AssessmentStep::TreatmentPlan => "treatment_plan",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AssessmentStep::Subjective => "Subjective Examination",
            AssessmentStep::PatientPerspectives => "Patient Perspectives",
            AssessmentStep::InitialPlan => "Initial Plan of Assessment",
            AssessmentStep::Pathophysiology => "Pathophysiological Mechanism",
            AssessmentStep::ChronicDisease => "Chronic Disease Factors",
            AssessmentStep::ClinicalFlags => "Clinical Flags",
            AssessmentStep::ObjectiveAssessment => "Objective Assessment",
            AssessmentStep::ProvisionalDiagnosis => "Provisional Diagnosis",
            AssessmentStep::SmartGoals => "SMART Goals",
            AssessmentStep::TreatmentPlan => "Treatment Plan",
        }
    }

    /// The standard fields rendered on this step's form.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            AssessmentStep::Subjective => &[
                "body_structure",
                "body_function",
                "activity_performance",
                "activity_capacity",
                "participation_performance",
                "participation_capacity",
                "contextual_environmental",
                "contextual_personal",
            ],
            AssessmentStep::PatientPerspectives => &[
                "knowledge",
                "attribution",
                "illness_duration",
                "consequences_awareness",
                "locus_of_control",
                "affective_aspect",
            ],
            AssessmentStep::InitialPlan => &[
                "active_movements",
                "passive_movements",
                "passive_over_pressure",
                "resisted_movements",
                "combined_movements",
                "special_tests",
                "neuro_dynamic_examination",
            ],
            AssessmentStep::Pathophysiology => &[
                "area_involved",
                "presenting_symptom",
                "pain_type",
                "pain_nature",
                "pain_severity",
                "pain_irritability",
                "symptom_source",
                "tissue_healing_stage",
            ],
            AssessmentStep::ChronicDisease => &["maintenance_causes", "specific_factors"],
            AssessmentStep::ClinicalFlags => &[
                "red_flag",
                "orange_flag",
                "yellow_flag",
                "black_flag",
                "blue_flag",
            ],
            AssessmentStep::ObjectiveAssessment => &[
                "proximal_joint",
                "distal_joint",
                "local_observation",
                "palpation",
                "special_tests",
                "neural_screening",
                "plan_details",
            ],
            AssessmentStep::ProvisionalDiagnosis => &[
                "likelihood",
                "structure_fault",
                "symptom",
                "findings_support",
                "findings_reject",
                "hypothesis_supported",
            ],
            AssessmentStep::SmartGoals => &[
                "patient_goal",
                "baseline_status",
                "measurable_outcome",
                "time_duration",
            ],
            AssessmentStep::TreatmentPlan => &[
                "treatment_plan",
                "goal_targeted",
                "reasoning",
                "reference",
            ],
        }
    }

    /// Steps whose fields hold examination results rather than plans.
    pub fn records_findings(&self) -> bool {
        matches!(self, AssessmentStep::ObjectiveAssessment)
    }
}

impl fmt::Display for AssessmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentStep {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssessmentStep::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| CoreError::UnknownStep(s.to_string()))
    }
}

/// A patient's assessment, filled in one step at a time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AssessmentForm {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub created_by: String,
    /// Field values per step: `step → field name → free text`.
    #[serde(default)]
    pub steps: BTreeMap<AssessmentStep, BTreeMap<String, String>>,
    #[serde(default)]
    pub completed: BTreeSet<AssessmentStep>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl AssessmentForm {
    pub fn new(patient_id: Uuid, created_by: &str, now: jiff::Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            created_by: created_by.to_string(),
            steps: BTreeMap::new(),
            completed: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace one step's fields and mark it complete.
    pub fn save_step(
        &mut self,
        step: AssessmentStep,
        fields: BTreeMap<String, String>,
        now: jiff::Timestamp,
    ) {
        self.steps.insert(step, fields);
        self.completed.insert(step);
        self.updated_at = now;
    }

    /// Overlay unsaved values from the page being edited, without marking
    /// the step complete. Empty values do not erase stored ones.
    pub fn overlay_step(&mut self, step: AssessmentStep, fields: &BTreeMap<String, String>) {
        let stored = self.steps.entry(step).or_default();
        for (name, value) in fields {
            if !value.trim().is_empty() {
                stored.insert(name.clone(), value.clone());
            }
        }
    }

    /// First step in form order that has not been completed yet.
    pub fn next_step(&self) -> Option<AssessmentStep> {
        AssessmentStep::ALL
            .into_iter()
            .find(|step| !self.completed.contains(step))
    }

    /// Field values the classifier treats as examination findings.
    ///
    /// Only steps that record results contribute; planning pages such as
    /// [`AssessmentStep::InitialPlan`] name tests still to be done. A field
    /// name repeated across finding steps gets its non-empty values joined
    /// with a newline, earlier steps first.
    pub fn finding_fields(&self) -> BTreeMap<String, String> {
        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        let finding_steps = self
            .steps
            .iter()
            .filter(|(step, _)| step.records_findings());
        for (_, fields) in finding_steps {
            for (name, value) in fields {
                let value = value.trim();
                if value.is_empty() {
                    continue;
                }
                merged
                    .entry(name.clone())
                    .and_modify(|existing| {
                        existing.push('\n');
                        existing.push_str(value);
                    })
                    .or_insert_with(|| value.to_string());
            }
        }
        merged
    }
}
