//! Prompt assembly for clinical field suggestions.
//!
//! The patient's name and contact details are never included: only age/sex,
//! histories, and the clinical fields entered so far.

use std::collections::BTreeMap;

use physio_core::models::assessment::{AssessmentForm, AssessmentStep};
use physio_core::models::patient::Patient;
use physio_findings::{AnalysisResult, AnatomicalArea, analyze};

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are assisting a registered physiotherapist who is documenting a patient \
assessment. Suggest concise, clinically appropriate text for the requested \
form field, written in the clinician's voice using standard physiotherapy \
terminology. Base the suggestion only on the information provided. Do not \
invent test results or measurements; where a finding is unknown, suggest \
what should be assessed instead. Return only the suggested field text, with \
no preamble, headings or disclaimers.";

/// System prompt and user message for one model call.
#[derive(Debug, Clone)]
pub struct SuggestionPrompt {
    pub system: String,
    pub user: String,
    /// Findings computed from the form; recorded even when not injected.
    pub analysis: AnalysisResult,
}

/// What the clinician asked a suggestion for.
#[derive(Debug, Clone, Copy)]
pub struct FieldTarget<'a> {
    pub step: AssessmentStep,
    pub field: &'a str,
}

/// Steps where earlier examination findings should steer the suggestion.
pub fn uses_findings(step: AssessmentStep) -> bool {
    matches!(
        step,
        AssessmentStep::InitialPlan
            | AssessmentStep::ObjectiveAssessment
            | AssessmentStep::ProvisionalDiagnosis
            | AssessmentStep::SmartGoals
            | AssessmentStep::TreatmentPlan
    )
}

/// Field-specific instructions; unknown fields get a generic line.
pub fn field_guidance(field: &str) -> String {
    let text = match field {
        "body_structure" => "Describe the impaired body structures (anatomy) implicated by the history.",
        "body_function" => "Describe impaired body functions such as pain, range, strength or endurance.",
        "activity_performance" | "activity_capacity" => {
            "Describe the activities affected and how the patient currently manages them."
        }
        "participation_performance" | "participation_capacity" => {
            "Describe how work, sport, family or social roles are affected."
        }
        "contextual_environmental" => "List environmental factors that help or hinder recovery.",
        "contextual_personal" => "List personal factors (age, coping, beliefs, lifestyle) relevant to recovery.",
        "active_movements" | "passive_movements" | "passive_over_pressure" | "resisted_movements"
        | "combined_movements" => {
            "State which movements to test and what to look for (range, pain, quality, end-feel)."
        }
        "special_tests" => "Name the special tests indicated and the expected positive finding for each.",
        "neuro_dynamic_examination" | "neural_screening" => {
            "Suggest neurodynamic and neurological screening (dermatomes, myotomes, reflexes, ULNT/SLR/slump) as indicated."
        }
        "proximal_joint" => "Suggest the proximal joint screen (range, overpressure, symptom reproduction).",
        "distal_joint" => "Suggest the distal joint screen (range, overpressure, symptom reproduction).",
        "local_observation" => "Describe posture, swelling, wasting, deformity or skin changes to observe locally.",
        "palpation" => "Suggest the structures to palpate and what findings to note.",
        "pain_type" | "pain_nature" => "Classify the pain mechanism (nociceptive, neuropathic, nociplastic) with brief reasoning.",
        "pain_severity" | "pain_irritability" => "Summarise severity and irritability and what they imply for examination vigour.",
        "tissue_healing_stage" => "State the likely tissue healing stage given onset and behaviour.",
        "red_flag" => "List any red flags to screen for given this presentation, or state none identified.",
        "yellow_flag" | "orange_flag" | "blue_flag" | "black_flag" => {
            "List psychosocial, workplace or system factors to screen for in this category."
        }
        "structure_fault" | "hypothesis_supported" => {
            "State the most likely structural source of symptoms with the supporting findings."
        }
        "findings_support" => "List the findings that support the working hypothesis.",
        "findings_reject" => "List the findings that argue against the working hypothesis.",
        "patient_goal" | "measurable_outcome" | "time_duration" | "baseline_status" => {
            "Write a SMART goal element: specific, measurable, achievable, relevant and time-bound."
        }
        "treatment_plan" => "Outline an evidence-based treatment plan with progression criteria.",
        "reasoning" => "Give the clinical reasoning linking findings to the chosen treatment.",
        _ => "",
    };

    if text.is_empty() {
        format!(
            "Write concise clinical text for the \"{}\" field.",
            humanize(field)
        )
    } else {
        text.to_string()
    }
}

fn humanize(field: &str) -> String {
    field.replace('_', " ")
}

fn patient_block(patient: &Patient) -> String {
    let mut block = String::from("<patient>\n");
    block.push_str(&format!("age/sex: {}\n", patient.age_sex));
    if !patient.present_history.trim().is_empty() {
        block.push_str(&format!("present history: {}\n", patient.present_history.trim()));
    }
    if !patient.past_history.trim().is_empty() {
        block.push_str(&format!("past history: {}\n", patient.past_history.trim()));
    }
    block.push_str("</patient>");
    block
}

/// Render the entered fields grouped by step, skipping `exclude` (the
/// field being suggested, so the model does not just echo a draft).
fn form_block(
    steps: &BTreeMap<AssessmentStep, BTreeMap<String, String>>,
    exclude: Option<FieldTarget<'_>>,
) -> String {
    let mut block = String::from("<form_so_far>\n");
    for (step, fields) in steps {
        let entries: Vec<(&String, &str)> = fields
            .iter()
            .map(|(name, value)| (name, value.trim()))
            .filter(|(name, value)| {
                !value.is_empty()
                    && !exclude.is_some_and(|t| t.step == *step && t.field == name.as_str())
            })
            .collect();
        if entries.is_empty() {
            continue;
        }
        block.push_str(&format!("[{}]\n", step.title()));
        for (name, value) in entries {
            block.push_str(&format!("- {}: {}\n", humanize(name), value));
        }
    }
    block.push_str("</form_so_far>");
    block
}

/// Build the prompt for a single field suggestion.
///
/// On examination and later steps, or when the target field itself maps to
/// an anatomical area, the findings block is appended so the model builds
/// on abnormal areas and skips areas already cleared.
pub fn build_field_prompt(
    system_prompt: &str,
    patient: &Patient,
    form: &AssessmentForm,
    target: FieldTarget<'_>,
) -> SuggestionPrompt {
    let analysis = analyze(form.finding_fields());

    let mut user = String::new();
    user.push_str(&patient_block(patient));
    user.push_str("\n\n");
    user.push_str(&form_block(&form.steps, Some(target)));
    user.push_str("\n\n");

    if uses_findings(target.step) || AnatomicalArea::for_field(target.field).is_some() {
        user.push_str(&analysis.to_prompt_context());
        user.push_str("\n\n");
    }

    user.push_str(&format!(
        "Suggest text for the \"{}\" field on the {} page. {}",
        humanize(target.field),
        target.step.title(),
        field_guidance(target.field)
    ));

    SuggestionPrompt {
        system: system_prompt.to_string(),
        user,
        analysis,
    }
}

/// Build the prompt for a provisional diagnosis over the whole form.
pub fn build_diagnosis_prompt(
    system_prompt: &str,
    patient: &Patient,
    form: &AssessmentForm,
) -> SuggestionPrompt {
    let analysis = analyze(form.finding_fields());

    let mut user = String::new();
    user.push_str(&patient_block(patient));
    user.push_str("\n\n");
    user.push_str(&form_block(&form.steps, None));
    user.push_str("\n\n");
    user.push_str(&analysis.to_prompt_context());
    user.push_str("\n\n");
    user.push_str(
        "Suggest a provisional diagnosis: the most likely structure at fault, \
         the findings that support and reject it, and up to two differential \
         diagnoses worth excluding.",
    );

    SuggestionPrompt {
        system: system_prompt.to_string(),
        user,
        analysis,
    }
}
