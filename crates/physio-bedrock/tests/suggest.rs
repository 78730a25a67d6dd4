use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use physio_bedrock::error::BedrockError;
use physio_bedrock::generator::{Generation, GenerationParams, TextGenerator};
use physio_bedrock::prompt::{DEFAULT_SYSTEM_PROMPT, FieldTarget, build_field_prompt};
use physio_bedrock::suggest::generate;
use physio_core::models::assessment::{AssessmentForm, AssessmentStep};
use physio_core::models::patient::Patient;
use physio_core::models::transaction::{TransactionKind, TransactionStatus};
use physio_core::models::usage::TokenCount;
use physio_findings::{AnatomicalArea, PriorityFocus};

/// Replies with a fixed text and remembers the last user message.
struct CannedGenerator {
    reply: String,
    seen: Mutex<Option<String>>,
}

impl CannedGenerator {
    fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            seen: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(
        &self,
        _model_id: &str,
        _system_prompt: &str,
        user_message: &str,
        _params: GenerationParams,
    ) -> Result<Generation, BedrockError> {
        *self.seen.lock().unwrap() = Some(user_message.to_string());
        Ok(Generation {
            text: self.reply.clone(),
            tokens: TokenCount {
                input: 1_000,
                output: 200,
            },
        })
    }
}

fn patient() -> Patient {
    let now = jiff::Timestamp::UNIX_EPOCH;
    Patient {
        id: Uuid::new_v4(),
        name: "John Roe".to_string(),
        age_sex: "60/M".to_string(),
        contact: None,
        referred_by: None,
        present_history: "Neck pain radiating to the right arm".to_string(),
        past_history: "Type 2 diabetes".to_string(),
        created_by: "t1".to_string(),
        created_at: now,
        updated_at: now,
    }
}

fn objective_form() -> AssessmentForm {
    let mut form = AssessmentForm::new(Uuid::new_v4(), "t1", jiff::Timestamp::UNIX_EPOCH);
    let step = form.steps.entry(AssessmentStep::ObjectiveAssessment).or_default();
    step.insert("proximal_joint".into(), "Cervical rotation limited R, reproduces arm pain".into());
    step.insert("distal_joint".into(), "Elbow and wrist full ROM".into());
    form
}

#[tokio::test]
async fn suggestion_carries_priced_usage_and_focus() {
    let generator = CannedGenerator::new("  Spurling's test, ULNT1 median bias  \n");
    let prompt = build_field_prompt(
        DEFAULT_SYSTEM_PROMPT,
        &patient(),
        &objective_form(),
        FieldTarget {
            step: AssessmentStep::ObjectiveAssessment,
            field: "neural_screening",
        },
    );

    let result = generate(
        &generator,
        "us.anthropic.claude-sonnet-4-20250514-v1:0",
        TransactionKind::FieldSuggestion,
        prompt,
        GenerationParams::default(),
    )
    .await
    .unwrap();

    assert_eq!(result.text, "Spurling's test, ULNT1 median bias");
    assert_eq!(result.status, TransactionStatus::Complete);
    assert!((result.usage.cost_usd - 0.006).abs() < 1e-12);
    assert_eq!(
        result.analysis.priority_focus,
        PriorityFocus::Area(AnatomicalArea::Proximal)
    );

    let seen = generator.seen.lock().unwrap().clone().unwrap();
    assert!(seen.contains("proximal: abnormal"));
    assert!(seen.contains("distal: clear"));
    assert!(!seen.contains("John Roe"));
}

#[tokio::test]
async fn blank_reply_is_an_error() {
    let generator = CannedGenerator::new("   ");
    let prompt = build_field_prompt(
        DEFAULT_SYSTEM_PROMPT,
        &patient(),
        &objective_form(),
        FieldTarget {
            step: AssessmentStep::TreatmentPlan,
            field: "treatment_plan",
        },
    );

    let err = generate(
        &generator,
        "us.anthropic.claude-sonnet-4-20250514-v1:0",
        TransactionKind::FieldSuggestion,
        prompt,
        GenerationParams::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, BedrockError::EmptyResponse));
}
