use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::usage::TokenUsage;

/// One auditable call to the text-generation model.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AiTransaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub patient_id: Uuid,
    pub assessment_id: Uuid,
    /// Target form field, for field suggestions.
    #[serde(default)]
    pub field: Option<String>,
    pub model_id: String,
    pub usage: TokenUsage,
    pub status: TransactionStatus,
    /// Priority focus label the classifier fed into the prompt.
    pub priority_focus: String,
    pub requested_by: String,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionKind {
    FieldSuggestion,
    ProvisionalDiagnosis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TransactionStatus {
    Pending,
    Complete,
    Failed,
}
