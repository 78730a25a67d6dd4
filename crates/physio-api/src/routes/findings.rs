use std::collections::BTreeMap;

use axum::Json;

use physio_findings::{AnalysisResult, analyze};

/// Classify a field map without calling the model. The client uses this to
/// show which areas are cleared while the therapist types.
pub async fn analyze_findings(Json(fields): Json<BTreeMap<String, String>>) -> Json<AnalysisResult> {
    Json(analyze(&fields))
}
