//! Prompt context rendering for the adaptive suggestion prompt.
//!
//! Turns an [`AnalysisResult`] into an XML-style block that is concatenated
//! into the suggestion prompt, so the model knows which areas were already
//! cleared, which are abnormal, and where to focus next.

use crate::area::AnatomicalArea;
use crate::classify::{AnalysisResult, FindingStatus, PriorityFocus};

fn join(areas: &[AnatomicalArea]) -> String {
    areas
        .iter()
        .map(AnatomicalArea::name)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AnalysisResult {
    /// Render the findings block.
    ///
    /// Always lists all four areas; guidance lines only appear for the
    /// status groups that are non-empty.
    pub fn to_prompt_context(&self) -> String {
        let mut block = String::from("<assessment_findings>\n");

        for area in AnatomicalArea::ALL {
            let status = self.status(area);
            block.push_str(&format!("{}: {}", area.name(), status));

            let mut evidence: Vec<&str> = Vec::new();
            for kw in self
                .fields
                .iter()
                .filter(|f| f.area == area && f.status == status && status != FindingStatus::Untested)
                .flat_map(|f| f.matched.iter().map(String::as_str))
            {
                if !evidence.contains(&kw) {
                    evidence.push(kw);
                }
            }
            if !evidence.is_empty() {
                block.push_str(&format!(" ({})", evidence.join(", ")));
            }
            block.push('\n');
        }

        block.push_str(&format!("priority focus: {}\n", self.priority_focus));

        if !self.abnormal_areas.is_empty() {
            block.push_str(&format!(
                "Abnormal findings recorded at: {}. Build the suggestion around these findings.\n",
                join(&self.abnormal_areas)
            ));
        }
        if !self.clear_areas.is_empty() {
            block.push_str(&format!(
                "Already cleared: {}. Do not repeat tests for these areas unless clinically indicated.\n",
                join(&self.clear_areas)
            ));
        }
        if !self.untested_areas.is_empty() {
            block.push_str(&format!(
                "Not yet examined: {}.\n",
                join(&self.untested_areas)
            ));
        }
        match self.priority_focus {
            PriorityFocus::Area(area) => block.push_str(&format!(
                "Prioritise differential reasoning for the {} findings.\n",
                area.name()
            )),
            PriorityFocus::CompleteAssessment => block.push_str(
                "Prioritise tests that complete the examination of the unexamined areas.\n",
            ),
            PriorityFocus::NeuralReferredSources => block.push_str(
                "All areas are clear; consider neural and referred sources of symptoms.\n",
            ),
        }

        block.push_str("</assessment_findings>");
        block
    }
}
