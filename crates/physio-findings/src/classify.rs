use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::area::AnatomicalArea;
use crate::keywords;

/// Trimmed text shorter than this is treated as not yet examined.
pub const MIN_FINDING_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FindingStatus {
    Clear,
    Abnormal,
    Untested,
}

impl FindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingStatus::Clear => "clear",
            FindingStatus::Abnormal => "abnormal",
            FindingStatus::Untested => "untested",
        }
    }

    /// Combine two findings for the same area: abnormal beats clear beats
    /// untested.
    fn merge(self, other: FindingStatus) -> FindingStatus {
        use FindingStatus::*;
        match (self, other) {
            (Abnormal, _) | (_, Abnormal) => Abnormal,
            (Clear, _) | (_, Clear) => Clear,
            _ => Untested,
        }
    }
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a single form field that maps to an area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldFinding {
    pub field: String,
    pub area: AnatomicalArea,
    pub status: FindingStatus,
    /// Keywords that decided the status (abnormal ones only, when abnormal).
    pub matched: Vec<String>,
}

/// What the next prompt should emphasise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", content = "area", rename_all = "snake_case")]
#[ts(export)]
pub enum PriorityFocus {
    /// The first area with an abnormal finding.
    Area(AnatomicalArea),
    /// Nothing abnormal yet, but some area has not been examined.
    CompleteAssessment,
    /// Every area examined and clear: look further afield.
    NeuralReferredSources,
}

impl PriorityFocus {
    pub fn label(&self) -> &'static str {
        match self {
            PriorityFocus::Area(area) => area.name(),
            PriorityFocus::CompleteAssessment => "complete assessment",
            PriorityFocus::NeuralReferredSources => "neural/referred sources",
        }
    }
}

impl fmt::Display for PriorityFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Aggregate of the per-area findings for one form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnalysisResult {
    /// Exactly one status for every [`AnatomicalArea`].
    pub areas: BTreeMap<AnatomicalArea, FindingStatus>,
    pub abnormal_areas: Vec<AnatomicalArea>,
    pub clear_areas: Vec<AnatomicalArea>,
    pub untested_areas: Vec<AnatomicalArea>,
    pub priority_focus: PriorityFocus,
    /// Area-mapped fields in input order.
    pub fields: Vec<FieldFinding>,
}

impl AnalysisResult {
    pub fn status(&self, area: AnatomicalArea) -> FindingStatus {
        self.areas
            .get(&area)
            .copied()
            .unwrap_or(FindingStatus::Untested)
    }

    pub fn has_abnormal(&self) -> bool {
        !self.abnormal_areas.is_empty()
    }
}

/// Classify one piece of free text, ignoring which area it belongs to.
pub fn classify_text(text: &str) -> FindingStatus {
    classify_with_matches(text).0
}

fn classify_with_matches(text: &str) -> (FindingStatus, Vec<&'static str>) {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_FINDING_LEN {
        return (FindingStatus::Untested, Vec::new());
    }

    let lower = trimmed.to_lowercase();

    let abnormal = keywords::matches(&lower, keywords::ABNORMAL);
    if !abnormal.is_empty() {
        return (FindingStatus::Abnormal, abnormal);
    }

    let clear = keywords::matches(&lower, keywords::CLEAR);
    if !clear.is_empty() {
        return (FindingStatus::Clear, clear);
    }

    (FindingStatus::Untested, Vec::new())
}

/// Classify a named form field. Returns `None` when the field belongs to no
/// anatomical area.
pub fn classify_field(field_name: &str, text: &str) -> Option<FieldFinding> {
    let area = AnatomicalArea::for_field(field_name)?;
    let (status, matched) = classify_with_matches(text);
    Some(FieldFinding {
        field: field_name.to_string(),
        area,
        status,
        matched: matched.into_iter().map(str::to_string).collect(),
    })
}

/// Analyse every field entered so far on a form.
///
/// Fields that map to no area are ignored. Several fields mapping to the
/// same area are merged with abnormal taking precedence.
pub fn analyze<I, K, V>(fields: I) -> AnalysisResult
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut areas: BTreeMap<AnatomicalArea, FindingStatus> = AnatomicalArea::ALL
        .into_iter()
        .map(|area| (area, FindingStatus::Untested))
        .collect();

    let mut findings = Vec::new();
    for (name, text) in fields {
        if let Some(finding) = classify_field(name.as_ref(), text.as_ref()) {
            let slot = areas.entry(finding.area).or_insert(FindingStatus::Untested);
            *slot = slot.merge(finding.status);
            findings.push(finding);
        }
    }

    let with_status = |status: FindingStatus| -> Vec<AnatomicalArea> {
        AnatomicalArea::ALL
            .into_iter()
            .filter(|area| areas[area] == status)
            .collect()
    };
    let abnormal_areas = with_status(FindingStatus::Abnormal);
    let clear_areas = with_status(FindingStatus::Clear);
    let untested_areas = with_status(FindingStatus::Untested);

    let priority_focus = match abnormal_areas.first() {
        Some(area) => PriorityFocus::Area(*area),
        None if !untested_areas.is_empty() => PriorityFocus::CompleteAssessment,
        None => PriorityFocus::NeuralReferredSources,
    };

    AnalysisResult {
        areas,
        abnormal_areas,
        clear_areas,
        untested_areas,
        priority_focus,
        fields: findings,
    }
}
