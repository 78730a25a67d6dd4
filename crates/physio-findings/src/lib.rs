//! physio-findings
//!
//! Intra-form finding classification. Pure string heuristics with no AWS
//! dependency. Scans the clinical fields already entered on an assessment
//! form, tags each anatomical area clear, abnormal or untested, and picks a
//! priority focus that steers the next suggestion prompt.

pub mod area;
pub mod classify;
pub mod context;
pub mod keywords;

pub use area::AnatomicalArea;
pub use classify::{
    AnalysisResult, FieldFinding, FindingStatus, MIN_FINDING_LEN, PriorityFocus, analyze,
    classify_field, classify_text,
};
