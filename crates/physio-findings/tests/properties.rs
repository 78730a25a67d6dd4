use physio_findings::keywords::{ABNORMAL, CLEAR};
use physio_findings::{
    AnatomicalArea, FindingStatus, MIN_FINDING_LEN, PriorityFocus, analyze, classify_text,
};
use proptest::prelude::*;

fn field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("proximal_joint".to_string()),
        Just("distal_joint".to_string()),
        Just("local_observation".to_string()),
        Just("special_tests".to_string()),
        Just("neural_screening".to_string()),
        Just("patient_goal".to_string()),
        "[a-z_]{0,16}",
    ]
}

fn field_text() -> impl Strategy<Value = String> {
    prop_oneof![
        ".{0,40}",
        prop::sample::select(CLEAR).prop_map(str::to_string),
        prop::sample::select(ABNORMAL).prop_map(str::to_string),
    ]
}

proptest! {
    #[test]
    fn every_area_gets_exactly_one_status(
        fields in prop::collection::vec((field_name(), field_text()), 0..8)
    ) {
        let result = analyze(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        prop_assert_eq!(result.areas.len(), AnatomicalArea::ALL.len());
        for area in AnatomicalArea::ALL {
            let in_groups = [
                result.abnormal_areas.contains(&area),
                result.clear_areas.contains(&area),
                result.untested_areas.contains(&area),
            ]
            .iter()
            .filter(|b| **b)
            .count();
            prop_assert_eq!(in_groups, 1);
        }
    }

    #[test]
    fn clear_and_abnormal_together_is_abnormal(
        prefix in "[a-z ]{0,10}",
        clear in prop::sample::select(CLEAR),
        abnormal in prop::sample::select(ABNORMAL),
        clear_first in any::<bool>(),
    ) {
        let text = if clear_first {
            format!("{prefix} {clear} {abnormal}")
        } else {
            format!("{prefix} {abnormal} {clear}")
        };
        prop_assert_eq!(classify_text(&text), FindingStatus::Abnormal);
    }

    #[test]
    fn short_text_is_always_untested(text in "\\s{0,4}.{0,2}\\s{0,4}") {
        prop_assume!(text.trim().chars().count() < MIN_FINDING_LEN);
        prop_assert_eq!(classify_text(&text), FindingStatus::Untested);
    }

    #[test]
    fn any_abnormal_area_sets_focus_to_first_one(
        fields in prop::collection::vec((field_name(), field_text()), 0..8)
    ) {
        let result = analyze(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        match result.abnormal_areas.first() {
            Some(first) => prop_assert_eq!(result.priority_focus, PriorityFocus::Area(*first)),
            None if !result.untested_areas.is_empty() => {
                prop_assert_eq!(result.priority_focus, PriorityFocus::CompleteAssessment)
            }
            None => prop_assert_eq!(result.priority_focus, PriorityFocus::NeuralReferredSources),
        }
    }

    #[test]
    fn analysis_is_deterministic(
        fields in prop::collection::vec((field_name(), field_text()), 0..8)
    ) {
        let a = analyze(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let b = analyze(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        prop_assert_eq!(a, b);
    }
}
