use std::collections::HashMap;

use physio_findings::{AnatomicalArea, FindingStatus, PriorityFocus, analyze};

#[test]
fn full_pain_free_proximal_joint_is_clear() {
    let fields = HashMap::from([("proximal_joint", "Shoulder ROM full, pain-free, MMT 5/5")]);
    let result = analyze(&fields);

    assert_eq!(result.status(AnatomicalArea::Proximal), FindingStatus::Clear);
    assert_eq!(result.clear_areas, vec![AnatomicalArea::Proximal]);
    assert_eq!(result.priority_focus, PriorityFocus::CompleteAssessment);
}

#[test]
fn tender_positive_special_test_is_abnormal() {
    let fields = HashMap::from([(
        "special_tests",
        "Tenderness over bicipital groove, positive Speed's test",
    )]);
    let result = analyze(&fields);

    assert_eq!(result.status(AnatomicalArea::Local), FindingStatus::Abnormal);
    assert_eq!(result.abnormal_areas, vec![AnatomicalArea::Local]);
    assert_eq!(result.priority_focus, PriorityFocus::Area(AnatomicalArea::Local));
}

#[test]
fn first_abnormal_area_in_declared_order_wins() {
    let result = analyze([
        ("neural_screening", "Reduced C6 dermatome sensation"),
        ("distal_joint", "Wrist extension limited"),
        ("proximal_joint", "Cervical full ROM"),
    ]);

    assert_eq!(
        result.abnormal_areas,
        vec![AnatomicalArea::Distal, AnatomicalArea::Neural]
    );
    assert_eq!(result.priority_focus, PriorityFocus::Area(AnatomicalArea::Distal));
    assert_eq!(result.priority_focus.label(), "distal");
}

#[test]
fn several_fields_in_one_area_merge_with_abnormal_precedence() {
    let result = analyze([
        ("local_observation", "Unremarkable"),
        ("palpation", "Tender over lateral epicondyle"),
        ("special_tests", ""),
    ]);

    assert_eq!(result.status(AnatomicalArea::Local), FindingStatus::Abnormal);
    assert_eq!(result.fields.len(), 3);
    assert_eq!(result.fields[2].status, FindingStatus::Untested);
}

#[test]
fn every_area_clear_focuses_on_referred_sources() {
    let result = analyze([
        ("proximal_joint", "Full ROM"),
        ("distal_joint", "Full ROM"),
        ("local_observation", "NAD"),
        ("neural_screening", "Reflexes intact, myotomes 5/5"),
    ]);

    assert!(result.untested_areas.is_empty());
    assert_eq!(result.priority_focus, PriorityFocus::NeuralReferredSources);
}

#[test]
fn fields_without_an_area_are_ignored() {
    let result = analyze([("patient_goal", "Positive attitude, limited time")]);

    assert!(result.fields.is_empty());
    assert_eq!(result.untested_areas, AnatomicalArea::ALL.to_vec());
}

#[test]
fn result_serializes_with_snake_case_names() {
    let result = analyze([("proximal_joint", "Limited flexion")]);
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["areas"]["proximal"], "abnormal");
    assert_eq!(json["priority_focus"]["kind"], "area");
    assert_eq!(json["priority_focus"]["area"], "proximal");
}
