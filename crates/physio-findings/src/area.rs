use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Text-matching bucket for examination findings.
///
/// Declaration order is significant: it is the order areas are reported in
/// and the order used to pick the first abnormal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AnatomicalArea {
    Proximal,
    Distal,
    Local,
    Neural,
}

impl AnatomicalArea {
    pub const ALL: [AnatomicalArea; 4] = [
        AnatomicalArea::Proximal,
        AnatomicalArea::Distal,
        AnatomicalArea::Local,
        AnatomicalArea::Neural,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AnatomicalArea::Proximal => "proximal",
            AnatomicalArea::Distal => "distal",
            AnatomicalArea::Local => "local",
            AnatomicalArea::Neural => "neural",
        }
    }

    /// Standard form fields that belong to this area without carrying its
    /// name.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            AnatomicalArea::Proximal => &[],
            AnatomicalArea::Distal => &[],
            AnatomicalArea::Local => &["special_test", "palpation"],
            AnatomicalArea::Neural => &["neuro", "dermatome", "myotome", "reflex", "slump", "ulnt"],
        }
    }

    /// Map a form field name to its area.
    ///
    /// The area name itself is tried first across all areas, then aliases.
    /// Within each pass the first area in declaration order wins.
    pub fn for_field(field_name: &str) -> Option<AnatomicalArea> {
        let name = field_name.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|area| name.contains(area.name()))
            .or_else(|| {
                Self::ALL
                    .into_iter()
                    .find(|area| area.aliases().iter().any(|alias| name.contains(alias)))
            })
    }
}

impl fmt::Display for AnatomicalArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_name_in_field_name() {
        assert_eq!(AnatomicalArea::for_field("proximal_joint"), Some(AnatomicalArea::Proximal));
        assert_eq!(AnatomicalArea::for_field("Distal_Joint"), Some(AnatomicalArea::Distal));
        assert_eq!(AnatomicalArea::for_field("local_observation"), Some(AnatomicalArea::Local));
        assert_eq!(AnatomicalArea::for_field("neural_screening"), Some(AnatomicalArea::Neural));
    }

    #[test]
    fn aliases_cover_standard_fields() {
        assert_eq!(AnatomicalArea::for_field("special_tests"), Some(AnatomicalArea::Local));
        assert_eq!(AnatomicalArea::for_field("palpation"), Some(AnatomicalArea::Local));
        assert_eq!(
            AnatomicalArea::for_field("neuro_dynamic_examination"),
            Some(AnatomicalArea::Neural)
        );
    }

    #[test]
    fn area_name_beats_alias() {
        // Contains both "proximal" and the neural alias "reflex".
        assert_eq!(
            AnatomicalArea::for_field("proximal_reflexes"),
            Some(AnatomicalArea::Proximal)
        );
    }

    #[test]
    fn unrelated_fields_have_no_area() {
        assert_eq!(AnatomicalArea::for_field("patient_goal"), None);
        assert_eq!(AnatomicalArea::for_field("locus_of_control"), None);
        assert_eq!(AnatomicalArea::for_field(""), None);
    }
}
