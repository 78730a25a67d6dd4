//! Fixed keyword lists for finding classification.
//!
//! A keyword matches lowercased text when it does not start in the middle of
//! a word, so "nad" ignores "canada" and "limited" ignores "unlimited". Short
//! keywords and scores such as "4/5" must also end at a word boundary. There
//! is no negation handling: "no tenderness" matches `tender`. Bare "pain" is
//! deliberately absent from the abnormal list so that "pain-free" and
//! "no pain" do not register as abnormal.

/// Indicators that a test or examination was normal.
pub const CLEAR: &[&str] = &[
    "full rom",
    "full range",
    "full arom",
    "full prom",
    "pain-free",
    "pain free",
    "painfree",
    "negative",
    "-ve",
    "5/5",
    "wnl",
    "within normal limits",
    "normal",
    "nad",
    "intact",
    "symmetrical",
    "unremarkable",
];

/// Indicators of an abnormal finding. These take precedence over [`CLEAR`].
pub const ABNORMAL: &[&str] = &[
    "limited",
    "restricted",
    "reduced",
    "decreased",
    "diminished",
    "positive",
    "+ve",
    "tender",
    "weak",
    "painful",
    "pain on",
    "reproduce",
    "swelling",
    "swollen",
    "effusion",
    "spasm",
    "guarding",
    "crepitus",
    "instability",
    "unstable",
    "laxity",
    "hypermobil",
    "hypomobil",
    "stiff",
    "numbness",
    "tingling",
    "paraesthesia",
    "paresthesia",
    "altered sensation",
    "hyperreflexia",
    "hyporeflexia",
    "areflexia",
    "absent reflex",
    "wasting",
    "atrophy",
    "abnormal",
    "4/5",
    "4+/5",
    "4-/5",
    "3/5",
    "2/5",
    "1/5",
    "0/5",
];

/// Keywords this short only match as whole words.
const WHOLE_WORD_MAX_LEN: usize = 3;

/// Keywords from `list` found in already-lowercased `text`, in list order.
pub fn matches<'a>(text: &str, list: &[&'a str]) -> Vec<&'a str> {
    list.iter()
        .copied()
        .filter(|kw| contains_keyword(text, kw))
        .collect()
}

fn contains_keyword(text: &str, kw: &str) -> bool {
    let check_start = kw.starts_with(is_word_char);
    let check_end =
        kw.chars().count() <= WHOLE_WORD_MAX_LEN || kw.ends_with(|c: char| c.is_ascii_digit());

    text.match_indices(kw).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + kw.len()..].chars().next();
        !(check_start && before.is_some_and(is_word_char))
            && !(check_end && after.is_some_and(is_word_char))
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}
