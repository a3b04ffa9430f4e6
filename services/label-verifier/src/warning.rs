//! Presence and format check for the mandated health warning. This is a
//! keyword level check, not an exact legal-text comparison.

use once_cell::sync::Lazy;
use regex::Regex;
use shared::dto::{field_names, FieldCheckResult};
use tracing::debug;

use crate::fuzzy::{fuzzy_match, similarity};
use crate::normalize::normalize;

pub const DEFAULT_WARNING_THRESHOLD: f64 = 0.85;

/// Minimum similarity between the label's warning and [`REQUIRED_WARNING`].
const TEXT_SIMILARITY_THRESHOLD: f64 = 0.90;

pub const REQUIRED_WARNING: &str = "GOVERNMENT WARNING: (1) According to the Surgeon General, \
women should not drink alcoholic beverages during pregnancy because of the risk of birth \
defects. (2) Consumption of alcoholic beverages impairs your ability to drive a car or operate \
machinery, and may cause health problems.";

struct Requirement {
    /// Any one of these satisfies the requirement.
    keywords: &'static [&'static str],
    missing: &'static str,
}

const REQUIREMENTS: &[Requirement] = &[
    Requirement {
        keywords: &["government warning"],
        missing: "'GOVERNMENT WARNING' header is missing",
    },
    Requirement {
        keywords: &["surgeon general"],
        missing: "Statement (1) attribution to the Surgeon General is missing",
    },
    Requirement {
        keywords: &["pregnant", "pregnancy"],
        missing: "Statement (1) about pregnancy is missing",
    },
    Requirement {
        keywords: &["birth defects"],
        missing: "Statement (1) about birth defects is missing",
    },
    Requirement {
        keywords: &["operating machinery", "operate machinery", "drive a car"],
        missing: "Statement (2) about driving/machinery is missing",
    },
];

static SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)government\s+warning.*?(?:health\s+problems\.?|$)")
        .expect("static warning section pattern")
});

static HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)government\s+warning").expect("static warning header pattern"));

static SURGEON_GENERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)surgeon\s+general").expect("static surgeon general pattern"));

/// The warning paragraph, from its header through "health problems".
pub fn extract_warning_section(text: &str) -> Option<String> {
    SECTION.find(text).map(|m| m.as_str().trim().to_string())
}

/// True when any occurrence of `re` lacks the casing accepted by `ok`.
fn any_miscased(re: &Regex, text: &str, ok: impl Fn(&str) -> bool) -> bool {
    re.find_iter(text).any(|m| !ok(m.as_str()))
}

fn header_is_uppercase(s: &str) -> bool {
    !s.chars().any(char::is_lowercase)
}

fn surgeon_general_is_capitalized(s: &str) -> bool {
    let mut words = s.split_whitespace();
    let initial_upper = |w: Option<&str>| {
        w.and_then(|w| w.chars().next())
            .is_some_and(char::is_uppercase)
    };
    initial_upper(words.next()) && initial_upper(words.next())
}

/// Format defects of a warning whose header was found.
fn format_violations(text: &str, section: &str) -> Vec<String> {
    let mut violations = Vec::new();
    if any_miscased(&HEADER, text, header_is_uppercase) {
        violations.push("'GOVERNMENT WARNING' must appear in capital letters".to_string());
    }
    if any_miscased(&SURGEON_GENERAL, text, surgeon_general_is_capitalized) {
        violations.push("'Surgeon General' must have capital S and capital G".to_string());
    }
    for marker in ["(1)", "(2)"] {
        if !section.contains(marker) {
            violations.push(format!("Statement marker '{marker}' is missing"));
        }
    }
    let score = similarity(&normalize(section), &normalize(REQUIRED_WARNING));
    debug!(similarity = score, "warning text compared with regulatory text");
    if score < TEXT_SIMILARITY_THRESHOLD {
        violations.push("Warning text differs from required regulatory text".to_string());
    }
    violations
}

pub fn check_warning(text: &str) -> FieldCheckResult {
    check_warning_with(text, DEFAULT_WARNING_THRESHOLD)
}

pub fn check_warning_with(text: &str, threshold: f64) -> FieldCheckResult {
    let mut violations = Vec::new();
    let mut found = Vec::new();
    for req in REQUIREMENTS {
        match req.keywords.iter().find(|k| fuzzy_match(text, k, threshold)) {
            Some(k) => found.push(*k),
            None => violations.push(req.missing.to_string()),
        }
    }

    let section = extract_warning_section(text);
    if let Some(section) = &section {
        violations.extend(format_violations(text, section));
    }

    let matched = violations.is_empty();
    let found_value = section.or_else(|| (!found.is_empty()).then(|| found.join(", ")));
    let message = if matched {
        "Government warning statement found on label".to_string()
    } else if found.is_empty() {
        "Government warning statement not detected (required by law)".to_string()
    } else {
        format!(
            "Government warning has {} compliance issue(s)",
            violations.len()
        )
    };
    debug!(matched, violations = violations.len(), "government warning checked");

    FieldCheckResult::new(
        field_names::GOVERNMENT_WARNING,
        "Required warning text",
        found_value,
        matched,
        message,
    )
    .with_violations(violations)
}

/// Wine labels must declare sulfites.
pub fn check_sulfites(text: &str, threshold: f64) -> FieldCheckResult {
    let found = fuzzy_match(text, "contains sulfites", threshold);
    FieldCheckResult::new(
        field_names::SULFITE_DECLARATION,
        "Contains Sulfites",
        found.then(|| "Contains Sulfites".to_string()),
        found,
        if found {
            "Sulfite declaration found on label"
        } else {
            "Sulfite declaration not detected (required for wine)"
        },
    )
}
