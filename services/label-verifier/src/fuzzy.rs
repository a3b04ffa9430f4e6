//! Sliding-window fuzzy search that tolerates single-character OCR errors
//! ("Eagie Peak" for "Eagle Peak", "B0URB0N" for "BOURBON").

use strsim::normalized_levenshtein;

use crate::normalize::normalize;

/// Where a pattern was found and how closely it matched.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyHit {
    /// Normalized text of the matching window.
    pub matched: String,
    /// Edit-distance ratio in `[0.0, 1.0]`.
    pub similarity: f64,
}

/// Edit-distance based similarity, `1.0` for identical strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// Searches `haystack` for `pattern`, first as a literal substring and then
/// window by window over runs of as many words as the pattern has.
pub fn find_fuzzy(haystack: &str, pattern: &str, threshold: f64) -> Option<FuzzyHit> {
    let hay_norm = normalize(haystack);
    let pattern_norm = normalize(pattern);

    if hay_norm.contains(&pattern_norm) {
        return Some(FuzzyHit {
            matched: pattern_norm,
            similarity: 1.0,
        });
    }

    let words: Vec<&str> = hay_norm.split(' ').collect();
    let k = pattern_norm.split(' ').count();
    if words.len() < k {
        return None;
    }

    words.windows(k).find_map(|window| {
        let candidate = window.join(" ");
        let score = similarity(&candidate, &pattern_norm);
        (score >= threshold).then_some(FuzzyHit {
            matched: candidate,
            similarity: score,
        })
    })
}

/// True when `pattern` occurs in `haystack` within the similarity threshold.
pub fn fuzzy_match(haystack: &str, pattern: &str, threshold: f64) -> bool {
    find_fuzzy(haystack, pattern, threshold).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_substring_short_circuits() {
        let hit = find_fuzzy("Eagle Peak Bourbon", "Eagle Peak", 1.0).unwrap();
        assert_eq!(hit.matched, "eagle peak");
        assert_eq!(hit.similarity, 1.0);
    }

    #[test]
    fn case_and_spacing_do_not_matter() {
        assert!(fuzzy_match("EAGLE PEAK BOURBON", "eagle peak", 0.75));
        assert!(fuzzy_match("Eagle  Peak   Bourbon", "Eagle Peak", 0.75));
    }

    #[test]
    fn tolerates_ocr_substitutions() {
        assert!(fuzzy_match("Eagle Peak Distillery", "Eagie Peak", 0.75));
        assert!(fuzzy_match("Eagie Peak Bourbon", "Eagle Peak", 0.75));
        assert!(fuzzy_match("B0URB0N WHISKEY", "BOURBON WHISKEY", 0.75));
        assert!(fuzzy_match("Eagle Peaks Bourbon", "Eagle Peak", 0.75));
    }

    #[test]
    fn reports_the_window_that_matched() {
        let hit = find_fuzzy("Kentucky B0URB0N WHISKEY 45%", "Bourbon Whiskey", 0.75).unwrap();
        assert_eq!(hit.matched, "b0urb0n whiskey");
        assert!(hit.similarity > 0.8 && hit.similarity < 1.0);
    }

    #[test]
    fn insertions_are_scored_against_the_longer_string() {
        // 3 edits over 11 characters.
        let score = similarity("pexakhixllx", "peakhill");
        assert!((score - 8.0 / 11.0).abs() < 1e-9);
        assert!(!fuzzy_match("pexakhixllx reserve", "peakhill", 0.75));
    }

    #[test]
    fn different_strings_do_not_match() {
        assert!(!fuzzy_match("Sunset Ridge", "Eagle Peak", 0.75));
        assert!(!fuzzy_match("Vodka Brand", "Bourbon Brand", 0.75));
    }

    #[test]
    fn pattern_longer_than_haystack_has_no_window() {
        assert!(!fuzzy_match("Peak", "Eagle Peak Distillery", 0.1));
    }

    #[test]
    fn empty_pattern_matches_trivially() {
        assert!(fuzzy_match("anything", "", 0.99));
        assert!(fuzzy_match("", "", 0.99));
    }
}
