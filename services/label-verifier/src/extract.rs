//! Regex and vocabulary driven extraction of label values from free OCR text.
//! Every extractor returns `None` instead of failing when nothing is found.

use once_cell::sync::Lazy;
use regex::Regex;
use shared::dto::BeverageType;
use std::fmt;

use crate::normalize::normalize;

/// Ordered `(pattern, capture group)` pairs; the first pattern that matches wins.
type PatternList = Vec<(Regex, usize)>;

fn compile(patterns: &[(&str, usize)]) -> PatternList {
    patterns
        .iter()
        .map(|(p, group)| (Regex::new(p).expect("static extraction pattern"), *group))
        .collect()
}

// Each pattern carries its own qualifier (%, percent, alc., alcohol) so a bare
// number such as a proof statement never counts as a percentage.
static PERCENT_PATTERNS: Lazy<PatternList> = Lazy::new(|| {
    compile(&[
        (r"(?i)(\d+\.?\d*)\s*%", 1),
        (r"(?i)(\d+\.?\d*)\s*percent", 1),
        (r"(?i)alc\.?\s*(\d+\.?\d*)", 1),
        (r"(?i)alcohol\s*(\d+\.?\d*)", 1),
    ])
});

static VOLUME_PATTERNS: Lazy<Vec<(Regex, usize, VolumeUnit)>> = Lazy::new(|| {
    [
        (r"(?i)\b(\d+(?:\.\d+)?)\s*(?:ml|millilit(?:er|re)s?)\b", VolumeUnit::Milliliters),
        (r"(?i)\b(\d+(?:\.\d+)?)\s*(?:l|lit(?:er|re)s?)\b", VolumeUnit::Liters),
        (r"(?i)\b(\d+(?:\.\d+)?)\s*(?:oz|ounces?)\b", VolumeUnit::Ounces),
        (r"(?i)\b(\d+(?:\.\d+)?)\s*fl\.?\s*oz\b", VolumeUnit::FluidOunces),
    ]
    .into_iter()
    .map(|(p, unit)| (Regex::new(p).expect("static volume pattern"), 1, unit))
    .collect()
});

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("static number pattern"));

/// A percentage found on the label together with the text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct PercentageMatch {
    pub value: f64,
    pub matched: String,
}

pub fn find_percentage(text: &str) -> Option<PercentageMatch> {
    PERCENT_PATTERNS.iter().find_map(|(re, group)| {
        let caps = re.captures(text)?;
        let value = caps.get(*group)?.as_str().parse::<f64>().ok()?;
        let matched = caps.get(0)?.as_str().trim().to_string();
        Some(PercentageMatch { value, matched })
    })
}

/// First alcohol percentage in `text`, e.g. `45.0` for "45% Alc./Vol.".
pub fn extract_percentage(text: &str) -> Option<f64> {
    find_percentage(text).map(|m| m.value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeUnit {
    Milliliters,
    Liters,
    Ounces,
    FluidOunces,
}

impl fmt::Display for VolumeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VolumeUnit::Milliliters => "mL",
            VolumeUnit::Liters => "L",
            VolumeUnit::Ounces => "oz",
            VolumeUnit::FluidOunces => "fl oz",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeMatch {
    /// Numeric token exactly as printed, without unit.
    pub amount: String,
    pub unit: VolumeUnit,
    pub matched: String,
}

pub fn find_volume(text: &str) -> Option<VolumeMatch> {
    VOLUME_PATTERNS.iter().find_map(|(re, group, unit)| {
        let caps = re.captures(text)?;
        Some(VolumeMatch {
            amount: caps.get(*group)?.as_str().to_string(),
            unit: *unit,
            matched: caps.get(0)?.as_str().trim().to_string(),
        })
    })
}

/// Numeric part of the first volume declaration, e.g. `"750"` for "750 mL".
pub fn extract_volume(text: &str) -> Option<String> {
    find_volume(text).map(|m| m.amount)
}

/// First number in a free-form declaration such as "750 mL" or "750".
pub fn leading_number(text: &str) -> Option<&str> {
    NUMBER.find(text).map(|m| m.as_str())
}

/// Whole-token numeric equality: "750" equals "750.0" but never "1750".
pub fn same_quantity(a: &str, b: &str) -> bool {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}

/// First non-blank line, which on most labels carries the brand.
pub fn extract_brand_name(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// A known product designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductType {
    pub phrase: &'static str,
    pub label: &'static str,
    pub beverage: BeverageType,
}

const fn entry(phrase: &'static str, label: &'static str, beverage: BeverageType) -> ProductType {
    ProductType { phrase, label, beverage }
}

const PRODUCT_TYPES: &[ProductType] = &[
    entry("kentucky straight bourbon whiskey", "Kentucky Straight Bourbon Whiskey", BeverageType::Spirits),
    entry("straight bourbon whiskey", "Straight Bourbon Whiskey", BeverageType::Spirits),
    entry("bourbon whiskey", "Bourbon Whiskey", BeverageType::Spirits),
    entry("bourbon", "Bourbon", BeverageType::Spirits),
    entry("tennessee whiskey", "Tennessee Whiskey", BeverageType::Spirits),
    entry("rye whiskey", "Rye Whiskey", BeverageType::Spirits),
    entry("scotch whisky", "Scotch Whisky", BeverageType::Spirits),
    entry("irish whiskey", "Irish Whiskey", BeverageType::Spirits),
    entry("canadian whisky", "Canadian Whisky", BeverageType::Spirits),
    entry("whiskey", "Whiskey", BeverageType::Spirits),
    entry("whisky", "Whisky", BeverageType::Spirits),
    entry("vodka", "Vodka", BeverageType::Spirits),
    entry("london dry gin", "London Dry Gin", BeverageType::Spirits),
    entry("gin", "Gin", BeverageType::Spirits),
    entry("spiced rum", "Spiced Rum", BeverageType::Spirits),
    entry("rum", "Rum", BeverageType::Spirits),
    entry("tequila", "Tequila", BeverageType::Spirits),
    entry("mezcal", "Mezcal", BeverageType::Spirits),
    entry("brandy", "Brandy", BeverageType::Spirits),
    entry("cognac", "Cognac", BeverageType::Spirits),
    entry("liqueur", "Liqueur", BeverageType::Spirits),
    entry("red wine", "Red Wine", BeverageType::Wine),
    entry("white wine", "White Wine", BeverageType::Wine),
    entry("rose wine", "Rose Wine", BeverageType::Wine),
    entry("sparkling wine", "Sparkling Wine", BeverageType::Wine),
    entry("champagne", "Champagne", BeverageType::Wine),
    entry("cabernet sauvignon", "Cabernet Sauvignon", BeverageType::Wine),
    entry("merlot", "Merlot", BeverageType::Wine),
    entry("pinot noir", "Pinot Noir", BeverageType::Wine),
    entry("chardonnay", "Chardonnay", BeverageType::Wine),
    entry("sauvignon blanc", "Sauvignon Blanc", BeverageType::Wine),
    entry("riesling", "Riesling", BeverageType::Wine),
    entry("wine", "Wine", BeverageType::Wine),
    entry("india pale ale", "India Pale Ale", BeverageType::Beer),
    entry("ipa", "IPA", BeverageType::Beer),
    entry("pale ale", "Pale Ale", BeverageType::Beer),
    entry("wheat beer", "Wheat Beer", BeverageType::Beer),
    entry("stout", "Stout", BeverageType::Beer),
    entry("porter", "Porter", BeverageType::Beer),
    entry("lager", "Lager", BeverageType::Beer),
    entry("pilsner", "Pilsner", BeverageType::Beer),
    entry("hard seltzer", "Hard Seltzer", BeverageType::Beer),
    entry("ale", "Ale", BeverageType::Beer),
    entry("beer", "Beer", BeverageType::Beer),
];

/// Vocabulary ordered longest phrase first.
static BY_LENGTH: Lazy<Vec<&'static ProductType>> = Lazy::new(|| {
    let mut v: Vec<&'static ProductType> = PRODUCT_TYPES.iter().collect();
    v.sort_by(|a, b| b.phrase.len().cmp(&a.phrase.len()));
    v
});

/// Substring search that refuses hits glued to a letter or digit, so "gin"
/// is not found inside "original".
fn contains_phrase(hay: &str, phrase: &str) -> bool {
    hay.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before = hay[..start].chars().next_back();
        let after = hay[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Longest vocabulary entry present in `text`.
pub fn find_product_type(text: &str) -> Option<&'static ProductType> {
    let norm = normalize(text);
    BY_LENGTH
        .iter()
        .copied()
        .find(|p| contains_phrase(&norm, p.phrase))
}

pub fn extract_product_type(text: &str) -> Option<String> {
    find_product_type(text).map(|p| p.label.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage_formats() {
        assert_eq!(extract_percentage("45%"), Some(45.0));
        assert_eq!(extract_percentage("45 %"), Some(45.0));
        assert_eq!(extract_percentage("45% ABV"), Some(45.0));
        assert_eq!(extract_percentage("45% Alc./Vol."), Some(45.0));
        assert_eq!(extract_percentage("45.5%"), Some(45.5));
        assert_eq!(extract_percentage("alc. 45"), Some(45.0));
        assert_eq!(extract_percentage("Alcohol 12.5"), Some(12.5));
        assert_eq!(extract_percentage("13.5 percent by volume"), Some(13.5));
    }

    #[test]
    fn bare_numbers_are_not_percentages() {
        assert_eq!(extract_percentage("no numbers here"), None);
        assert_eq!(extract_percentage("90 Proof, bottled 2019"), None);
    }

    #[test]
    fn percent_sign_outranks_alc_prefix() {
        let m = find_percentage("ALC. 12 BY VOL\n40% ABV").unwrap();
        assert_eq!(m.value, 40.0);
        assert_eq!(m.matched, "40%");
    }

    #[test]
    fn volume_formats() {
        assert_eq!(extract_volume("750 mL").as_deref(), Some("750"));
        assert_eq!(extract_volume("750mL").as_deref(), Some("750"));
        assert_eq!(extract_volume("750.5 mL").as_deref(), Some("750.5"));
        assert_eq!(extract_volume("1 L").as_deref(), Some("1"));
        assert_eq!(extract_volume("1.75 Liters").as_deref(), Some("1.75"));
        assert_eq!(extract_volume("12 oz").as_deref(), Some("12"));
        assert_eq!(extract_volume("16 fl oz").as_deref(), Some("16"));
        assert_eq!(extract_volume("Just text without volume"), None);
    }

    #[test]
    fn volume_unit_must_be_a_whole_token() {
        assert_eq!(extract_volume("Batch 12 lot 7 mlx"), None);
        assert_eq!(extract_volume("Aged 4 Years"), None);
    }

    #[test]
    fn volume_keeps_unit_and_label_text() {
        let m = find_volume("NET CONTENTS 12 FL. OZ").unwrap();
        assert_eq!(m.amount, "12");
        assert_eq!(m.unit, VolumeUnit::FluidOunces);
        assert_eq!(m.matched, "12 FL. OZ");
    }

    #[test]
    fn volume_is_never_a_suffix_of_a_longer_number() {
        assert_eq!(extract_volume("1750 mL").as_deref(), Some("1750"));
        assert!(!same_quantity("1750", "750"));
        assert!(same_quantity("750", "750"));
        assert!(same_quantity("750", "750.0"));
    }

    #[test]
    fn leading_number_of_form_value() {
        assert_eq!(leading_number("750 mL"), Some("750"));
        assert_eq!(leading_number("1.75L"), Some("1.75"));
        assert_eq!(leading_number("seven fifty"), None);
    }

    #[test]
    fn brand_is_first_non_blank_line() {
        assert_eq!(
            extract_brand_name("EAGLE PEAK\nKENTUCKY BOURBON\nAged 4 Years").as_deref(),
            Some("EAGLE PEAK")
        );
        assert_eq!(extract_brand_name("\n\n  EAGLE PEAK  \nBOURBON").as_deref(), Some("EAGLE PEAK"));
        assert_eq!(extract_brand_name(""), None);
        assert_eq!(extract_brand_name(" \n\t\n"), None);
    }

    #[test]
    fn product_type_prefers_longest_phrase() {
        assert_eq!(
            extract_product_type("EAGLE PEAK\nKENTUCKY STRAIGHT BOURBON WHISKEY\n45%").as_deref(),
            Some("Kentucky Straight Bourbon Whiskey")
        );
        assert_eq!(extract_product_type("BRAND NAME\nPREMIUM VODKA\n40% ABV").as_deref(), Some("Vodka"));
        let ipa = find_product_type("HOPPY CO\nINDIA PALE ALE").unwrap();
        assert_eq!(ipa.label, "India Pale Ale");
        assert_eq!(ipa.beverage, BeverageType::Beer);
    }

    #[test]
    fn product_type_ignores_embedded_words() {
        assert_eq!(extract_product_type("Just random text"), None);
        assert_eq!(extract_product_type("An original wholesale recipe"), None);
    }
}
