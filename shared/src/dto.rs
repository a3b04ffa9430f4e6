use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

use crate::error::{AppError, Result};

/// Field names used in [`FieldCheckResult::field_name`].
pub mod field_names {
    pub const BRAND_NAME: &str = "Brand Name";
    pub const PRODUCT_CLASS: &str = "Product Class/Type";
    pub const ALCOHOL_CONTENT: &str = "Alcohol Content";
    pub const NET_CONTENTS: &str = "Net Contents";
    pub const GOVERNMENT_WARNING: &str = "Government Warning";
    pub const SULFITE_DECLARATION: &str = "Sulfite Declaration";
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BeverageType {
    #[default]
    Spirits,
    Wine,
    Beer,
}

impl BeverageType {
    /// Unknown names fall back to spirits.
    pub fn parse_lenient(s: &str) -> Self {
        s.trim().parse().unwrap_or_default()
    }
}

fn lenient_beverage<'de, D>(d: D) -> std::result::Result<BeverageType, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.map(|s| BeverageType::parse_lenient(&s)).unwrap_or_default())
}

/// What the applicant declared on the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInput {
    pub brand_name: String,
    pub product_class: String,
    pub alcohol_content: f64,
    #[serde(default)]
    pub net_contents: Option<String>,
    #[serde(default, deserialize_with = "lenient_beverage")]
    pub beverage_type: BeverageType,
}

impl FormInput {
    pub fn new(
        brand_name: impl Into<String>,
        product_class: impl Into<String>,
        alcohol_content: f64,
    ) -> Self {
        Self {
            brand_name: brand_name.into(),
            product_class: product_class.into(),
            alcohol_content,
            net_contents: None,
            beverage_type: BeverageType::default(),
        }
    }

    pub fn with_net_contents(mut self, net_contents: impl Into<String>) -> Self {
        self.net_contents = Some(net_contents.into());
        self
    }

    pub fn with_beverage_type(mut self, beverage_type: BeverageType) -> Self {
        self.beverage_type = beverage_type;
        self
    }

    /// Rejects input the engine is not meant to see.
    pub fn validate(&self) -> Result<()> {
        if self.brand_name.trim().is_empty() {
            return Err(AppError::InvalidInput("brand_name must not be empty".into()));
        }
        if self.product_class.trim().is_empty() {
            return Err(AppError::InvalidInput("product_class must not be empty".into()));
        }
        if !self.alcohol_content.is_finite() || !(0.0..=100.0).contains(&self.alcohol_content) {
            return Err(AppError::InvalidInput(format!(
                "alcohol_content must be a percentage between 0 and 100, got {}",
                self.alcohol_content
            )));
        }
        Ok(())
    }

    /// The declared net contents, or `None` when blank.
    pub fn net_contents(&self) -> Option<&str> {
        self.net_contents
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// OCR confidence, 0-100. Engines may report it fractionally.
    pub conf: f64,
}

/// A word seen once maps to a single box, repeated words to a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordBoxEntry {
    One(BoundingBox),
    Many(Vec<BoundingBox>),
}

impl WordBoxEntry {
    pub fn boxes(&self) -> &[BoundingBox] {
        match self {
            WordBoxEntry::One(b) => std::slice::from_ref(b),
            WordBoxEntry::Many(v) => v,
        }
    }
}

/// Lowercase word to bounding box(es).
pub type WordBoxes = BTreeMap<String, WordBoxEntry>;

/// Output of the OCR collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedText {
    pub raw_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_boxes: Option<WordBoxes>,
}

impl ExtractedText {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            word_boxes: None,
        }
    }

    pub fn with_word_boxes(mut self, word_boxes: WordBoxes) -> Self {
        self.word_boxes = Some(word_boxes);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCheckResult {
    pub field_name: String,
    pub expected_value: String,
    /// `None` only when extraction found nothing at all.
    pub found_value: Option<String>,
    pub matched: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_boxes: Option<Vec<BoundingBox>>,
    /// Advisory checks are reported but do not gate `overall_match`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub advisory: bool,
}

impl FieldCheckResult {
    pub fn new(
        field_name: impl Into<String>,
        expected_value: impl Into<String>,
        found_value: Option<String>,
        matched: bool,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            expected_value: expected_value.into(),
            found_value,
            matched,
            message: message.into(),
            violations: None,
            bounding_boxes: None,
            advisory: false,
        }
    }

    pub fn with_violations(mut self, violations: Vec<String>) -> Self {
        self.violations = Some(violations);
        self
    }

    pub fn with_advisory(mut self, advisory: bool) -> Self {
        self.advisory = advisory;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationReport {
    pub success: bool,
    pub overall_match: bool,
    pub message: String,
    pub extracted_text: String,
    pub checks: Vec<FieldCheckResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_boxes: Option<WordBoxes>,
}

impl VerificationReport {
    /// Builds the verdict: every non-advisory check must have matched.
    pub fn assemble(
        extracted_text: impl Into<String>,
        checks: Vec<FieldCheckResult>,
        word_boxes: Option<WordBoxes>,
    ) -> Self {
        let failed: Vec<&str> = checks
            .iter()
            .filter(|c| !c.advisory && !c.matched)
            .map(|c| c.field_name.as_str())
            .collect();
        let advisory_failed: Vec<&str> = checks
            .iter()
            .filter(|c| c.advisory && !c.matched)
            .map(|c| c.field_name.as_str())
            .collect();

        let overall_match = failed.is_empty();
        let mut message = if overall_match {
            "The label matches the form data. All required information is consistent.".to_string()
        } else {
            format!(
                "The label does not match the form. Issues found in: {}",
                failed.join(", ")
            )
        };
        if !advisory_failed.is_empty() {
            message.push_str(&format!(" Advisory: {}.", advisory_failed.join(", ")));
        }

        Self {
            success: true,
            overall_match,
            message,
            extracted_text: extracted_text.into(),
            checks,
            word_boxes,
        }
    }

    /// Report for text too short to verify anything against.
    pub fn unreadable(extracted_text: impl Into<String>) -> Self {
        Self {
            success: false,
            overall_match: false,
            message: "Could not read text from the label image. Please try a clearer image."
                .into(),
            extracted_text: extracted_text.into(),
            checks: Vec::new(),
            word_boxes: None,
        }
    }

    pub fn check(&self, field_name: &str) -> Option<&FieldCheckResult> {
        self.checks.iter().find(|c| c.field_name == field_name)
    }
}
