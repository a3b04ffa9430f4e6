//! Runs every field check for one (form, OCR text) pair and assembles the
//! report. The only place that produces a pass/fail verdict.

use shared::config::{VerifyOptions, WarningPolicy};
use shared::dto::{
    field_names, BeverageType, ExtractedText, FieldCheckResult, FormInput, VerificationReport,
};
use tracing::{debug, info, warn};

use crate::extract::{
    extract_brand_name, extract_product_type, find_percentage, find_volume, leading_number,
    same_quantity,
};
use crate::fuzzy::find_fuzzy;
use crate::highlight;
use crate::warning::{check_sulfites, check_warning_with};

pub fn verify(form: &FormInput, extracted: &ExtractedText) -> VerificationReport {
    verify_with(form, extracted, &VerifyOptions::default())
}

pub fn verify_with(
    form: &FormInput,
    extracted: &ExtractedText,
    opts: &VerifyOptions,
) -> VerificationReport {
    let text = extracted.raw_text.as_str();

    let mut checks = vec![
        check_brand(&form.brand_name, text, opts.brand_threshold),
        check_product_class(&form.product_class, text, opts.product_threshold),
        check_alcohol(form.alcohol_content, text, opts.abv_tolerance),
    ];
    if let Some(declared) = form.net_contents() {
        checks.extend(check_net_contents(declared, text));
    }
    checks.push(
        check_warning_with(text, opts.warning_threshold)
            .with_advisory(opts.warning_policy == WarningPolicy::Advisory),
    );
    if form.beverage_type == BeverageType::Wine {
        checks.push(check_sulfites(text, opts.warning_threshold).with_advisory(true));
    }

    if let Some(word_boxes) = &extracted.word_boxes {
        for check in &mut checks {
            highlight::attach(check, word_boxes);
        }
    }

    for c in &checks {
        debug!(field = %c.field_name, matched = c.matched, found = ?c.found_value, "field checked");
    }
    let report = VerificationReport::assemble(text, checks, extracted.word_boxes.clone());
    info!(
        brand = %form.brand_name,
        beverage = %form.beverage_type,
        overall_match = report.overall_match,
        "label verified"
    );
    report
}

pub fn check_brand(brand_name: &str, text: &str, threshold: f64) -> FieldCheckResult {
    match find_fuzzy(text, brand_name, threshold) {
        Some(hit) => FieldCheckResult::new(
            field_names::BRAND_NAME,
            brand_name,
            Some(hit.matched),
            true,
            format!("Brand name '{brand_name}' found on label"),
        ),
        None => {
            let candidate = extract_brand_name(text);
            let message = match &candidate {
                Some(c) => format!("Brand name '{brand_name}' not found on label (label shows '{c}')"),
                None => format!("Brand name '{brand_name}' not found on label"),
            };
            FieldCheckResult::new(field_names::BRAND_NAME, brand_name, candidate, false, message)
        }
    }
}

pub fn check_product_class(product_class: &str, text: &str, threshold: f64) -> FieldCheckResult {
    match find_fuzzy(text, product_class, threshold) {
        Some(hit) => FieldCheckResult::new(
            field_names::PRODUCT_CLASS,
            product_class,
            Some(hit.matched),
            true,
            format!("Product class '{product_class}' found on label"),
        ),
        None => {
            let candidate = extract_product_type(text);
            let message = match &candidate {
                Some(c) => format!(
                    "Product class '{product_class}' not found on label (label shows '{c}')"
                ),
                None => format!("Product class '{product_class}' not found on label"),
            };
            FieldCheckResult::new(
                field_names::PRODUCT_CLASS,
                product_class,
                candidate,
                false,
                message,
            )
        }
    }
}

/// Passes when the label's percentage is within `tolerance` points of the form.
pub fn check_alcohol(expected: f64, text: &str, tolerance: f64) -> FieldCheckResult {
    let expected_value = format!("{expected}%");
    let Some(found) = find_percentage(text) else {
        return FieldCheckResult::new(
            field_names::ALCOHOL_CONTENT,
            expected_value,
            None,
            false,
            format!("Could not find alcohol content on label (expected {expected}%)"),
        );
    };

    let v = found.value;
    let matched = (v - expected).abs() <= tolerance;
    let message = if matched {
        format!("Alcohol content {v}% matches form ({expected}%)")
    } else {
        format!("Alcohol content on label ({v}%) differs from form ({expected}%)")
    };
    FieldCheckResult::new(
        field_names::ALCOHOL_CONTENT,
        expected_value,
        Some(found.matched),
        matched,
        message,
    )
}

/// Exact numeric comparison of the declared and printed volume. Returns
/// `None` when the declaration carries no number to compare.
pub fn check_net_contents(declared: &str, text: &str) -> Option<FieldCheckResult> {
    let Some(form_amount) = leading_number(declared) else {
        warn!(net_contents = %declared, "could not parse net contents from form, skipping check");
        return None;
    };

    let check = match find_volume(text) {
        Some(found) if same_quantity(&found.amount, form_amount) => FieldCheckResult::new(
            field_names::NET_CONTENTS,
            declared,
            Some(found.matched),
            true,
            format!("Net contents '{declared}' found on label"),
        ),
        Some(found) => {
            let message = format!(
                "Net contents on label ({} {}) differs from form ({declared})",
                found.amount, found.unit
            );
            FieldCheckResult::new(
                field_names::NET_CONTENTS,
                declared,
                Some(found.matched),
                false,
                message,
            )
        }
        None => FieldCheckResult::new(
            field_names::NET_CONTENTS,
            declared,
            None,
            false,
            format!("Net contents '{declared}' not found on label"),
        ),
    };
    Some(check)
}
