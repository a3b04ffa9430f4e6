//! Environment-driven settings for the verification service.

use serial_test::serial;
use shared::config::{Settings, VerifyOptions, WarningPolicy};

const KEYS: &[&str] = &[
    "BRAND_THRESHOLD",
    "PRODUCT_THRESHOLD",
    "WARNING_THRESHOLD",
    "ABV_TOLERANCE",
    "WARNING_POLICY",
    "MIN_TEXT_LEN",
    "PORT",
];

fn clear_env() {
    for k in KEYS {
        std::env::remove_var(k);
    }
}

#[serial]
#[test]
fn defaults_match_engine_defaults() -> anyhow::Result<()> {
    clear_env();
    let settings = Settings::new()?;
    assert_eq!(settings.verify_options(), VerifyOptions::default());
    assert_eq!(settings.min_text_len, 10);
    assert_eq!(settings.port, 8000);
    Ok(())
}

#[serial]
#[test]
fn overrides_are_read_from_env() -> anyhow::Result<()> {
    clear_env();
    std::env::set_var("BRAND_THRESHOLD", "0.8");
    std::env::set_var("ABV_TOLERANCE", "0.3");
    std::env::set_var("WARNING_POLICY", "required");
    std::env::set_var("PORT", "9100");

    let settings = Settings::new()?;
    let opts = settings.verify_options();
    assert!((opts.brand_threshold - 0.8).abs() < f64::EPSILON);
    assert!((opts.abv_tolerance - 0.3).abs() < f64::EPSILON);
    assert_eq!(opts.warning_policy, WarningPolicy::Required);
    assert_eq!(settings.port, 9100);

    clear_env();
    Ok(())
}

#[serial]
#[test]
fn warning_policy_ignores_case() -> anyhow::Result<()> {
    clear_env();
    std::env::set_var("WARNING_POLICY", "Required");
    assert_eq!(Settings::new()?.warning_policy, WarningPolicy::Required);
    std::env::set_var("WARNING_POLICY", "ADVISORY");
    assert_eq!(Settings::new()?.warning_policy, WarningPolicy::Advisory);
    clear_env();
    Ok(())
}

#[serial]
#[test]
fn unknown_warning_policy_is_rejected() {
    clear_env();
    std::env::set_var("WARNING_POLICY", "strict");
    assert!(Settings::new().is_err());
    clear_env();
}

#[serial]
#[test]
fn threshold_outside_unit_interval_is_rejected() {
    clear_env();
    std::env::set_var("WARNING_THRESHOLD", "1.5");
    assert!(Settings::new().is_err());
    clear_env();
}
