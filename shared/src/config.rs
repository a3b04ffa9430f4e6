use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::{AppError, Result};

fn default_brand_threshold() -> f64 {
    0.75
}

fn default_product_threshold() -> f64 {
    0.75
}

fn default_warning_threshold() -> f64 {
    0.85
}

fn default_abv_tolerance() -> f64 {
    0.5
}

fn default_min_text_len() -> usize {
    10
}

fn default_bind_addr() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    8000
}

/// Whether a failed government-warning check flips the overall verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WarningPolicy {
    /// Reported in the checks but ignored for `overall_match`.
    #[default]
    Advisory,
    Required,
}

fn policy_from_str<'de, D>(d: D) -> std::result::Result<WarningPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    raw.trim().parse().map_err(|_| {
        serde::de::Error::custom(format!(
            "unknown warning policy '{raw}', expected 'advisory' or 'required'"
        ))
    })
}

/// Tuning knobs consumed by the verification engine.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifyOptions {
    pub brand_threshold: f64,
    pub product_threshold: f64,
    pub warning_threshold: f64,
    pub abv_tolerance: f64,
    pub warning_policy: WarningPolicy,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            brand_threshold: default_brand_threshold(),
            product_threshold: default_product_threshold(),
            warning_threshold: default_warning_threshold(),
            abv_tolerance: default_abv_tolerance(),
            warning_policy: WarningPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_brand_threshold")]
    pub brand_threshold: f64,
    #[serde(default = "default_product_threshold")]
    pub product_threshold: f64,
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,
    #[serde(default = "default_abv_tolerance")]
    pub abv_tolerance: f64,
    #[serde(default, deserialize_with = "policy_from_str")]
    pub warning_policy: WarningPolicy,
    #[serde(default = "default_min_text_len")]
    pub min_text_len: usize,
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let settings: Settings = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("brand_threshold", self.brand_threshold),
            ("product_threshold", self.product_threshold),
            ("warning_threshold", self.warning_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AppError::Config(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        if !self.abv_tolerance.is_finite() || self.abv_tolerance < 0.0 {
            return Err(AppError::Config(format!(
                "abv_tolerance must be a non-negative number, got {}",
                self.abv_tolerance
            )));
        }
        Ok(())
    }

    pub fn verify_options(&self) -> VerifyOptions {
        VerifyOptions {
            brand_threshold: self.brand_threshold,
            product_threshold: self.product_threshold,
            warning_threshold: self.warning_threshold,
            abv_tolerance: self.abv_tolerance,
            warning_policy: self.warning_policy,
        }
    }
}
