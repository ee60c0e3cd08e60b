use alloy::primitives::U256;
use anyhow::{bail, Result};
use reqwest::Url;
use rust_decimal::Decimal;
use std::str::FromStr;

use super::types::{KinkSource, ParameterSource, VerifierConfig};

/// Validate invariants across the merged config that serde alone cannot enforce.
///
/// Called automatically by [`super::load_config`].
pub fn validate_config(config: &VerifierConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    validate_endpoints_config(config, &mut errors);
    validate_rate_model_config(config, &mut errors);
    validate_tolerance_config(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        let numbered: Vec<String> = errors
            .iter()
            .enumerate()
            .map(|(i, e)| format!("  {}. {e}", i + 1))
            .collect();
        bail!(
            "Configuration validation failed ({} error{}):\n{}",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" },
            numbered.join("\n")
        );
    }
}

// ---------------------------------------------------------------------------
// Endpoints config
// ---------------------------------------------------------------------------

fn validate_endpoints_config(config: &VerifierConfig, errors: &mut Vec<String>) {
    let endpoints = &config.endpoints;

    let urls = [
        ("endpoints.market_api.base_url", &endpoints.market_api.base_url),
        ("endpoints.explorer.base_url", &endpoints.explorer.base_url),
        ("endpoints.rpc.http_url", &endpoints.rpc.http_url),
    ];
    for (name, url) in &urls {
        if let Err(e) = validate_url(url) {
            errors.push(format!("{name}: {e}"));
        }
    }

    if endpoints.market_api.target_symbol.trim().is_empty() {
        errors.push("endpoints.market_api: target_symbol is empty".into());
    }

    if endpoints.http.connect_timeout_seconds == 0 {
        errors.push("endpoints.http: connect_timeout_seconds must be > 0".into());
    }
    if endpoints.http.request_timeout_seconds == 0 {
        errors.push("endpoints.http: request_timeout_seconds must be > 0".into());
    }
}

// ---------------------------------------------------------------------------
// Rate model config
// ---------------------------------------------------------------------------

fn validate_rate_model_config(config: &VerifierConfig, errors: &mut Vec<String>) {
    let rm = &config.rate_model;

    if rm.blocks_per_day <= Decimal::ZERO {
        errors.push(format!(
            "rate_model: blocks_per_day must be > 0, got {}",
            rm.blocks_per_day
        ));
    }
    if rm.days_per_year <= Decimal::ZERO {
        errors.push(format!(
            "rate_model: days_per_year must be > 0, got {}",
            rm.days_per_year
        ));
    }

    let constants = [
        ("base_rate_per_block", &rm.base_rate_per_block),
        ("multiplier_per_block", &rm.multiplier_per_block),
        ("jump_multiplier_per_block", &rm.jump_multiplier_per_block),
        ("blocks_per_year", &rm.blocks_per_year),
    ];
    for (name, value) in &constants {
        if let Err(e) = parse_u256(value.as_deref()) {
            errors.push(format!("rate_model.{name}: {e}"));
        }
    }

    if rm.source == ParameterSource::Config {
        if rm.base_rate_per_block.is_none() {
            errors.push("rate_model: base_rate_per_block is required when source = config".into());
        }
        if rm.multiplier_per_block.is_none() {
            errors.push("rate_model: multiplier_per_block is required when source = config".into());
        }
        if rm.kink_source == KinkSource::Contract {
            errors.push("rate_model: kink_source = contract requires source = chain".into());
        }
    }
}

// ---------------------------------------------------------------------------
// Tolerance config
// ---------------------------------------------------------------------------

fn validate_tolerance_config(config: &VerifierConfig, errors: &mut Vec<String>) {
    let tol = &config.tolerances;

    if tol.onchain_relative.is_sign_negative() {
        errors.push(format!(
            "tolerances: onchain_relative must be >= 0, got {}",
            tol.onchain_relative
        ));
    }
    if tol.api_absolute.is_sign_negative() {
        errors.push(format!(
            "tolerances: api_absolute must be >= 0, got {}",
            tol.api_absolute
        ));
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse an optional unsigned 256-bit integer written as a decimal string.
pub fn parse_u256(value: Option<&str>) -> Result<Option<U256>, String> {
    match value {
        None => Ok(None),
        Some(s) => {
            let s = s.trim();
            if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
                return Err(format!("'{s}' is not an unsigned decimal integer"));
            }
            U256::from_str(s)
                .map(Some)
                .map_err(|e| format!("'{s}' does not fit in uint256: {e}"))
        }
    }
}

/// Validate an absolute http(s) URL.
fn validate_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL is empty".into());
    }
    let parsed = Url::parse(url).map_err(|e| format!("'{url}' is not a valid URL: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(format!("'{url}' must use http or https"));
    }
    Ok(())
}
