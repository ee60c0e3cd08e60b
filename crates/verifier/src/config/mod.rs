pub mod types;
pub mod validate;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Load and merge all config JSON files into a single [`VerifierConfig`],
/// then apply environment variable overrides and validate.
///
/// Expected directory layout:
/// ```text
/// config/
///   app.json
///   endpoints.json
///   rate_model.json
///   tolerances.json   (optional, defaults 1e-12 relative / 1e-6 absolute)
/// ```
///
/// # Environment variable overrides
///
/// | Env Var             | Config Field                          |
/// |---------------------|---------------------------------------|
/// | `MARKET_API_URL`    | `endpoints.market_api.base_url`       |
/// | `TARGET_SYMBOL`     | `endpoints.market_api.target_symbol`  |
/// | `EXPLORER_API_URL`  | `endpoints.explorer.base_url`         |
/// | `ETH_RPC_URL`       | `endpoints.rpc.http_url`              |
/// | `RATE_MODEL_SOURCE` | `rate_model.source` (`chain`/`config`)|
pub fn load_config(config_dir: &Path) -> Result<VerifierConfig> {
    let read = |name: &str| -> Result<String> {
        let path = config_dir.join(name);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))
    };

    let app: AppConfig = serde_json::from_str(&read("app.json")?).context("parsing app.json")?;

    let endpoints: EndpointsConfig =
        serde_json::from_str(&read("endpoints.json")?).context("parsing endpoints.json")?;

    let rate_model: RateModelConfig =
        serde_json::from_str(&read("rate_model.json")?).context("parsing rate_model.json")?;

    // Tolerances are optional.
    let tolerances: ToleranceConfig = match read("tolerances.json") {
        Ok(contents) => serde_json::from_str(&contents).context("parsing tolerances.json")?,
        Err(_) => ToleranceConfig::default(),
    };

    let mut config = VerifierConfig {
        app,
        endpoints,
        rate_model,
        tolerances,
    };

    apply_env_overrides(&mut config);
    validate::validate_config(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides to the loaded config.
///
/// Only non-empty env vars take effect. Parse failures are logged and skipped
/// (the JSON value remains).
fn apply_env_overrides(config: &mut VerifierConfig) {
    if let Some(val) = env_string("MARKET_API_URL") {
        info!("env override: MARKET_API_URL");
        config.endpoints.market_api.base_url = val;
    }

    if let Some(val) = env_string("TARGET_SYMBOL") {
        info!(symbol = %val, "env override: TARGET_SYMBOL");
        config.endpoints.market_api.target_symbol = val;
    }

    if let Some(val) = env_string("EXPLORER_API_URL") {
        info!("env override: EXPLORER_API_URL");
        config.endpoints.explorer.base_url = val;
    }

    // May embed credentials; never logged.
    if let Some(val) = env_string("ETH_RPC_URL") {
        info!("env override: ETH_RPC_URL");
        config.endpoints.rpc.http_url = val;
    }

    if let Some(val) = env_string("RATE_MODEL_SOURCE") {
        match val.to_lowercase().as_str() {
            "chain" => config.rate_model.source = ParameterSource::Chain,
            "config" => config.rate_model.source = ParameterSource::Config,
            other => warn!(value = other, "ignoring unknown RATE_MODEL_SOURCE"),
        }
        info!(source = ?config.rate_model.source, "env override: RATE_MODEL_SOURCE");
    }
}

/// Read a non-empty env var as a `String`.
pub(crate) fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
