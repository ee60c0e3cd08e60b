use rust_decimal::Decimal;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_API_ABSOLUTE_TOLERANCE, DEFAULT_BLOCKS_PER_DAY, DEFAULT_DAYS_PER_YEAR,
    DEFAULT_EXPLORER_API_URL, DEFAULT_LOG_FILTER, DEFAULT_MARKET_API_URL,
    DEFAULT_ONCHAIN_RELATIVE_TOLERANCE, DEFAULT_TARGET_SYMBOL,
};

// ---------------------------------------------------------------------------
// Top-level aggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct VerifierConfig {
    pub app: AppConfig,
    pub endpoints: EndpointsConfig,
    pub rate_model: RateModelConfig,
    pub tolerances: ToleranceConfig,
}

// ---------------------------------------------------------------------------
// app.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_file_prefix() -> String {
    "rate-verifier.log".into()
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.into()
}

// ---------------------------------------------------------------------------
// endpoints.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointsConfig {
    pub market_api: MarketApiConfig,
    pub explorer: ExplorerConfig,
    pub rpc: RpcConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketApiConfig {
    #[serde(default = "default_market_api_url")]
    pub base_url: String,
    /// Exact, case-sensitive symbol of the market to verify.
    #[serde(default = "default_target_symbol")]
    pub target_symbol: String,
}

fn default_market_api_url() -> String {
    DEFAULT_MARKET_API_URL.into()
}

fn default_target_symbol() -> String {
    DEFAULT_TARGET_SYMBOL.into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "default_explorer_api_url")]
    pub base_url: String,
    pub chain_id: u64,
    /// Name of the env var holding the explorer API key. Empty = anonymous.
    #[serde(default)]
    pub api_key_env: String,
}

fn default_explorer_api_url() -> String {
    DEFAULT_EXPLORER_API_URL.into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub http_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
}

// ---------------------------------------------------------------------------
// rate_model.json
// ---------------------------------------------------------------------------

/// Where the jump-rate parameters come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterSource {
    /// Read live from the rate-model contract's getters.
    Chain,
    /// Operator-supplied values from this file.
    Config,
}

/// Where the kink comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KinkSource {
    /// The market's collateral factor, as published by the market API.
    CollateralFactor,
    /// The contract's `kink()` getter. Only honoured with `source = chain`.
    Contract,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateModelConfig {
    pub source: ParameterSource,
    #[serde(default = "default_kink_source")]
    pub kink_source: KinkSource,
    /// Integer per-block constants as decimal strings (1e18-scaled).
    #[serde(default)]
    pub base_rate_per_block: Option<String>,
    #[serde(default)]
    pub multiplier_per_block: Option<String>,
    #[serde(default)]
    pub jump_multiplier_per_block: Option<String>,
    #[serde(default)]
    pub blocks_per_year: Option<String>,
    #[serde(with = "rust_decimal::serde::str", default = "default_blocks_per_day")]
    pub blocks_per_day: Decimal,
    #[serde(with = "rust_decimal::serde::str", default = "default_days_per_year")]
    pub days_per_year: Decimal,
}

fn default_kink_source() -> KinkSource {
    KinkSource::CollateralFactor
}

fn default_blocks_per_day() -> Decimal {
    DEFAULT_BLOCKS_PER_DAY
}

fn default_days_per_year() -> Decimal {
    DEFAULT_DAYS_PER_YEAR
}

// ---------------------------------------------------------------------------
// tolerances.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ToleranceConfig {
    /// Max relative error for computed-vs-contract checks.
    #[serde(
        with = "rust_decimal::serde::str",
        default = "default_onchain_relative"
    )]
    pub onchain_relative: Decimal,
    /// Max absolute error for computed-vs-API APY check.
    #[serde(with = "rust_decimal::serde::str", default = "default_api_absolute")]
    pub api_absolute: Decimal,
}

fn default_onchain_relative() -> Decimal {
    DEFAULT_ONCHAIN_RELATIVE_TOLERANCE
}

fn default_api_absolute() -> Decimal {
    DEFAULT_API_ABSOLUTE_TOLERANCE
}

impl Default for ToleranceConfig {
    fn default() -> Self {
        Self {
            onchain_relative: DEFAULT_ONCHAIN_RELATIVE_TOLERANCE,
            api_absolute: DEFAULT_API_ABSOLUTE_TOLERANCE,
        }
    }
}
