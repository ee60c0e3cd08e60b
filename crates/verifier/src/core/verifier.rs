//! The verification pipeline: fetch → resolve → call → compute → compare.
//!
//! Strictly sequential; every stage's error is returned unchanged and ends
//! the run.

use alloy::primitives::U256;
use tracing::{info, warn};

use crate::config::{
    validate::parse_u256, KinkSource, ParameterSource, RateModelConfig, ToleranceConfig,
    VerifierConfig,
};
use crate::constants::{
    FN_BASE_RATE_PER_BLOCK, FN_BLOCKS_PER_YEAR, FN_JUMP_MULTIPLIER_PER_BLOCK, FN_KINK,
    FN_MULTIPLIER_PER_BLOCK,
};
use crate::core::comparator::compare;
use crate::core::rate_model;
use crate::core::report::Report;
use crate::errors::CheckError;
use crate::sources::contracts::expected_function;
use crate::sources::explorer::ExplorerClient;
use crate::sources::invoker::{connect_http, ContractInvoker};
use crate::sources::market_api::MarketApiClient;
use crate::sources::build_http_client;
use crate::types::mantissa::u256_to_decimal;
use crate::types::{
    Annualization, ErrorMode, Mantissa, MarketSnapshot, Quantity, RateModelConstants,
};

/// One-shot checker wired from configuration.
pub struct Verifier {
    market: MarketApiClient,
    explorer: ExplorerClient,
    config: VerifierConfig,
}

impl Verifier {
    pub fn from_config(config: &VerifierConfig) -> Result<Self, CheckError> {
        let http = build_http_client(&config.endpoints.http)?;
        Ok(Self {
            market: MarketApiClient::new(http.clone(), &config.endpoints.market_api.base_url),
            explorer: ExplorerClient::new(http, &config.endpoints.explorer),
            config: config.clone(),
        })
    }

    /// Run every stage once and return the report, or the first failure.
    pub async fn run(&self) -> Result<Report, CheckError> {
        let symbol = &self.config.endpoints.market_api.target_symbol;
        let snapshot = self.market.fetch_snapshot(symbol).await?;

        let interface = self
            .explorer
            .resolve(&snapshot.interest_rate_model_address)
            .await?;

        let endpoints = &self.config.endpoints;
        let provider = connect_http(&endpoints.rpc.http_url, &endpoints.http)?;
        let invoker = ContractInvoker::new(provider, interface);

        let constants = resolve_constants(&self.config.rate_model, &invoker, &snapshot).await?;
        let cadence = Annualization {
            blocks_per_day: self.config.rate_model.blocks_per_day,
            days_per_year: self.config.rate_model.days_per_year,
        };

        verify_snapshot(&snapshot, &invoker, &constants, &cadence, &self.config.tolerances).await
    }
}

/// Cross-check one snapshot against the contract and the API.
pub async fn verify_snapshot(
    snapshot: &MarketSnapshot,
    invoker: &ContractInvoker,
    constants: &RateModelConstants,
    cadence: &Annualization,
    tolerances: &ToleranceConfig,
) -> Result<Report, CheckError> {
    let (cash, borrows, reserves) = (snapshot.cash, snapshot.borrows, snapshot.reserves);

    // Computed first so a degenerate market never reaches the contract.
    let computed_util = rate_model::utilization_rate(cash, borrows, reserves)?;
    let contract_util = invoker.utilization_rate(cash, borrows, reserves).await?;
    let utilization = compare(
        Quantity::UtilizationRate,
        raw_decimal(computed_util)?,
        raw_decimal(contract_util)?,
        ErrorMode::Relative,
        tolerances.onchain_relative,
    )?;

    let computed_rate = rate_model::borrow_rate(computed_util, constants)?;
    let contract_rate = invoker.get_borrow_rate(cash, borrows, reserves).await?;
    let borrow_rate = compare(
        Quantity::BorrowRate,
        raw_decimal(computed_rate)?,
        raw_decimal(contract_rate)?,
        ErrorMode::Relative,
        tolerances.onchain_relative,
    )?;

    if let Some(apr) = constants
        .blocks_per_year
        .and_then(|blocks| rate_model::simple_apr(computed_rate, blocks))
    {
        info!(%apr, "simple borrow APR (per-block rate x blocks per year)");
    }

    let computed_apy = rate_model::annualize(computed_rate, cadence)?;
    let apy = compare(
        Quantity::BorrowApy,
        computed_apy,
        snapshot.api_borrow_apy,
        ErrorMode::Absolute,
        tolerances.api_absolute,
    )?;

    Ok(Report {
        symbol: snapshot.symbol.clone(),
        comparisons: vec![utilization, borrow_rate, apy],
        computed_apy,
        api_apy: snapshot.api_borrow_apy,
    })
}

fn raw_decimal(value: Mantissa) -> Result<rust_decimal::Decimal, CheckError> {
    u256_to_decimal(value.raw())
        .ok_or_else(|| CheckError::parse("comparator", format!("{value} exceeds decimal range")))
}

// ---------------------------------------------------------------------------
// Rate model parameters
// ---------------------------------------------------------------------------

/// Gather the jump-rate parameters from the configured source.
pub async fn resolve_constants(
    config: &RateModelConfig,
    invoker: &ContractInvoker,
    snapshot: &MarketSnapshot,
) -> Result<RateModelConstants, CheckError> {
    let constants = match config.source {
        ParameterSource::Config => constants_from_config(config, snapshot)?,
        ParameterSource::Chain => constants_from_chain(config, invoker, snapshot).await?,
    };

    info!(
        source = ?config.source,
        base = %constants.base_rate_per_block,
        multiplier = %constants.multiplier_per_block,
        jump = ?constants.jump_multiplier_per_block.map(|m| m.to_string()),
        kink = %constants.kink,
        "rate model parameters"
    );

    Ok(constants)
}

/// Operator-supplied parameters; the kink is the market's collateral factor.
pub fn constants_from_config(
    config: &RateModelConfig,
    snapshot: &MarketSnapshot,
) -> Result<RateModelConstants, CheckError> {
    let parse = |name: &'static str, value: &Option<String>| -> Result<Option<U256>, CheckError> {
        parse_u256(value.as_deref())
            .map_err(|reason| CheckError::parse("rate model config", format!("{name}: {reason}")))
    };
    let required = |name: &'static str, value: &Option<String>| -> Result<U256, CheckError> {
        parse(name, value)?.ok_or(CheckError::MissingRateParameter { name })
    };

    let jump_multiplier_per_block =
        parse("jump_multiplier_per_block", &config.jump_multiplier_per_block)?;
    if jump_multiplier_per_block.is_none() {
        warn!("jump_multiplier_per_block not configured; utilization above the kink will fail");
    }

    Ok(RateModelConstants {
        base_rate_per_block: Mantissa::from_raw(required(
            "base_rate_per_block",
            &config.base_rate_per_block,
        )?),
        multiplier_per_block: Mantissa::from_raw(required(
            "multiplier_per_block",
            &config.multiplier_per_block,
        )?),
        jump_multiplier_per_block: jump_multiplier_per_block.map(Mantissa::from_raw),
        kink: snapshot.collateral_factor_kink,
        blocks_per_year: parse("blocks_per_year", &config.blocks_per_year)?,
    })
}

/// Live parameters read from the contract's public getters.
async fn constants_from_chain(
    config: &RateModelConfig,
    invoker: &ContractInvoker,
    snapshot: &MarketSnapshot,
) -> Result<RateModelConstants, CheckError> {
    let base_rate_per_block = read_required(invoker, FN_BASE_RATE_PER_BLOCK).await?;
    let multiplier_per_block = read_required(invoker, FN_MULTIPLIER_PER_BLOCK).await?;
    let jump_multiplier_per_block = read_required(invoker, FN_JUMP_MULTIPLIER_PER_BLOCK).await?;
    let blocks_per_year = read_required(invoker, FN_BLOCKS_PER_YEAR).await?;

    let kink = match config.kink_source {
        KinkSource::Contract => Mantissa::from_raw(read_required(invoker, FN_KINK).await?),
        KinkSource::CollateralFactor => snapshot.collateral_factor_kink,
    };

    Ok(RateModelConstants {
        base_rate_per_block: Mantissa::from_raw(base_rate_per_block),
        multiplier_per_block: Mantissa::from_raw(multiplier_per_block),
        jump_multiplier_per_block: Some(Mantissa::from_raw(jump_multiplier_per_block)),
        kink,
        blocks_per_year: Some(blocks_per_year),
    })
}

/// Fails with a parse error when the interface does not declare `getter`.
async fn read_required(invoker: &ContractInvoker, getter: &str) -> Result<U256, CheckError> {
    let expected = expected_function(getter)
        .ok_or_else(|| CheckError::parse("rate model", format!("unknown getter '{getter}'")))?;
    invoker.interface().require(&expected)?;
    invoker.call_uint(getter, &[]).await
}
