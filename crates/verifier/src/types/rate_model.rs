use alloy::primitives::U256;
use rust_decimal::Decimal;

use super::mantissa::Mantissa;

/// Parameters of a jump-rate interest model, all per-block values scaled by
/// 1e18.
///
/// These must match the deployed contract's active parameters or every
/// on-chain comparison fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateModelConstants {
    pub base_rate_per_block: Mantissa,
    pub multiplier_per_block: Mantissa,
    /// `None` when the operator did not supply it; only needed above the kink.
    pub jump_multiplier_per_block: Option<Mantissa>,
    pub kink: Mantissa,
    /// Only used for the informational simple APR.
    pub blocks_per_year: Option<U256>,
}

/// Block-cadence assumptions used to compound a per-block rate into an APY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annualization {
    pub blocks_per_day: Decimal,
    pub days_per_year: Decimal,
}
