use alloy::primitives::U256;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Numeric Constants
// ---------------------------------------------------------------------------

/// 1e18, the "eth mantissa" every rate-model quantity is scaled by.
pub const MANTISSA_ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// 1e18 as a `Decimal`, for converting mantissas to fractions.
pub const MANTISSA_SCALE: Decimal = dec!(1_000_000_000_000_000_000);

/// Percent multiplier used when rendering fractions.
pub const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Annualisation defaults
// ---------------------------------------------------------------------------

/// ~13.15 seconds per block.
pub const DEFAULT_BLOCKS_PER_DAY: Decimal = dec!(6570);
pub const DEFAULT_DAYS_PER_YEAR: Decimal = dec!(365);

// ---------------------------------------------------------------------------
// Tolerance defaults
// ---------------------------------------------------------------------------

/// Relative tolerance for computed-vs-contract comparisons.
pub const DEFAULT_ONCHAIN_RELATIVE_TOLERANCE: Decimal = dec!(0.000000000001);

/// Absolute tolerance for computed-vs-API APY comparison.
pub const DEFAULT_API_ABSOLUTE_TOLERANCE: Decimal = dec!(0.000001);

// ---------------------------------------------------------------------------
// Default endpoints
// ---------------------------------------------------------------------------

pub const DEFAULT_MARKET_API_URL: &str = "https://api.compound.finance/api/v2/ctoken";
pub const DEFAULT_EXPLORER_API_URL: &str = "https://api.etherscan.io/v2/api";
pub const DEFAULT_TARGET_SYMBOL: &str = "cDAI";

/// `EnvFilter` directive used when neither `RUST_LOG` nor `logging.filter` is set.
pub const DEFAULT_LOG_FILTER: &str = "rate_verifier=info,warn";

// ---------------------------------------------------------------------------
// Rate model function names
// ---------------------------------------------------------------------------

pub const FN_UTILIZATION_RATE: &str = "utilizationRate";
pub const FN_GET_BORROW_RATE: &str = "getBorrowRate";
pub const FN_BASE_RATE_PER_BLOCK: &str = "baseRatePerBlock";
pub const FN_MULTIPLIER_PER_BLOCK: &str = "multiplierPerBlock";
pub const FN_JUMP_MULTIPLIER_PER_BLOCK: &str = "jumpMultiplierPerBlock";
pub const FN_BLOCKS_PER_YEAR: &str = "blocksPerYear";
pub const FN_KINK: &str = "kink";
