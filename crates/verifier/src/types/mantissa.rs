//! Newtype wrapper for 1e18-scaled on-chain values.
//!
//! Keeps raw token amounts and mantissa-scaled rates apart at the type level,
//! and owns the lossless conversions between `U256` and `Decimal`.

use alloy::primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::constants::{MANTISSA_ONE, MANTISSA_SCALE};

/// Mantissa-scaled value (18 decimals). Used for utilization, per-block rates
/// and the kink.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Mantissa(pub U256);

impl Mantissa {
    pub const ONE: Mantissa = Mantissa(MANTISSA_ONE);
    pub const ZERO: Mantissa = Mantissa(U256::ZERO);

    /// Create from a `U256` that is already mantissa-scaled.
    pub fn from_raw(val: U256) -> Self {
        Self(val)
    }

    /// Inner `U256`.
    pub fn raw(self) -> U256 {
        self.0
    }

    /// Scale a fraction (e.g. `0.8`) up to a mantissa, truncating any digits
    /// beyond the 18th decimal. `None` for negative or overflowing input.
    pub fn from_fraction(fraction: Decimal) -> Option<Self> {
        let scaled = fraction.checked_mul(MANTISSA_SCALE)?;
        decimal_to_u256_trunc(scaled).map(Self)
    }

    /// The raw mantissa as an unscaled `Decimal` (e.g. `8e17`).
    pub fn to_raw_decimal(self) -> Option<Decimal> {
        u256_to_decimal(self.0)
    }

    /// The value as a fraction (e.g. `0.8`).
    pub fn to_fraction(self) -> Option<Decimal> {
        self.to_raw_decimal().map(|raw| raw / MANTISSA_SCALE)
    }
}

impl fmt::Debug for Mantissa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mantissa({})", self.0)
    }
}

impl fmt::Display for Mantissa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Free-standing conversion helpers
// ---------------------------------------------------------------------------

/// Convert a `U256` to `Decimal`. `None` above `Decimal::MAX` (~7.9e28).
pub fn u256_to_decimal(val: U256) -> Option<Decimal> {
    Decimal::from_str(&val.to_string()).ok()
}

/// Truncate a non-negative `Decimal` toward zero into a `U256`.
pub fn decimal_to_u256_trunc(val: Decimal) -> Option<U256> {
    if val.is_sign_negative() && !val.is_zero() {
        return None;
    }
    val.trunc().to_u128().map(U256::from)
}
