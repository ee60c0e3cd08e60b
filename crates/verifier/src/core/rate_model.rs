//! Jump-rate interest model evaluator.
//!
//! Reproduces the contract's own integer arithmetic (floor division on
//! 1e18-scaled `U256`) so the result can be compared against `eth_call`
//! output as an independent check rather than against itself.

use alloy::primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};

use crate::constants::MANTISSA_ONE;
use crate::errors::CheckError;
use crate::types::mantissa::u256_to_decimal;
use crate::types::{Annualization, Mantissa, RateModelConstants};

const STAGE: &str = "rate model";

/// `1e18 * borrows / (cash + borrows - reserves)`, floored.
///
/// A zero (or negative) denominator is a [`CheckError::DegenerateMarket`].
pub fn utilization_rate(cash: U256, borrows: U256, reserves: U256) -> Result<Mantissa, CheckError> {
    let degenerate = || CheckError::DegenerateMarket {
        cash: cash.to_string(),
        borrows: borrows.to_string(),
        reserves: reserves.to_string(),
    };

    let denominator = cash
        .checked_add(borrows)
        .ok_or_else(overflow)?
        .checked_sub(reserves)
        .filter(|d| !d.is_zero())
        .ok_or_else(degenerate)?;

    let numerator = borrows.checked_mul(MANTISSA_ONE).ok_or_else(overflow)?;
    Ok(Mantissa::from_raw(numerator / denominator))
}

/// Per-block borrow rate at `utilization`, switching slope above the kink.
pub fn borrow_rate(
    utilization: Mantissa,
    constants: &RateModelConstants,
) -> Result<Mantissa, CheckError> {
    if utilization <= constants.kink {
        below_kink_rate(utilization, constants)
    } else {
        let jump = constants
            .jump_multiplier_per_block
            .ok_or(CheckError::MissingRateParameter {
                name: "jump_multiplier_per_block",
            })?;
        above_kink_rate(utilization, jump, constants)
    }
}

fn below_kink_rate(
    utilization: Mantissa,
    constants: &RateModelConstants,
) -> Result<Mantissa, CheckError> {
    let slope = mul_mantissa(utilization.raw(), constants.multiplier_per_block.raw())?;
    slope
        .checked_add(constants.base_rate_per_block.raw())
        .map(Mantissa::from_raw)
        .ok_or_else(overflow)
}

fn above_kink_rate(
    utilization: Mantissa,
    jump_multiplier: Mantissa,
    constants: &RateModelConstants,
) -> Result<Mantissa, CheckError> {
    let normal_rate = below_kink_rate(constants.kink, constants)?;
    let excess = utilization.raw().saturating_sub(constants.kink.raw());
    let jump = mul_mantissa(excess, jump_multiplier.raw())?;
    jump.checked_add(normal_rate.raw())
        .map(Mantissa::from_raw)
        .ok_or_else(overflow)
}

/// `a * b / 1e18`, floored.
fn mul_mantissa(a: U256, b: U256) -> Result<U256, CheckError> {
    a.checked_mul(b)
        .map(|product| product / MANTISSA_ONE)
        .ok_or_else(overflow)
}

fn overflow() -> CheckError {
    CheckError::parse(STAGE, "uint256 arithmetic overflow")
}

/// Compound a per-block rate into an annual yield:
/// `(rate / 1e18 * blocks_per_day + 1) ^ days_per_year - 1`.
pub fn annualize(borrow_rate: Mantissa, cadence: &Annualization) -> Result<Decimal, CheckError> {
    let per_block = borrow_rate
        .to_fraction()
        .ok_or_else(|| CheckError::parse(STAGE, format!("borrow rate {borrow_rate} out of range")))?;

    let daily_growth = per_block
        .checked_mul(cadence.blocks_per_day)
        .and_then(|d| d.checked_add(Decimal::ONE))
        .ok_or_else(|| CheckError::parse(STAGE, "daily growth factor overflow"))?;

    let days = cadence.days_per_year;
    let yearly_growth = if days.fract().is_zero() {
        days.to_u64().and_then(|n| daily_growth.checked_powu(n))
    } else {
        daily_growth.checked_powd(days)
    }
    .ok_or_else(|| CheckError::parse(STAGE, "annual growth factor overflow"))?;

    Ok(yearly_growth - Decimal::ONE)
}

/// Non-compounded annual rate: `rate / 1e18 * blocks_per_year`.
pub fn simple_apr(borrow_rate: Mantissa, blocks_per_year: U256) -> Option<Decimal> {
    let blocks = u256_to_decimal(blocks_per_year)?;
    borrow_rate.to_fraction()?.checked_mul(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MANTISSA_SCALE;
    use rust_decimal_macros::dec;

    fn u(v: u128) -> U256 {
        U256::from(v)
    }

    fn cdai_constants() -> RateModelConstants {
        RateModelConstants {
            base_rate_per_block: Mantissa::ZERO,
            multiplier_per_block: Mantissa::from_raw(u(23_782_343_987)),
            jump_multiplier_per_block: Some(Mantissa::from_raw(u(518_455_098_934))),
            kink: Mantissa::from_raw(u(800_000_000_000_000_000)),
            blocks_per_year: Some(u(2_102_400)),
        }
    }

    fn default_cadence() -> Annualization {
        Annualization {
            blocks_per_day: dec!(6570),
            days_per_year: dec!(365),
        }
    }

    // -----------------------------------------------------------------------
    // Utilization
    // -----------------------------------------------------------------------

    #[test]
    fn test_utilization_literal_market() {
        let util = utilization_rate(u(1_000_000), u(500_000), u(50_000)).unwrap();
        // 1e18 * 500000 / 1450000 ≈ 3.448276e17
        assert_eq!(util.raw(), u(344_827_586_206_896_551));
    }

    #[test]
    fn test_utilization_is_floor_of_exact_ratio() {
        for cash in [0u128, 1, 7, 999, 1_000_000, 10u128.pow(24)] {
            for borrows in [0u128, 1, 3, 500_000, 10u128.pow(22)] {
                for reserves in [0u128, 1, 13] {
                    let denom = cash + borrows;
                    if denom <= reserves {
                        continue;
                    }
                    let denom = u(denom - reserves);
                    let util = utilization_rate(u(cash), u(borrows), u(reserves)).unwrap().raw();
                    let exact_num = u(borrows) * MANTISSA_ONE;
                    // util <= exact < util + 1
                    assert!(util * denom <= exact_num);
                    assert!((util + U256::from(1u8)) * denom > exact_num);
                }
            }
        }
    }

    #[test]
    fn test_utilization_zero_base_is_degenerate() {
        let err = utilization_rate(u(0), u(0), u(0)).unwrap_err();
        assert!(matches!(err, CheckError::DegenerateMarket { .. }));

        let err = utilization_rate(u(100), u(50), u(150)).unwrap_err();
        assert!(matches!(err, CheckError::DegenerateMarket { .. }));
    }

    #[test]
    fn test_utilization_reserves_exceeding_base_is_degenerate() {
        let err = utilization_rate(u(10), u(10), u(21)).unwrap_err();
        assert!(matches!(err, CheckError::DegenerateMarket { .. }));
    }

    // -----------------------------------------------------------------------
    // Borrow rate
    // -----------------------------------------------------------------------

    #[test]
    fn test_borrow_rate_literal_market() {
        let constants = cdai_constants();
        let util = utilization_rate(u(1_000_000), u(500_000), u(50_000)).unwrap();
        assert!(util < constants.kink);
        let rate = borrow_rate(util, &constants).unwrap();
        assert_eq!(rate.raw(), u(8_200_808_271));

        let expected = dec!(344827586206896551) * dec!(23782343987) / MANTISSA_SCALE;
        let got = rate.to_raw_decimal().unwrap();
        assert!(((got - expected) / expected).abs() < dec!(0.000001));
    }

    #[test]
    fn test_borrow_rate_below_kink_formula() {
        let mut constants = cdai_constants();
        constants.base_rate_per_block = Mantissa::from_raw(u(1_000));
        for util in [0u128, 1, 10u128.pow(17), 5 * 10u128.pow(17), 8 * 10u128.pow(17)] {
            let rate = borrow_rate(Mantissa::from_raw(u(util)), &constants).unwrap();
            let expected = u(util) * u(23_782_343_987) / MANTISSA_ONE + u(1_000);
            assert_eq!(rate.raw(), expected, "util {util}");
        }
    }

    #[test]
    fn test_borrow_rate_above_kink_formula() {
        let constants = cdai_constants();
        let kink = u(800_000_000_000_000_000);
        for util in [kink + u(1), u(9 * 10u128.pow(17)), u(10u128.pow(18))] {
            let rate = borrow_rate(Mantissa::from_raw(util), &constants).unwrap();
            let normal = kink * u(23_782_343_987) / MANTISSA_ONE;
            let expected = (util - kink) * u(518_455_098_934) / MANTISSA_ONE + normal;
            assert_eq!(rate.raw(), expected);
        }
    }

    #[test]
    fn test_borrow_rate_continuous_at_kink() {
        let constants = cdai_constants();
        let jump = constants.jump_multiplier_per_block.unwrap();
        let below = below_kink_rate(constants.kink, &constants).unwrap();
        let above = above_kink_rate(constants.kink, jump, &constants).unwrap();
        assert_eq!(below, above);
        assert_eq!(borrow_rate(constants.kink, &constants).unwrap(), below);
    }

    #[test]
    fn test_borrow_rate_above_kink_without_jump_multiplier() {
        let mut constants = cdai_constants();
        constants.jump_multiplier_per_block = None;

        // Below the kink the missing jump multiplier is irrelevant.
        assert!(borrow_rate(Mantissa::from_raw(u(10u128.pow(17))), &constants).is_ok());

        let err = borrow_rate(Mantissa::from_raw(u(9 * 10u128.pow(17))), &constants).unwrap_err();
        assert!(matches!(
            err,
            CheckError::MissingRateParameter {
                name: "jump_multiplier_per_block"
            }
        ));
    }

    // -----------------------------------------------------------------------
    // Annualization
    // -----------------------------------------------------------------------

    #[test]
    fn test_annualize_literal_market() {
        let apy = annualize(Mantissa::from_raw(u(8_200_808_271)), &default_cadence()).unwrap();
        // (8200808271 / 1e18 * 6570 + 1) ^ 365 - 1 = 0.019860056628271408...
        assert!((apy - dec!(0.0198600566282714)).abs() < dec!(0.0000000000001));
    }

    #[test]
    fn test_annualize_zero_rate() {
        assert_eq!(annualize(Mantissa::ZERO, &default_cadence()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_annualize_is_strictly_monotonic() {
        let cadence = default_cadence();
        let mut previous = annualize(Mantissa::ZERO, &cadence).unwrap();
        for rate in [1u128, 2, 1_000, 8_200_808_271, 8_200_808_272, 20_000_000_000, 10u128.pow(12)] {
            let apy = annualize(Mantissa::from_raw(u(rate)), &cadence).unwrap();
            assert!(apy > previous, "apy({rate}) = {apy} <= {previous}");
            previous = apy;
        }
    }

    #[test]
    fn test_annualize_fractional_days() {
        let cadence = Annualization {
            blocks_per_day: dec!(7200),
            days_per_year: dec!(365.25),
        };
        let whole = annualize(
            Mantissa::from_raw(u(8_200_808_271)),
            &Annualization {
                blocks_per_day: dec!(7200),
                days_per_year: dec!(365),
            },
        )
        .unwrap();
        let fractional = annualize(Mantissa::from_raw(u(8_200_808_271)), &cadence).unwrap();
        assert!(fractional > whole);
    }

    #[test]
    fn test_simple_apr() {
        let apr = simple_apr(Mantissa::from_raw(u(10u128.pow(9))), u(2_102_400)).unwrap();
        assert_eq!(apr, dec!(0.0021024));
    }
}
