use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;

use crate::constants::PERCENT;
use crate::types::ComparisonResult;

/// Outcome of a fully successful verification run.
#[derive(Debug, Clone)]
pub struct Report {
    pub symbol: String,
    pub comparisons: Vec<ComparisonResult>,
    /// Borrow APY compounded from the independently computed per-block rate.
    pub computed_apy: Decimal,
    /// Borrow APY as published by the market API.
    pub api_apy: Decimal,
}

/// Render a fraction as a percentage with 6 decimals (8 significant decimals
/// of the underlying fraction). Floating point is only used here.
pub fn format_percent(fraction: Decimal) -> String {
    let percent = (fraction.round_dp(8) * PERCENT).to_f64().unwrap_or(f64::NAN);
    format!("{percent:.6} %")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Calculated {} borrow APY from smart contract function calls: {}",
            self.symbol,
            format_percent(self.computed_apy)
        )?;
        write!(
            f,
            "{} borrow APY reported by the market API: {}",
            self.symbol,
            format_percent(self.api_apy)
        )
    }
}
