use rust_decimal::Decimal;
use std::fmt;

/// Quantities the verifier cross-checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    UtilizationRate,
    BorrowRate,
    BorrowApy,
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Quantity::UtilizationRate => "utilization rate",
            Quantity::BorrowRate => "borrow rate per block",
            Quantity::BorrowApy => "borrow APY",
        };
        f.write_str(name)
    }
}

/// How the error between computed and reference values is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// `|computed - reference| / |reference|`
    Relative,
    /// `|computed - reference|`
    Absolute,
}

/// Outcome of a single passing comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonResult {
    pub quantity: Quantity,
    pub computed: Decimal,
    pub reference: Decimal,
    pub error: Decimal,
    pub mode: ErrorMode,
}
